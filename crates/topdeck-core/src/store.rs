//! The `MarketStore` trait — the transactional commerce surface.
//!
//! The trait is implemented by storage backends (e.g. `topdeck-store-sqlite`).
//! Higher layers (`topdeck-api`, `topdeck-server`) depend on this
//! abstraction, not on any concrete backend.
//!
//! Every operation runs inside exactly one transaction on the backend: it
//! either commits all of its writes or none of them. Callers never compose
//! two operations expecting combined atomicity.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  Result,
  collection::CardHolding,
  deck::{Deck, Shortfall},
  event::{Event, NewEvent, Registration},
  id::{CardId, DeckId, EventId, PlayerId, ProductId, ShopId},
  inventory::{ShelfListing, StorageLevel},
  sale::Receipt,
};

/// Abstraction over a Topdeck marketplace backend.
pub trait MarketStore: Send + Sync {
  // ── Inventory ─────────────────────────────────────────────────────────

  /// Add `qty` of a product to a shop's storage, creating the storage row
  /// on first restock. Never fails on quantity once validated.
  fn restock(
    &self,
    shop: ShopId,
    product: ProductId,
    qty: i64,
  ) -> impl Future<Output = Result<StorageLevel>> + Send + '_;

  /// Move `qty` of a product from storage to the public shelf at `price`.
  ///
  /// Fails with `InsufficientStock` if storage does not cover `qty`. The
  /// shelf price is overwritten with the newly supplied one; quantity adds
  /// to any existing shelf quantity. Storage + shelf total is conserved.
  fn list_to_shelf(
    &self,
    shop: ShopId,
    product: ProductId,
    qty: i64,
    price: i64,
  ) -> impl Future<Output = Result<ShelfListing>> + Send + '_;

  // ── Collection ────────────────────────────────────────────────────────

  /// Add `qty` to a player's holding of a card, creating the row if absent.
  fn credit_card(
    &self,
    player: PlayerId,
    card: CardId,
    qty: i64,
  ) -> impl Future<Output = Result<CardHolding>> + Send + '_;

  /// Remove `qty` from a player's holding of a card.
  ///
  /// Fails with `InsufficientQuantity` if the holding does not cover `qty`.
  /// Returns the quantity after the debit; zero means the row was deleted.
  fn debit_card(
    &self,
    player: PlayerId,
    card: CardId,
    qty: i64,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  // ── Decks ─────────────────────────────────────────────────────────────

  /// Create a deck owned by `player`. The deck and its ownership row are
  /// inserted in one transaction.
  fn create_deck(
    &self,
    player: PlayerId,
    name: String,
  ) -> impl Future<Output = Result<Deck>> + Send + '_;

  /// Set a deck's required quantity of a card to exactly `qty`.
  ///
  /// Zero deletes the requirement (a no-op if it was already absent);
  /// positive values overwrite rather than add.
  fn set_deck_requirement(
    &self,
    deck: DeckId,
    card: CardId,
    qty: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// The cards a player is short of for a deck: requirement minus holding
  /// where positive, ordered by descending shortfall, then card id.
  fn missing_cards(
    &self,
    player: PlayerId,
    deck: DeckId,
  ) -> impl Future<Output = Result<Vec<Shortfall>>> + Send + '_;

  // ── Purchases ─────────────────────────────────────────────────────────

  /// Buy `qty` of a shop's shelf listing as one atomic unit: shelf
  /// decrement, sale + sale line insert, and — if the product links to a
  /// card — the buyer's holding credit all commit or roll back together.
  fn purchase(
    &self,
    buyer: PlayerId,
    shop: ShopId,
    product: ProductId,
    qty: i64,
  ) -> impl Future<Output = Result<Receipt>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  /// Publish a new event organised by a shop.
  fn create_event(
    &self,
    event: NewEvent,
  ) -> impl Future<Output = Result<Event>> + Send + '_;

  /// Register a player (with a deck) for an event.
  ///
  /// The capacity check and the insert are atomic with respect to
  /// concurrent joins: the registration count never exceeds the capacity
  /// of the event's size tier, regardless of interleaving.
  fn join_event(
    &self,
    player: PlayerId,
    event: EventId,
    deck: DeckId,
  ) -> impl Future<Output = Result<Registration>> + Send + '_;

  /// Delete a player's registration for an event. Idempotent: withdrawing
  /// an absent registration is a no-op.
  fn withdraw_from_event(
    &self,
    player: PlayerId,
    event: EventId,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}
