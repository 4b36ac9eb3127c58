//! [`SqliteMarket`] — the SQLite implementation of [`MarketStore`].

use std::path::Path;

use topdeck_core::{
  Error, Result,
  collection::CardHolding,
  deck::{Deck, Shortfall},
  event::{Event, NewEvent, Registration},
  id::{CardId, DeckId, EventId, PlayerId, ProductId, SaleId, ShopId},
  inventory::{ShelfListing, StorageLevel},
  sale::{Receipt, Sale, SaleLine},
  store::MarketStore,
};

use crate::{
  catalog, collection, decks, events, inventory,
  pool::{Pool, PoolConfig},
  purchase,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Topdeck marketplace backed by a single SQLite file.
///
/// Cloning is cheap — the connection pool is reference-counted. Every method
/// runs inside exactly one transaction scope; none of them compose.
#[derive(Clone)]
pub struct SqliteMarket {
  pool: Pool,
}

impl SqliteMarket {
  /// Open (or create) a market at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, config: PoolConfig) -> Result<Self> {
    Ok(Self { pool: Pool::open(path, config).await? })
  }

  /// The underlying pool, e.g. for shutdown.
  pub fn pool(&self) -> &Pool {
    &self.pool
  }

  /// Drain and close the connection pool.
  pub async fn close(&self) {
    self.pool.close().await;
  }

  // ── Catalog & identity fixtures ────────────────────────────────────────
  //
  // The surface the external identity/catalog collaborators own. Used for
  // seeding and tests; not part of the MarketStore trait and not routed.

  pub async fn add_player(&self, name: &str, email: &str) -> Result<PlayerId> {
    let (name, email) = (name.to_string(), email.to_string());
    self
      .pool
      .transaction(move |tx| catalog::insert_player(tx, &name, &email))
      .await
  }

  pub async fn add_shop(
    &self,
    name: &str,
    address: Option<&str>,
    phone: Option<&str>,
  ) -> Result<ShopId> {
    let name = name.to_string();
    let address = address.map(str::to_string);
    let phone = phone.map(str::to_string);
    self
      .pool
      .transaction(move |tx| {
        catalog::insert_shop(tx, &name, address.as_deref(), phone.as_deref())
      })
      .await
  }

  pub async fn add_card(&self, name: &str, rarity: Option<&str>) -> Result<CardId> {
    let name = name.to_string();
    let rarity = rarity.map(str::to_string);
    self
      .pool
      .transaction(move |tx| catalog::insert_card(tx, &name, rarity.as_deref()))
      .await
  }

  pub async fn add_product(
    &self,
    name: &str,
    kind: &str,
    card: Option<CardId>,
  ) -> Result<ProductId> {
    let (name, kind) = (name.to_string(), kind.to_string());
    self
      .pool
      .transaction(move |tx| catalog::insert_product(tx, &name, &kind, card))
      .await
  }

  // ── Targeted reads ─────────────────────────────────────────────────────

  /// Warehoused quantity for (shop, product); `None` before first restock.
  pub async fn storage_level(
    &self,
    shop: ShopId,
    product: ProductId,
  ) -> Result<Option<StorageLevel>> {
    self
      .pool
      .transaction(move |tx| {
        Ok(inventory::storage_qty_tx(tx, shop, product)?.map(|qty| StorageLevel {
          shop_id: shop,
          product_id: product,
          qty,
        }))
      })
      .await
  }

  /// Shelf state for (shop, product); `None` before first listing.
  pub async fn shelf_listing(
    &self,
    shop: ShopId,
    product: ProductId,
  ) -> Result<Option<ShelfListing>> {
    self
      .pool
      .transaction(move |tx| inventory::shelf_listing_tx(tx, shop, product))
      .await
  }

  /// A player's holding of a card; `None` means zero (the row is absent).
  pub async fn holding(
    &self,
    player: PlayerId,
    card: CardId,
  ) -> Result<Option<CardHolding>> {
    self
      .pool
      .transaction(move |tx| {
        Ok(collection::holding_qty_tx(tx, player, card)?.map(|qty| CardHolding {
          player_id: player,
          card_id: card,
          qty,
        }))
      })
      .await
  }

  pub async fn registration_count(&self, event: EventId) -> Result<i64> {
    self
      .pool
      .transaction(move |tx| {
        events::event_size_tx(tx, event)?;
        events::registration_count_tx(tx, event)
      })
      .await
  }

  pub async fn sale_with_lines(
    &self,
    sale: SaleId,
  ) -> Result<Option<(Sale, Vec<SaleLine>)>> {
    self
      .pool
      .transaction(move |tx| purchase::sale_with_lines_tx(tx, sale))
      .await
  }

  pub async fn deck_owner(&self, deck: DeckId) -> Result<PlayerId> {
    self.pool.transaction(move |tx| decks::deck_owner_tx(tx, deck)).await
  }

  pub async fn event(&self, event: EventId) -> Result<Event> {
    self.pool.transaction(move |tx| events::get_event_tx(tx, event)).await
  }
}

// ─── Input validation ────────────────────────────────────────────────────────

fn positive_qty(qty: i64) -> Result<()> {
  if qty > 0 { Ok(()) } else { Err(Error::InvalidQuantity(qty)) }
}

fn non_negative_qty(qty: i64) -> Result<()> {
  if qty >= 0 { Ok(()) } else { Err(Error::InvalidQuantity(qty)) }
}

fn positive_price(price: i64) -> Result<()> {
  if price > 0 { Ok(()) } else { Err(Error::InvalidPrice(price)) }
}

// ─── MarketStore impl ────────────────────────────────────────────────────────

impl MarketStore for SqliteMarket {
  // ── Inventory ──────────────────────────────────────────────────────────

  async fn restock(
    &self,
    shop: ShopId,
    product: ProductId,
    qty: i64,
  ) -> Result<StorageLevel> {
    positive_qty(qty)?;
    self
      .pool
      .transaction(move |tx| inventory::restock_tx(tx, shop, product, qty))
      .await
  }

  async fn list_to_shelf(
    &self,
    shop: ShopId,
    product: ProductId,
    qty: i64,
    price: i64,
  ) -> Result<ShelfListing> {
    positive_qty(qty)?;
    positive_price(price)?;
    self
      .pool
      .transaction(move |tx| inventory::list_to_shelf_tx(tx, shop, product, qty, price))
      .await
  }

  // ── Collection ─────────────────────────────────────────────────────────

  async fn credit_card(
    &self,
    player: PlayerId,
    card: CardId,
    qty: i64,
  ) -> Result<CardHolding> {
    positive_qty(qty)?;
    self
      .pool
      .transaction(move |tx| collection::credit_tx(tx, player, card, qty))
      .await
  }

  async fn debit_card(&self, player: PlayerId, card: CardId, qty: i64) -> Result<i64> {
    positive_qty(qty)?;
    self
      .pool
      .transaction(move |tx| collection::debit_tx(tx, player, card, qty))
      .await
  }

  // ── Decks ──────────────────────────────────────────────────────────────

  async fn create_deck(&self, player: PlayerId, name: String) -> Result<Deck> {
    self
      .pool
      .transaction(move |tx| decks::create_deck_tx(tx, player, &name))
      .await
  }

  async fn set_deck_requirement(
    &self,
    deck: DeckId,
    card: CardId,
    qty: i64,
  ) -> Result<()> {
    non_negative_qty(qty)?;
    self
      .pool
      .transaction(move |tx| decks::set_requirement_tx(tx, deck, card, qty))
      .await
  }

  async fn missing_cards(
    &self,
    player: PlayerId,
    deck: DeckId,
  ) -> Result<Vec<Shortfall>> {
    self
      .pool
      .transaction(move |tx| decks::shortfall_tx(tx, player, deck))
      .await
  }

  // ── Purchases ──────────────────────────────────────────────────────────

  async fn purchase(
    &self,
    buyer: PlayerId,
    shop: ShopId,
    product: ProductId,
    qty: i64,
  ) -> Result<Receipt> {
    positive_qty(qty)?;
    self
      .pool
      .transaction(move |tx| purchase::purchase_tx(tx, buyer, shop, product, qty))
      .await
  }

  // ── Events ─────────────────────────────────────────────────────────────

  async fn create_event(&self, event: NewEvent) -> Result<Event> {
    self
      .pool
      .transaction(move |tx| events::create_event_tx(tx, &event))
      .await
  }

  async fn join_event(
    &self,
    player: PlayerId,
    event: EventId,
    deck: DeckId,
  ) -> Result<Registration> {
    self
      .pool
      .transaction(move |tx| events::join_tx(tx, player, event, deck))
      .await
  }

  async fn withdraw_from_event(&self, player: PlayerId, event: EventId) -> Result<()> {
    self
      .pool
      .transaction(move |tx| events::withdraw_tx(tx, player, event))
      .await
  }
}
