//! The single error taxonomy shared by every Topdeck crate.
//!
//! Variants split into two groups. Business-rule outcomes (not-found,
//! insufficient stock or quantity, capacity exceeded, duplicate registration,
//! invalid input) are final for the attempt that produced them: the store
//! rolls the transaction back and the caller must not retry. Infrastructure
//! failures ([`Error::PoolExhausted`], [`Error::TransactionAborted`]) are
//! transient and may be retried with backoff.

use thiserror::Error;

use crate::id::{CardId, DeckId, EventId, PlayerId, ProductId, ShopId};

#[derive(Debug, Error)]
pub enum Error {
  // ── Business outcomes ─────────────────────────────────────────────────────
  #[error("shop not found: {0}")]
  ShopNotFound(ShopId),

  #[error("product not found: {0}")]
  ProductNotFound(ProductId),

  #[error("card not found: {0}")]
  CardNotFound(CardId),

  #[error("deck not found: {0}")]
  DeckNotFound(DeckId),

  #[error("event not found: {0}")]
  EventNotFound(EventId),

  #[error("no shelf listing for product {product} at shop {shop}")]
  ListingNotFound { shop: ShopId, product: ProductId },

  #[error("insufficient stock: requested {requested}, {available} remaining")]
  InsufficientStock { requested: i64, available: i64 },

  #[error("insufficient quantity: requested {requested}, {available} held")]
  InsufficientQuantity { requested: i64, available: i64 },

  #[error("event is full (capacity {capacity})")]
  CapacityExceeded { capacity: u32 },

  #[error("player {player} is already registered for event {event}")]
  DuplicateRegistration { player: PlayerId, event: EventId },

  #[error("quantity must be positive, got {0}")]
  InvalidQuantity(i64),

  #[error("price must be positive, got {0}")]
  InvalidPrice(i64),

  // ── Infrastructure failures ───────────────────────────────────────────────
  #[error("connection pool exhausted")]
  PoolExhausted,

  /// A store-level failure (busy timeout, driver error). The payload is for
  /// logs only; user-facing surfaces report a generic retryable message.
  #[error("transaction aborted")]
  TransactionAborted(String),
}

impl Error {
  /// Whether the caller may retry the operation with backoff.
  ///
  /// Business-rule outcomes are final for the attempt; only infrastructure
  /// failures are transient.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Error::PoolExhausted | Error::TransactionAborted(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
