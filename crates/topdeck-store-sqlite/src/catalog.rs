//! Catalog and identity rows: players, shops, cards, products.
//!
//! The core trusts ids supplied by the identity and catalog collaborators;
//! the checks here turn a dangling id into the matching not-found error
//! before any ledger write happens (foreign keys remain the backstop).

use rusqlite::{OptionalExtension as _, Transaction};
use topdeck_core::{
  Error, Result,
  id::{CardId, DeckId, PlayerId, ProductId, ShopId},
};

use crate::error::SqliteResultExt as _;

// ─── Existence checks ────────────────────────────────────────────────────────

pub(crate) fn ensure_shop(tx: &Transaction<'_>, shop: ShopId) -> Result<()> {
  exists(tx, "SELECT 1 FROM shops WHERE shop_id = ?1", shop.0)?
    .then_some(())
    .ok_or(Error::ShopNotFound(shop))
}

pub(crate) fn ensure_product(tx: &Transaction<'_>, product: ProductId) -> Result<()> {
  exists(tx, "SELECT 1 FROM products WHERE product_id = ?1", product.0)?
    .then_some(())
    .ok_or(Error::ProductNotFound(product))
}

pub(crate) fn ensure_card(tx: &Transaction<'_>, card: CardId) -> Result<()> {
  exists(tx, "SELECT 1 FROM cards WHERE card_id = ?1", card.0)?
    .then_some(())
    .ok_or(Error::CardNotFound(card))
}

pub(crate) fn ensure_deck(tx: &Transaction<'_>, deck: DeckId) -> Result<()> {
  exists(tx, "SELECT 1 FROM decks WHERE deck_id = ?1", deck.0)?
    .then_some(())
    .ok_or(Error::DeckNotFound(deck))
}

fn exists(tx: &Transaction<'_>, sql: &str, id: i64) -> Result<bool> {
  Ok(
    tx.query_row(sql, rusqlite::params![id], |_| Ok(()))
      .optional()
      .db_err()?
      .is_some(),
  )
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

pub(crate) fn insert_player(
  tx: &Transaction<'_>,
  name: &str,
  email: &str,
) -> Result<PlayerId> {
  tx.execute(
    "INSERT INTO players (name, email) VALUES (?1, ?2)",
    rusqlite::params![name, email],
  )
  .db_err()?;
  Ok(PlayerId(tx.last_insert_rowid()))
}

pub(crate) fn insert_shop(
  tx: &Transaction<'_>,
  name: &str,
  address: Option<&str>,
  phone: Option<&str>,
) -> Result<ShopId> {
  tx.execute(
    "INSERT INTO shops (name, address, phone) VALUES (?1, ?2, ?3)",
    rusqlite::params![name, address, phone],
  )
  .db_err()?;
  Ok(ShopId(tx.last_insert_rowid()))
}

pub(crate) fn insert_card(
  tx: &Transaction<'_>,
  name: &str,
  rarity: Option<&str>,
) -> Result<CardId> {
  tx.execute(
    "INSERT INTO cards (name, rarity) VALUES (?1, ?2)",
    rusqlite::params![name, rarity],
  )
  .db_err()?;
  Ok(CardId(tx.last_insert_rowid()))
}

pub(crate) fn insert_product(
  tx: &Transaction<'_>,
  name: &str,
  kind: &str,
  card: Option<CardId>,
) -> Result<ProductId> {
  if let Some(card) = card {
    ensure_card(tx, card)?;
  }
  tx.execute(
    "INSERT INTO products (name, kind, card_id) VALUES (?1, ?2, ?3)",
    rusqlite::params![name, kind, card.map(|c| c.0)],
  )
  .db_err()?;
  Ok(ProductId(tx.last_insert_rowid()))
}

/// The card a product resolves to on purchase, if any.
pub(crate) fn linked_card(
  tx: &Transaction<'_>,
  product: ProductId,
) -> Result<Option<CardId>> {
  let linked: Option<Option<i64>> = tx
    .query_row(
      "SELECT card_id FROM products WHERE product_id = ?1",
      rusqlite::params![product.0],
      |row| row.get(0),
    )
    .optional()
    .db_err()?;
  match linked {
    None => Err(Error::ProductNotFound(product)),
    Some(card) => Ok(card.map(CardId)),
  }
}
