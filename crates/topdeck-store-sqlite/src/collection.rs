//! Card collection ledger: per-player holdings with the zero-row rule.
//!
//! A holding row exists iff its quantity is positive. Credit upserts; debit
//! decrements and deletes the row when it reaches zero, so "row absent" and
//! "quantity zero" are always the same statement.

use rusqlite::{OptionalExtension as _, Transaction};
use topdeck_core::{
  Error, Result,
  collection::CardHolding,
  id::{CardId, PlayerId},
};

use crate::{catalog::ensure_card, error::SqliteResultExt as _};

pub(crate) fn credit_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  card: CardId,
  qty: i64,
) -> Result<CardHolding> {
  ensure_card(tx, card)?;

  tx.execute(
    "INSERT INTO card_holdings (player_id, card_id, qty) VALUES (?1, ?2, ?3)
     ON CONFLICT (player_id, card_id) DO UPDATE SET qty = qty + excluded.qty",
    rusqlite::params![player.0, card.0, qty],
  )
  .db_err()?;

  let qty = holding_qty_tx(tx, player, card)?.unwrap_or(0);
  Ok(CardHolding { player_id: player, card_id: card, qty })
}

pub(crate) fn debit_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  card: CardId,
  qty: i64,
) -> Result<i64> {
  ensure_card(tx, card)?;

  let held = holding_qty_tx(tx, player, card)?.unwrap_or(0);
  if held < qty {
    return Err(Error::InsufficientQuantity { requested: qty, available: held });
  }

  let remaining = held - qty;
  if remaining == 0 {
    tx.execute(
      "DELETE FROM card_holdings WHERE player_id = ?1 AND card_id = ?2",
      rusqlite::params![player.0, card.0],
    )
    .db_err()?;
  } else {
    tx.execute(
      "UPDATE card_holdings SET qty = ?3 WHERE player_id = ?1 AND card_id = ?2",
      rusqlite::params![player.0, card.0, remaining],
    )
    .db_err()?;
  }
  Ok(remaining)
}

pub(crate) fn holding_qty_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  card: CardId,
) -> Result<Option<i64>> {
  tx.query_row(
    "SELECT qty FROM card_holdings WHERE player_id = ?1 AND card_id = ?2",
    rusqlite::params![player.0, card.0],
    |row| row.get(0),
  )
  .optional()
  .db_err()
}
