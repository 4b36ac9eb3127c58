//! Deck requirement ledger and the derived shortfall report.

use rusqlite::{OptionalExtension as _, Transaction};
use topdeck_core::{
  Error, Result,
  deck::{Deck, Shortfall},
  id::{CardId, DeckId, PlayerId},
};

use crate::{
  catalog::{ensure_card, ensure_deck},
  error::SqliteResultExt as _,
};

/// Insert a deck and its ownership row. One transaction keeps a deck from
/// ever existing without an owner.
pub(crate) fn create_deck_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  name: &str,
) -> Result<Deck> {
  tx.execute("INSERT INTO decks (name) VALUES (?1)", rusqlite::params![name])
    .db_err()?;
  let deck = DeckId(tx.last_insert_rowid());
  tx.execute(
    "INSERT INTO deck_ownership (deck_id, player_id) VALUES (?1, ?2)",
    rusqlite::params![deck.0, player.0],
  )
  .db_err()?;
  Ok(Deck { deck_id: deck, name: name.to_string(), owner_id: player })
}

/// Set a requirement to exactly `qty` (overwrite, not add). Zero deletes the
/// row; deleting an absent row is a no-op.
pub(crate) fn set_requirement_tx(
  tx: &Transaction<'_>,
  deck: DeckId,
  card: CardId,
  qty: i64,
) -> Result<()> {
  ensure_deck(tx, deck)?;
  ensure_card(tx, card)?;

  if qty == 0 {
    tx.execute(
      "DELETE FROM deck_requirements WHERE deck_id = ?1 AND card_id = ?2",
      rusqlite::params![deck.0, card.0],
    )
    .db_err()?;
    return Ok(());
  }

  tx.execute(
    "INSERT INTO deck_requirements (deck_id, card_id, qty) VALUES (?1, ?2, ?3)
     ON CONFLICT (deck_id, card_id) DO UPDATE SET qty = excluded.qty",
    rusqlite::params![deck.0, card.0, qty],
  )
  .db_err()?;
  Ok(())
}

/// Requirement minus holding per card, positive entries only, largest
/// shortfall first with card id as the deterministic tie-break.
pub(crate) fn shortfall_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  deck: DeckId,
) -> Result<Vec<Shortfall>> {
  ensure_deck(tx, deck)?;

  let mut stmt = tx
    .prepare(
      "SELECT r.card_id, r.qty - COALESCE(h.qty, 0) AS shortfall
       FROM deck_requirements r
       LEFT JOIN card_holdings h
         ON h.card_id = r.card_id AND h.player_id = ?1
       WHERE r.deck_id = ?2 AND r.qty - COALESCE(h.qty, 0) > 0
       ORDER BY shortfall DESC, r.card_id ASC",
    )
    .db_err()?;

  let rows = stmt
    .query_map(rusqlite::params![player.0, deck.0], |row| {
      Ok(Shortfall { card_id: CardId(row.get(0)?), shortfall: row.get(1)? })
    })
    .db_err()?
    .collect::<rusqlite::Result<Vec<_>>>()
    .db_err()?;

  Ok(rows)
}

pub(crate) fn deck_owner_tx(tx: &Transaction<'_>, deck: DeckId) -> Result<PlayerId> {
  tx.query_row(
    "SELECT player_id FROM deck_ownership WHERE deck_id = ?1",
    rusqlite::params![deck.0],
    |row| row.get(0),
  )
  .optional()
  .db_err()?
  .map(PlayerId)
  .ok_or(Error::DeckNotFound(deck))
}
