//! Event registry: registration under a hard per-size capacity ceiling.
//!
//! The count-compare-insert sequence is only safe because the whole scope
//! holds the store's write lock (see `pool`): no other join can commit a
//! registration between this scope's count and its insert. A bare
//! count-then-insert without that lock would admit two concurrent joins both
//! observing `count < capacity` and both inserting.

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Transaction};
use topdeck_core::{
  Error, Result,
  event::{Event, EventSize, NewEvent, Registration},
  id::{DeckId, EventId, PlayerId},
};

use crate::{
  catalog::{ensure_deck, ensure_shop},
  encode::{decode_date, decode_size, decode_time, encode_dt, encode_size},
  error::SqliteResultExt as _,
};

pub(crate) fn create_event_tx(tx: &Transaction<'_>, input: &NewEvent) -> Result<Event> {
  ensure_shop(tx, input.shop_id)?;

  tx.execute(
    "INSERT INTO events (name, format, date, time, size, round_type, shop_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      input.name,
      input.format,
      input.date.to_string(),
      input.time.to_string(),
      encode_size(input.size),
      input.round_type,
      input.shop_id.0,
    ],
  )
  .db_err()?;

  Ok(Event {
    event_id:   EventId(tx.last_insert_rowid()),
    name:       input.name.clone(),
    format:     input.format.clone(),
    date:       input.date,
    time:       input.time,
    size:       input.size,
    round_type: input.round_type.clone(),
    shop_id:    input.shop_id,
  })
}

pub(crate) fn join_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  event: EventId,
  deck: DeckId,
) -> Result<Registration> {
  let size = event_size_tx(tx, event)?;
  ensure_deck(tx, deck)?;

  let duplicate: bool = tx
    .query_row(
      "SELECT 1 FROM event_registrations WHERE player_id = ?1 AND event_id = ?2",
      rusqlite::params![player.0, event.0],
      |_| Ok(()),
    )
    .optional()
    .db_err()?
    .is_some();
  if duplicate {
    return Err(Error::DuplicateRegistration { player, event });
  }

  let capacity = size.capacity();
  let count = registration_count_tx(tx, event)?;
  if count >= i64::from(capacity) {
    return Err(Error::CapacityExceeded { capacity });
  }

  let registered_at = Utc::now();
  tx.execute(
    "INSERT INTO event_registrations (player_id, event_id, deck_id, registered_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![player.0, event.0, deck.0, encode_dt(registered_at)],
  )
  .db_err()?;

  Ok(Registration { player_id: player, event_id: event, deck_id: deck, registered_at })
}

/// Withdrawal simply deletes the row; withdrawing an absent registration is
/// a no-op.
pub(crate) fn withdraw_tx(
  tx: &Transaction<'_>,
  player: PlayerId,
  event: EventId,
) -> Result<()> {
  event_size_tx(tx, event)?;
  tx.execute(
    "DELETE FROM event_registrations WHERE player_id = ?1 AND event_id = ?2",
    rusqlite::params![player.0, event.0],
  )
  .db_err()?;
  Ok(())
}

pub(crate) fn registration_count_tx(
  tx: &Transaction<'_>,
  event: EventId,
) -> Result<i64> {
  tx.query_row(
    "SELECT COUNT(*) FROM event_registrations WHERE event_id = ?1",
    rusqlite::params![event.0],
    |row| row.get(0),
  )
  .db_err()
}

pub(crate) fn event_size_tx(tx: &Transaction<'_>, event: EventId) -> Result<EventSize> {
  let size: Option<String> = tx
    .query_row(
      "SELECT size FROM events WHERE event_id = ?1",
      rusqlite::params![event.0],
      |row| row.get(0),
    )
    .optional()
    .db_err()?;
  match size {
    Some(size) => decode_size(&size),
    None => Err(Error::EventNotFound(event)),
  }
}

pub(crate) fn get_event_tx(tx: &Transaction<'_>, event: EventId) -> Result<Event> {
  let row: Option<(String, String, String, String, String, String, i64)> = tx
    .query_row(
      "SELECT name, format, date, time, size, round_type, shop_id
       FROM events WHERE event_id = ?1",
      rusqlite::params![event.0],
      |row| {
        Ok((
          row.get(0)?,
          row.get(1)?,
          row.get(2)?,
          row.get(3)?,
          row.get(4)?,
          row.get(5)?,
          row.get(6)?,
        ))
      },
    )
    .optional()
    .db_err()?;

  let Some((name, format, date, time, size, round_type, shop_id)) = row else {
    return Err(Error::EventNotFound(event));
  };

  Ok(Event {
    event_id: event,
    name,
    format,
    date: decode_date(&date)?,
    time: decode_time(&time)?,
    size: decode_size(&size)?,
    round_type,
    shop_id: topdeck_core::id::ShopId(shop_id),
  })
}
