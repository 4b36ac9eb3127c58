//! Events and registrations.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::id::{DeckId, EventId, PlayerId, ShopId};

/// An event's size tier. Each tier maps to a fixed maximum registration
/// count which the registry never exceeds.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventSize {
  Small,
  Local,
  Regional,
  Major,
}

impl EventSize {
  /// The hard registration ceiling for this tier.
  pub fn capacity(self) -> u32 {
    match self {
      EventSize::Small => 8,
      EventSize::Local => 16,
      EventSize::Regional => 32,
      EventSize::Major => 64,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub event_id:   EventId,
  pub name:       String,
  /// Play format, e.g. "standard" or "open". Free text, not interpreted.
  pub format:     String,
  pub date:       NaiveDate,
  pub time:       NaiveTime,
  pub size:       EventSize,
  /// How rounds are run, e.g. "swiss" or "single elimination".
  pub round_type: String,
  /// The organising shop.
  pub shop_id:    ShopId,
}

/// Input for publishing a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
  pub name:       String,
  pub format:     String,
  pub date:       NaiveDate,
  pub time:       NaiveTime,
  pub size:       EventSize,
  pub round_type: String,
  pub shop_id:    ShopId,
}

/// A player's registration for an event, with the deck they intend to play.
///
/// Lifecycle: absent → registered (join) → withdrawn (explicit deletion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
  pub player_id:     PlayerId,
  pub event_id:      EventId,
  pub deck_id:       DeckId,
  pub registered_at: DateTime<Utc>,
}
