//! Player card holdings.

use serde::{Deserialize, Serialize};

use crate::id::{CardId, PlayerId};

/// A player's owned quantity of a specific card.
///
/// A holding row exists if and only if the quantity is positive; debiting a
/// holding to zero deletes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHolding {
  pub player_id: PlayerId,
  pub card_id:   CardId,
  pub qty:       i64,
}
