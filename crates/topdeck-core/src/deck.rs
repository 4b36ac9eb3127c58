//! Decks, their card requirements, and the derived shortfall report.

use serde::{Deserialize, Serialize};

use crate::id::{CardId, DeckId, PlayerId};

/// A deck and its single owning player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
  pub deck_id:  DeckId,
  pub name:     String,
  pub owner_id: PlayerId,
}

/// A deck's needed quantity of a specific card.
///
/// Same zero-row rule as holdings: the row exists iff the quantity is
/// positive. Setting a requirement to zero deletes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRequirement {
  pub deck_id: DeckId,
  pub card_id: CardId,
  pub qty:     i64,
}

/// One entry of the missing-cards report: requirement minus holding, when
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
  pub card_id:   CardId,
  pub shortfall: i64,
}
