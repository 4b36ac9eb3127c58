//! Typed identifiers for every persisted entity.
//!
//! Ids are integer rowids assigned by the store. Wrapping them in per-entity
//! newtypes keeps a `PlayerId` from ever being passed where a `ShopId` is
//! expected; serde serialises them transparently as plain integers.

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
  ($(#[$doc:meta])* $name:ident) => {
    $(#[$doc])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self {
        Self(raw)
      }
    }
  };
}

id_newtype!(
  /// A registered player.
  PlayerId
);
id_newtype!(
  /// A shop selling products and organising events.
  ShopId
);
id_newtype!(
  /// A card in the catalog.
  CardId
);
id_newtype!(
  /// A product in the catalog; may link to a card.
  ProductId
);
id_newtype!(
  /// A deck built by a player.
  DeckId
);
id_newtype!(
  /// An organised event.
  EventId
);
id_newtype!(
  /// A completed sale.
  SaleId
);
