//! Sales — the append-only record of completed purchases.
//!
//! A sale and its lines are written exactly once, inside the purchase
//! transaction, and never updated or deleted afterwards. Each line captures
//! the shelf price at the moment of sale so the sale total stays
//! reconstructable after the shop re-prices the listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{PlayerId, ProductId, SaleId, ShopId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
  pub sale_id:     SaleId,
  pub occurred_at: DateTime<Utc>,
  pub buyer_id:    PlayerId,
  pub shop_id:     ShopId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
  pub sale_id:    SaleId,
  pub product_id: ProductId,
  pub qty:        i64,
  pub unit_price: i64,
}

/// The successful outcome of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
  pub sale_id:         SaleId,
  /// `qty * unit price` at the moment of sale.
  pub amount_due:      i64,
  /// Shelf quantity left after the purchase.
  pub shelf_remaining: i64,
}
