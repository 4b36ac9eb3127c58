//! Two-stage shop stock: warehoused storage and the public shelf.
//!
//! Storage holds quantities a shop has received but not yet listed; the shelf
//! is what buyers see, with a price attached. Rows in both tables are created
//! on first restock/listing and kept once their quantity reaches zero —
//! unlike holdings and requirements, which delete their zero rows.

use serde::{Deserialize, Serialize};

use crate::id::{ProductId, ShopId};

/// A shop's warehoused (not yet listed) quantity of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLevel {
  pub shop_id:    ShopId,
  pub product_id: ProductId,
  pub qty:        i64,
}

/// A shop's publicly listed, purchasable quantity of a product at a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfListing {
  pub shop_id:    ShopId,
  pub product_id: ProductId,
  pub qty:        i64,
  pub price:      i64,
}
