//! Handlers for `/inventory` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/inventory/restock` | Add stock to a shop's storage |
//! | `POST` | `/inventory/list` | Move stock from storage to the shelf |

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use topdeck_core::{
  id::{ProductId, ShopId},
  inventory::{ShelfListing, StorageLevel},
  store::MarketStore,
};

use crate::error::ApiError;

// ─── Restock ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RestockBody {
  pub shop_id:    ShopId,
  pub product_id: ProductId,
  pub qty:        i64,
}

/// `POST /inventory/restock` — body: `{"shop_id":1,"product_id":2,"qty":10}`
pub async fn restock<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RestockBody>,
) -> Result<Json<StorageLevel>, ApiError>
where
  S: MarketStore,
{
  let level = store.restock(body.shop_id, body.product_id, body.qty).await?;
  Ok(Json(level))
}

// ─── List to shelf ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListBody {
  pub shop_id:    ShopId,
  pub product_id: ProductId,
  pub qty:        i64,
  pub price:      i64,
}

/// `POST /inventory/list` — moves `qty` units from storage onto the shelf at
/// `price`, overwriting any previous shelf price.
pub async fn list_to_shelf<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ListBody>,
) -> Result<Json<ShelfListing>, ApiError>
where
  S: MarketStore,
{
  let listing = store
    .list_to_shelf(body.shop_id, body.product_id, body.qty, body.price)
    .await?;
  Ok(Json(listing))
}
