//! Handler for `/purchases`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/purchases` | 201 with a receipt; 409 on insufficient stock |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use topdeck_core::{
  id::{PlayerId, ProductId, ShopId},
  store::MarketStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PurchaseBody {
  pub buyer_id:   PlayerId,
  pub shop_id:    ShopId,
  pub product_id: ProductId,
  pub qty:        i64,
}

/// `POST /purchases` — the whole flow (shelf decrement, sale record, card
/// credit) commits or fails as one unit.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<PurchaseBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketStore,
{
  let receipt = store
    .purchase(body.buyer_id, body.shop_id, body.product_id, body.qty)
    .await?;
  Ok((StatusCode::CREATED, Json(receipt)))
}
