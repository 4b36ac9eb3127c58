//! Handlers for `/collection` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/collection/credit` | Add copies of a card to a player |
//! | `POST` | `/collection/debit` | Remove copies; 409 if the player holds too few |

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use topdeck_core::{
  collection::CardHolding,
  id::{CardId, PlayerId},
  store::MarketStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AdjustBody {
  pub player_id: PlayerId,
  pub card_id:   CardId,
  pub qty:       i64,
}

/// `POST /collection/credit` — body: `{"player_id":1,"card_id":2,"qty":3}`
pub async fn credit<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<AdjustBody>,
) -> Result<Json<CardHolding>, ApiError>
where
  S: MarketStore,
{
  let holding = store.credit_card(body.player_id, body.card_id, body.qty).await?;
  Ok(Json(holding))
}

/// `POST /collection/debit` — responds with the quantity left after the
/// debit; zero means the holding row is gone.
pub async fn debit<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<AdjustBody>,
) -> Result<Json<Value>, ApiError>
where
  S: MarketStore,
{
  let remaining = store.debit_card(body.player_id, body.card_id, body.qty).await?;
  Ok(Json(json!({ "remaining": remaining })))
}
