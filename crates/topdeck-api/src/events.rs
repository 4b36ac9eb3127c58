//! Handlers for `/events` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/events` | Create an event at a shop |
//! | `POST` | `/events/:id/join` | 409 when full or already registered |
//! | `POST` | `/events/:id/withdraw` | Idempotent; 404 only for a missing event |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use topdeck_core::{
  event::NewEvent,
  id::{DeckId, EventId, PlayerId},
  store::MarketStore,
};

use crate::error::ApiError;

/// `POST /events` — body is a full [`NewEvent`]; capacity follows from `size`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketStore,
{
  let event = store.create_event(body).await?;
  Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Debug, Deserialize)]
pub struct JoinBody {
  pub player_id: PlayerId,
  pub deck_id:   DeckId,
}

/// `POST /events/:id/join` — body: `{"player_id":1,"deck_id":2}`
pub async fn join<S>(
  State(store): State<Arc<S>>,
  Path(event): Path<EventId>,
  Json(body): Json<JoinBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketStore,
{
  let registration = store.join_event(body.player_id, event, body.deck_id).await?;
  Ok((StatusCode::CREATED, Json(registration)))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawBody {
  pub player_id: PlayerId,
}

/// `POST /events/:id/withdraw`
pub async fn withdraw<S>(
  State(store): State<Arc<S>>,
  Path(event): Path<EventId>,
  Json(body): Json<WithdrawBody>,
) -> Result<StatusCode, ApiError>
where
  S: MarketStore,
{
  store.withdraw_from_event(body.player_id, event).await?;
  Ok(StatusCode::NO_CONTENT)
}
