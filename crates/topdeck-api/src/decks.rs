//! Handlers for `/decks` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/decks` | Create a deck owned by a player |
//! | `PUT`  | `/decks/:id/requirements` | Set a card requirement (0 removes it) |
//! | `GET`  | `/decks/:id/missing?player_id=` | Shortfall report |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use topdeck_core::{
  deck::{Deck, Shortfall},
  id::{CardId, DeckId, PlayerId},
  store::MarketStore,
};

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub player_id: PlayerId,
  pub name:      String,
}

/// `POST /decks` — body: `{"player_id":1,"name":"Mono Blue"}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketStore,
{
  let deck = store.create_deck(body.player_id, body.name).await?;
  Ok((StatusCode::CREATED, Json(deck)))
}

// ─── Requirements ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RequirementBody {
  pub card_id: CardId,
  pub qty:     i64,
}

/// `PUT /decks/:id/requirements` — sets the requirement to exactly `qty`;
/// `0` deletes it.
pub async fn set_requirement<S>(
  State(store): State<Arc<S>>,
  Path(deck): Path<DeckId>,
  Json(body): Json<RequirementBody>,
) -> Result<StatusCode, ApiError>
where
  S: MarketStore,
{
  store.set_deck_requirement(deck, body.card_id, body.qty).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Missing cards ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MissingParams {
  pub player_id: PlayerId,
}

/// `GET /decks/:id/missing?player_id=<id>`
pub async fn missing<S>(
  State(store): State<Arc<S>>,
  Path(deck): Path<DeckId>,
  Query(params): Query<MissingParams>,
) -> Result<Json<Vec<Shortfall>>, ApiError>
where
  S: MarketStore,
{
  let report = store.missing_cards(params.player_id, deck).await?;
  Ok(Json(report))
}
