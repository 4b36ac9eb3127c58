//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use topdeck_core::Error as MarketError;

/// An error returned by an API handler.
///
/// Business failures map to 4xx; infrastructure failures map to 503 with a
/// generic message so driver details never leak to clients.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub MarketError);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self.0 {
      MarketError::ShopNotFound(_)
      | MarketError::ProductNotFound(_)
      | MarketError::CardNotFound(_)
      | MarketError::DeckNotFound(_)
      | MarketError::EventNotFound(_)
      | MarketError::ListingNotFound { .. } => {
        (StatusCode::NOT_FOUND, self.0.to_string())
      }
      MarketError::InsufficientStock { .. }
      | MarketError::InsufficientQuantity { .. }
      | MarketError::CapacityExceeded { .. }
      | MarketError::DuplicateRegistration { .. } => {
        (StatusCode::CONFLICT, self.0.to_string())
      }
      MarketError::InvalidQuantity(_) | MarketError::InvalidPrice(_) => {
        (StatusCode::BAD_REQUEST, self.0.to_string())
      }
      MarketError::PoolExhausted | MarketError::TransactionAborted(_) => (
        StatusCode::SERVICE_UNAVAILABLE,
        "store temporarily unavailable".to_string(),
      ),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
