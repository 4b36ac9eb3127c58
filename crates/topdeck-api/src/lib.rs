//! JSON REST API for Topdeck.
//!
//! Exposes an axum [`Router`] backed by any [`topdeck_core::store::MarketStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", topdeck_api::api_router(store.clone()))
//! ```

pub mod collection;
pub mod decks;
pub mod error;
pub mod events;
pub mod inventory;
pub mod purchases;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use topdeck_core::store::MarketStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Inventory
    .route("/inventory/restock", post(inventory::restock::<S>))
    .route("/inventory/list", post(inventory::list_to_shelf::<S>))
    // Purchases
    .route("/purchases", post(purchases::create::<S>))
    // Collection
    .route("/collection/credit", post(collection::credit::<S>))
    .route("/collection/debit", post(collection::debit::<S>))
    // Decks
    .route("/decks", post(decks::create::<S>))
    .route("/decks/{id}/requirements", put(decks::set_requirement::<S>))
    .route("/decks/{id}/missing", get(decks::missing::<S>))
    // Events
    .route("/events", post(events::create::<S>))
    .route("/events/{id}/join", post(events::join::<S>))
    .route("/events/{id}/withdraw", post(events::withdraw::<S>))
    .with_state(store)
}
