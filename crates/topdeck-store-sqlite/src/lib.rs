//! SQLite backend for the Topdeck marketplace.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on dedicated threads
//! without blocking the async runtime. Connections come from a bounded
//! [`pool::Pool`]; every store operation runs inside exactly one immediate
//! transaction acquired from it, so multi-row writes are all-or-nothing and
//! concurrent writers are serialised by the store itself.

mod catalog;
mod collection;
mod decks;
mod encode;
mod error;
mod events;
mod inventory;
mod market;
mod purchase;
mod schema;

pub mod pool;

pub use market::SqliteMarket;
pub use pool::{Pool, PoolConfig};

#[cfg(test)]
mod tests;
