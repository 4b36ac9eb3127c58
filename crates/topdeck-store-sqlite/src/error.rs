//! Mapping from driver-level failures onto the core taxonomy.
//!
//! Business-rule errors are produced directly by the ledger modules; anything
//! the SQLite driver reports (busy timeout, constraint backstop, I/O) is an
//! infrastructure failure and surfaces as `TransactionAborted`, keeping the
//! driver detail in the payload for logs only.

use topdeck_core::{Error, Result};

pub(crate) fn from_sqlite(e: rusqlite::Error) -> Error {
  match &e {
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::DatabaseBusy
        || f.code == rusqlite::ErrorCode::DatabaseLocked =>
    {
      Error::TransactionAborted("database busy".to_string())
    }
    _ => Error::TransactionAborted(e.to_string()),
  }
}

pub(crate) fn from_call(e: tokio_rusqlite::Error) -> Error {
  match e {
    tokio_rusqlite::Error::Rusqlite(e) => from_sqlite(e),
    other => Error::TransactionAborted(other.to_string()),
  }
}

/// Shorthand for mapping `rusqlite::Result` into the core taxonomy.
pub(crate) trait SqliteResultExt<T> {
  fn db_err(self) -> Result<T>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
  fn db_err(self) -> Result<T> {
    self.map_err(from_sqlite)
  }
}
