//! Bounded connection pool and the transaction scope built on it.
//!
//! The pool is an explicit resource handle: it is created once at startup,
//! passed to the store, and drained at shutdown — never reached through a
//! global. Acquisition waits are bounded; a caller that cannot get a
//! connection within the configured timeout sees `PoolExhausted` rather than
//! an indefinite stall.
//!
//! [`Pool::transaction`] is the only way work reaches a connection. It runs
//! the unit of work inside `BEGIN IMMEDIATE`, commits on `Ok`, rolls back on
//! `Err` or when the caller goes away mid-flight, and returns the connection
//! to the pool (or closes it once the pool has shut down). SQLite serialises
//! writers holding the immediate lock, so every read a unit of work performs
//! is stable for the scope's duration — this is what makes the purchase and
//! registration flows race-free. Lock waits are bounded by the per-connection
//! busy timeout and surface as the retryable `TransactionAborted`.

use std::{
  path::{Path, PathBuf},
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use rusqlite::{Transaction, TransactionBehavior};
use tokio::sync::Semaphore;
use topdeck_core::{Error, Result};

use crate::{
  error::{from_call, from_sqlite},
  schema::SCHEMA,
};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PoolConfig {
  /// Connections opened eagerly at startup.
  pub min_connections: usize,
  /// Hard ceiling on concurrently checked-out connections.
  pub max_connections: usize,
  /// Bounded wait for a free connection before `PoolExhausted`.
  pub acquire_timeout: Duration,
  /// Bounded wait on the store's write lock before `TransactionAborted`.
  pub busy_timeout:    Duration,
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self {
      min_connections: 1,
      max_connections: 20,
      acquire_timeout: Duration::from_secs(5),
      busy_timeout:    Duration::from_secs(5),
    }
  }
}

// ─── Pool ────────────────────────────────────────────────────────────────────

/// A bounded pool of SQLite connections over one database file.
///
/// Cloning is cheap — the inner state is reference-counted.
#[derive(Clone)]
pub struct Pool {
  inner: Arc<PoolInner>,
}

struct PoolInner {
  path:    PathBuf,
  config:  PoolConfig,
  idle:    Mutex<Vec<tokio_rusqlite::Connection>>,
  permits: Arc<Semaphore>,
}

impl Pool {
  /// Open a pool over the database at `path` and run schema initialisation.
  ///
  /// `min_connections` are opened eagerly; the pool lazily grows to
  /// `max_connections` under load.
  pub async fn open(path: impl AsRef<Path>, config: PoolConfig) -> Result<Self> {
    let path = path.as_ref().to_path_buf();

    let first = open_connection(&path, config.busy_timeout).await?;
    first
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(from_call)?;

    let mut idle = vec![first];
    let eager = config.min_connections.clamp(1, config.max_connections.max(1));
    for _ in 1..eager {
      idle.push(open_connection(&path, config.busy_timeout).await?);
    }

    Ok(Self {
      inner: Arc::new(PoolInner {
        permits: Arc::new(Semaphore::new(config.max_connections.max(1))),
        idle: Mutex::new(idle),
        path,
        config,
      }),
    })
  }

  /// Run `work` inside one immediate transaction on a pooled connection.
  ///
  /// Commits when `work` returns `Ok`, rolls back when it returns `Err`;
  /// either way the connection goes back to the pool before the result is
  /// handed to the caller. If the caller's future is dropped mid-flight,
  /// the in-flight unit of work still runs on the worker thread but is
  /// abandoned at its commit point: the transaction rolls back instead of
  /// committing, and the connection is discarded.
  pub async fn transaction<T, F>(&self, work: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let permit = tokio::time::timeout(
      self.inner.config.acquire_timeout,
      Arc::clone(&self.inner.permits).acquire_owned(),
    )
    .await
    .map_err(|_| Error::PoolExhausted)?
    .map_err(|_| Error::PoolExhausted)?;

    let conn = match self.pop_idle() {
      Some(conn) => conn,
      None => {
        open_connection(&self.inner.path, self.inner.config.busy_timeout).await?
      }
    };

    let outcome = run_in_transaction(&conn, work).await;

    if self.inner.permits.is_closed() {
      // The pool shut down while this work was in flight; finish the drain
      // here instead of re-idling a connection nobody will close.
      if let Err(e) = conn.close().await {
        tracing::warn!("error closing pooled connection: {e}");
      }
    } else {
      self.push_idle(conn);
    }
    drop(permit);
    outcome
  }

  /// Drain the pool, closing every idle connection. Connections checked out
  /// at this moment are closed when their work finishes instead of rejoining
  /// the pool. New acquisitions fail with `PoolExhausted` afterwards.
  pub async fn close(&self) {
    self.inner.permits.close();
    let idle: Vec<_> = {
      let mut guard = lock_idle(&self.inner.idle);
      guard.drain(..).collect()
    };
    for conn in idle {
      if let Err(e) = conn.close().await {
        tracing::warn!("error closing pooled connection: {e}");
      }
    }
  }

  fn pop_idle(&self) -> Option<tokio_rusqlite::Connection> {
    lock_idle(&self.inner.idle).pop()
  }

  fn push_idle(&self, conn: tokio_rusqlite::Connection) {
    lock_idle(&self.inner.idle).push(conn);
  }
}

fn lock_idle(
  idle: &Mutex<Vec<tokio_rusqlite::Connection>>,
) -> std::sync::MutexGuard<'_, Vec<tokio_rusqlite::Connection>> {
  idle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Connection setup ────────────────────────────────────────────────────────

async fn open_connection(
  path: &Path,
  busy_timeout: Duration,
) -> Result<tokio_rusqlite::Connection> {
  let conn = tokio_rusqlite::Connection::open(path)
    .await
    .map_err(from_call)?;
  conn
    .call(move |conn| {
      // Both pragmas are per-connection, so they are set here rather than
      // in the schema batch.
      conn.busy_timeout(busy_timeout)?;
      conn.pragma_update(None, "foreign_keys", true)?;
      Ok(())
    })
    .await
    .map_err(from_call)?;
  Ok(conn)
}

// ─── Transaction scope ───────────────────────────────────────────────────────

/// Raises its flag when dropped before being disarmed. The flag lets the
/// worker-thread closure observe that the awaiting caller has gone away.
struct CancelOnDrop {
  flag:  Arc<AtomicBool>,
  armed: bool,
}

impl CancelOnDrop {
  fn disarm(mut self) {
    self.armed = false;
  }
}

impl Drop for CancelOnDrop {
  fn drop(&mut self) {
    if self.armed {
      self.flag.store(true, Ordering::SeqCst);
    }
  }
}

async fn run_in_transaction<T, F>(
  conn: &tokio_rusqlite::Connection,
  work: F,
) -> Result<T>
where
  F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  T: Send + 'static,
{
  let cancelled = Arc::new(AtomicBool::new(false));
  let guard = CancelOnDrop { flag: Arc::clone(&cancelled), armed: true };

  let outcome = conn
    .call(move |raw| {
      let tx = match raw.transaction_with_behavior(TransactionBehavior::Immediate) {
        Ok(tx) => tx,
        Err(e) => return Ok(Err(from_sqlite(e))),
      };
      let value = match work(&tx) {
        Ok(value) => value,
        Err(business) => {
          // Transaction also rolls back on drop; an explicit rollback lets
          // a failure there be logged without masking the business error.
          if let Err(e) = tx.rollback() {
            tracing::warn!("rollback failed: {e}");
          }
          return Ok(Err(business));
        }
      };
      // A caller dropped mid-flight must see its operation undone, so the
      // abandon check happens last, right before the commit.
      if cancelled.load(Ordering::SeqCst) {
        if let Err(e) = tx.rollback() {
          tracing::warn!("rollback failed: {e}");
        }
        return Ok(Err(Error::TransactionAborted("caller cancelled".to_string())));
      }
      match tx.commit() {
        Ok(()) => Ok(Ok(value)),
        Err(e) => Ok(Err(from_sqlite(e))),
      }
    })
    .await;

  guard.disarm();
  match outcome {
    Ok(result) => result,
    Err(e) => Err(from_call(e)),
  }
}
