//! [`Db`]: the single execution surface every model goes through.
//!
//! Each operation takes an `Option<&Tx>`. With a transaction the statement
//! joins the caller's unit of work and becomes durable only when the caller
//! commits. Without one, a connection is borrowed from the pool for the
//! duration of the call and the statement autocommits.
//!
//! Errors from SQLite or the pool are returned as they are. Nothing here
//! retries, and nothing here commits or rolls back a caller's [`Tx`].

use std::{
  ops::Deref,
  sync::atomic::{AtomicU64, Ordering},
  time::Duration,
};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, Row, Rows, params_from_iter, types::Value};

use crate::{Error, Result, config::StoreConfig, schema::SCHEMA};

type SqlitePool = Pool<SqliteConnectionManager>;
type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Distinguishes the shared-cache databases behind separate in-memory stores.
static MEMORY_STORES: AtomicU64 = AtomicU64::new(0);

// ─── Transaction handle ──────────────────────────────────────────────────────

/// An open transaction on one pooled connection.
///
/// Created by [`Db::begin`] and owned by exactly one unit of work. Pass
/// `Some(&tx)` to every model call that belongs to it, then [`commit`] or
/// [`rollback`]. A `Tx` dropped without either is rolled back.
///
/// [`commit`]: Tx::commit
/// [`rollback`]: Tx::rollback
pub struct Tx {
  conn:     PooledConn,
  finished: bool,
}

impl Tx {
  fn begin(conn: PooledConn) -> Result<Self> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    Ok(Self { conn, finished: false })
  }

  pub fn commit(mut self) -> Result<()> {
    self.conn.execute_batch("COMMIT")?;
    self.finished = true;
    Ok(())
  }

  pub fn rollback(mut self) -> Result<()> {
    self.conn.execute_batch("ROLLBACK")?;
    self.finished = true;
    Ok(())
  }

  pub(crate) fn connection(&self) -> &Connection { &self.conn }

  #[cfg(test)]
  pub(crate) fn connection_mut(&mut self) -> &mut Connection { &mut self.conn }
}

impl Drop for Tx {
  fn drop(&mut self) {
    if self.finished || self.conn.is_autocommit() {
      return;
    }
    if let Err(e) = self.conn.execute_batch("ROLLBACK") {
      tracing::warn!(error = %e, "rollback of abandoned transaction failed");
    }
  }
}

// ─── Routing ─────────────────────────────────────────────────────────────────

/// Where a single accessor call runs.
enum Route<'a> {
  Pooled(PooledConn),
  Shared(&'a Connection),
}

impl Route<'_> {
  fn name(&self) -> &'static str {
    match self {
      Route::Pooled(_) => "pooled",
      Route::Shared(_) => "transaction",
    }
  }
}

impl Deref for Route<'_> {
  type Target = Connection;

  fn deref(&self) -> &Connection {
    match self {
      Route::Pooled(conn) => &**conn,
      Route::Shared(conn) => *conn,
    }
  }
}

/// Outcome of [`Db::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
  pub rows_affected:  usize,
  /// Rowid of the most recent successful insert on the connection used.
  pub last_insert_id: i64,
}

// ─── Db ──────────────────────────────────────────────────────────────────────

/// Handle to the process-wide connection pool.
///
/// Cloning is cheap; the pool is reference-counted. Construct one at startup
/// and hand clones to each model.
#[derive(Clone)]
pub struct Db {
  pool: SqlitePool,
}

impl Db {
  /// Open (or create) the store described by `config` and run schema
  /// initialisation.
  pub fn open(config: &StoreConfig) -> Result<Self> {
    let busy = Duration::from_millis(config.busy_timeout_ms);

    let pool = if config.is_in_memory() {
      // A named shared-cache database lives as long as one connection to it
      // stays open, so the pool keeps at least one and never recycles them.
      let uri = format!(
        "file:forum-{}-{}?mode=memory&cache=shared",
        std::process::id(),
        MEMORY_STORES.fetch_add(1, Ordering::Relaxed),
      );
      let manager = SqliteConnectionManager::file(uri)
        .with_flags(OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI)
        .with_init(move |c| configure(c, busy, false));
      Pool::builder()
        .max_size(config.pool_size.max(1))
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)?
    } else {
      let manager = SqliteConnectionManager::file(&config.path)
        .with_init(move |c| configure(c, busy, true));
      Pool::builder().max_size(config.pool_size.max(1)).build(manager)?
    };

    let db = Self { pool };
    db.init_schema()?;
    tracing::debug!(path = %config.path.display(), "store opened");
    Ok(db)
  }

  /// Open a private in-memory store, useful for testing.
  ///
  /// Connections share one cache, so table locks are per table: while a
  /// [`Tx`] is open, standalone calls read untouched tables normally and fail
  /// at once with `SQLITE_LOCKED` on tables the `Tx` has written.
  pub fn open_in_memory() -> Result<Self> { Self::open(&StoreConfig::in_memory()) }

  fn init_schema(&self) -> Result<()> {
    self.pool.get()?.execute_batch(SCHEMA)?;
    Ok(())
  }

  /// Start a unit of work on a dedicated pooled connection.
  pub fn begin(&self) -> Result<Tx> { Tx::begin(self.pool.get()?) }

  fn route<'a>(&self, tx: Option<&'a Tx>) -> Result<Route<'a>> {
    Ok(match tx {
      Some(tx) => Route::Shared(tx.connection()),
      None => Route::Pooled(self.pool.get()?),
    })
  }

  /// Run a statement that returns no rows.
  pub fn execute(&self, tx: Option<&Tx>, sql: &str, args: &[Value]) -> Result<Executed> {
    let conn = self.route(tx)?;
    tracing::trace!(route = conn.name(), sql, "execute");
    let rows_affected = conn.execute(sql, params_from_iter(args.iter()))?;
    Ok(Executed { rows_affected, last_insert_id: conn.last_insert_rowid() })
  }

  /// Open a cursor over the rows of `sql` and hand it to `scan`.
  ///
  /// The cursor, statement and any borrowed connection are released when
  /// `scan` returns, whether it succeeded or not.
  pub fn query<T, F>(&self, tx: Option<&Tx>, sql: &str, args: &[Value], scan: F) -> Result<T>
  where
    F: FnOnce(&mut Rows<'_>) -> Result<T>,
  {
    let conn = self.route(tx)?;
    tracing::trace!(route = conn.name(), sql, "query");
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    scan(&mut rows)
  }

  /// Map every row of `sql`. No rows is an empty `Vec`; the first failing row
  /// aborts the whole read.
  pub fn fetch_many<T, F>(
    &self,
    tx: Option<&Tx>,
    sql: &str,
    args: &[Value],
    mut map: F,
  ) -> Result<Vec<T>>
  where
    F: FnMut(&Row<'_>) -> Result<T>,
  {
    self.query(tx, sql, args, |rows| {
      let mut out = Vec::new();
      while let Some(row) = rows.next()? {
        out.push(map(row)?);
      }
      Ok(out)
    })
  }

  /// Map the single row of `sql`.
  ///
  /// Fails with [`Error::NotFound`] on zero rows and [`Error::Ambiguous`] on
  /// more than one.
  pub fn fetch_one<T, F>(&self, tx: Option<&Tx>, sql: &str, args: &[Value], map: F) -> Result<T>
  where
    F: FnMut(&Row<'_>) -> Result<T>,
  {
    let mut found = self.fetch_many(tx, sql, args, map)?;
    match (found.pop(), found.len()) {
      (Some(one), 0) => Ok(one),
      (Some(_), rest) => Err(Error::Ambiguous(rest + 1)),
      (None, _) => Err(Error::NotFound),
    }
  }
}

/// Per-connection setup, run by the pool whenever it opens a connection.
fn configure(conn: &mut Connection, busy: Duration, wal: bool) -> rusqlite::Result<()> {
  conn.busy_timeout(busy)?;
  conn.execute_batch("PRAGMA foreign_keys = ON;")?;
  if wal {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
  }
  Ok(())
}
