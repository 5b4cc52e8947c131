//! Error type for `forum-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input rejected before any statement was issued.
  #[error(transparent)]
  Core(#[from] forum_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("connection pool error: {0}")]
  Pool(#[from] r2d2::Error),

  /// A single-row query matched no rows.
  #[error("not found")]
  NotFound,

  /// A single-row query matched more than one row.
  #[error("expected 1 row, got {0}")]
  Ambiguous(usize),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  pub fn is_invalid_input(&self) -> bool {
    matches!(self, Self::Core(forum_core::Error::InvalidInput(_)))
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
