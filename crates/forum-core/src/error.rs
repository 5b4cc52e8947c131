//! Error types for `forum-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// Caller-supplied data was rejected before reaching the store. The message
  /// is suitable for showing to an end user as-is.
  #[error("{0}")]
  InvalidInput(String),
}

impl Error {
  pub fn invalid_input(msg: impl Into<String>) -> Self {
    Self::InvalidInput(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
