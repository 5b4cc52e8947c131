//! Store configuration, deserialized by whatever hosts the store.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Database file, or `:memory:`.
  pub path:            PathBuf,
  /// Upper bound on pooled connections.
  #[serde(default = "default_pool_size")]
  pub pool_size:       u32,
  /// How long a statement waits on a locked database before failing.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_pool_size() -> u32 { 8 }

fn default_busy_timeout_ms() -> u64 { 5_000 }

impl StoreConfig {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path:            path.as_ref().to_path_buf(),
      pool_size:       default_pool_size(),
      busy_timeout_ms: default_busy_timeout_ms(),
    }
  }

  pub fn in_memory() -> Self { Self::new(IN_MEMORY) }

  pub fn is_in_memory(&self) -> bool { self.path.as_os_str() == IN_MEMORY }
}
