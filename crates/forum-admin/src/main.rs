//! `forumctl`: operator tool for a forum database.
//!
//! Reads `forum.toml` (or the path given with `--config`), layers `FORUM_*`
//! environment variables on top, opens the store and runs one model
//! operation. Records are printed as JSON.
//!
//! ```
//! forumctl topic add rust "Rust" "All things Rust"
//! forumctl thread add rust ada@example.com "Hello" "First post" --tag intro
//! FORUM_STORE__PATH=/tmp/f.db forumctl thread list rust
//! ```

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use forum_store_sqlite::{Db, StoreConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

#[derive(Parser)]
#[command(name = "forumctl", author, version, about = "Forum database operator tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "forum.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Deserialize)]
struct Settings {
  store: StoreConfig,
}

fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout stays machine-readable.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .set_default("store.path", "forum.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("FORUM")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let mut settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;
  settings.store.path = expand_tilde(&settings.store.path);

  let db = Db::open(&settings.store)
    .with_context(|| format!("failed to open store at {:?}", settings.store.path))?;
  tracing::debug!(path = ?settings.store.path, "store ready");

  commands::run(&db, cli.command)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
