//! SQLite backend for the forum.
//!
//! All access is blocking and goes through [`Db`], which routes each call
//! either to a connection borrowed from the process-wide pool or to a
//! caller-owned [`Tx`]. The entity models in [`models`] are thin layers over
//! it: they validate input, build a [`query::Select`], and assemble rows back
//! into `forum_core` records.

mod accessor;
mod encode;
mod schema;

pub mod config;
pub mod error;
pub mod models;
pub mod query;

pub use accessor::{Db, Executed, Tx};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use models::{TagModel, ThreadModel, TopicModel, UserModel};
