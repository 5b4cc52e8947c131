//! Core records and input rules for the forum.
//!
//! This crate is free of database dependencies. The records here carry no
//! persistence logic; storage backends (e.g. `forum-store-sqlite`) build and
//! hydrate them.

pub mod error;
pub mod tag;
pub mod thread;
pub mod topic;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
pub use tag::Tag;
pub use thread::Thread;
pub use topic::Topic;
pub use user::User;
