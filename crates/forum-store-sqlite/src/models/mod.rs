//! Entity models. Each one wraps a [`Db`](crate::Db) handle and owns the
//! projection and row assembler for its entity.
//!
//! Every method takes an `Option<&Tx>` first: `None` runs the call on its own
//! pooled connection, `Some(tx)` makes it part of the caller's unit of work.
//!
//! Projections alias every column with an entity prefix (`topic_name`,
//! `user_email`, ...) and assemblers read columns by those names, so a joined
//! thread row can be split with the same topic and user assemblers that read
//! the plain tables.

/// Aliased topic columns. A macro so the tag and thread projections can
/// `concat!` them into their own `&'static str`.
macro_rules! topic_columns {
  () => {
    "topics.id AS topic_id, topics.name AS topic_name, \
     topics.title AS topic_title, topics.description AS topic_description"
  };
}

/// Aliased user columns, embedded in the thread projection.
macro_rules! user_columns {
  () => {
    "users.id AS user_id, users.email AS user_email, \
     users.name AS user_name, users.is_admin AS user_is_admin"
  };
}

mod tag;
mod thread;
mod topic;
mod user;

pub use tag::TagModel;
pub use thread::ThreadModel;
pub use topic::TopicModel;
pub use user::UserModel;
