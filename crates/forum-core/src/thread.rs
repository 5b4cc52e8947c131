//! Thread: a post under a topic, with a vote score computed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{topic::Topic, user::User};

/// A thread together with the records it references.
///
/// `score` is never stored; it is the number of votes counted when the thread
/// was read. `topic` and `creator` are always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub is_pinned:  bool,
  pub is_visible: bool,
  pub score:      i64,
  pub topic:      Topic,
  pub creator:    User,
}

impl Thread {
  pub fn url(&self) -> String { format!("/t/{}", self.id) }

  /// Admins and the thread's creator may pin, hide and otherwise moderate it.
  pub fn is_moderatable_by(&self, user: &User) -> bool {
    user.is_admin || user.id == self.creator.id
  }
}
