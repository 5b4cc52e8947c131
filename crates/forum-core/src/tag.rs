//! Tag: a per-topic label attached to threads.

use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// A tag. The owning [`Topic`] is looked up on read, never stored twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
  pub id:    i64,
  pub name:  String,
  pub topic: Topic,
}

impl Tag {
  pub fn url(&self) -> String {
    format!("{}/{}", self.topic.tags_url(), self.name)
  }
}
