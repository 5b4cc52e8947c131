//! Topic: a named section of the forum that owns threads and tags.

use serde::{Deserialize, Serialize};

/// A forum topic. `name` is the lowercase slug used to build URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
  pub id:          i64,
  pub name:        String,
  pub title:       String,
  pub description: String,
}

impl Topic {
  /// The unique URL for the topic.
  pub fn url(&self) -> String { format!("/s/{}", self.name) }

  /// The page for posting a new thread under the topic.
  pub fn new_post_url(&self) -> String { format!("{}/new", self.url()) }

  /// The page listing the topic's tags.
  pub fn tags_url(&self) -> String { format!("{}/tags", self.url()) }

  /// The page for creating a new tag under the topic.
  pub fn new_tag_url(&self) -> String { format!("{}/new", self.tags_url()) }
}
