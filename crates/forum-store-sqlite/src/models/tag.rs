use forum_core::{Tag, Thread, Topic, validate};
use rusqlite::{Row, types::Value};

use crate::{Db, Result, Tx, models::topic::assemble_topic, query::Select};

fn tags() -> Select {
  Select::new(concat!("tags.id AS tag_id, tags.name AS tag_name, ", topic_columns!()), "tags")
    .join("topics ON topics.id = tags.subject_id")
    .order_by("tags.name")
}

fn assemble_tag(row: &Row<'_>) -> Result<Tag> {
  Ok(Tag {
    id:    row.get("tag_id")?,
    name:  row.get("tag_name")?,
    topic: assemble_topic(row)?,
  })
}

/// Reads and creates tags, and attaches them to threads.
#[derive(Clone)]
pub struct TagModel {
  db: Db,
}

impl TagModel {
  pub fn new(db: Db) -> Self { Self { db } }

  pub fn get_tag_by_id(&self, tx: Option<&Tx>, id: i64) -> Result<Tag> {
    let stmt = tags().where_eq("tags.id", id).build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_tag)
  }

  /// Look a tag up by name within `topic`, case-insensitively.
  pub fn get_tag_by_name_and_topic(
    &self,
    tx: Option<&Tx>,
    name: &str,
    topic: &Topic,
  ) -> Result<Tag> {
    let stmt = tags()
      .where_eq("tags.name", validate::normalize_name(name))
      .where_eq("tags.subject_id", topic.id)
      .build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_tag)
  }

  pub fn get_tags_by_topic(&self, tx: Option<&Tx>, topic: &Topic) -> Result<Vec<Tag>> {
    let stmt = tags().where_eq("tags.subject_id", topic.id).build();
    self.db.fetch_many(tx, &stmt.sql, &stmt.args, assemble_tag)
  }

  /// Create a tag under `topic`. `name` must be a single alphanumeric word
  /// and is stored lowercase.
  pub fn add_tag(&self, tx: Option<&Tx>, name: &str, topic: &Topic) -> Result<Tag> {
    let name = validate::check_tag(name)?;

    let done = self.db.execute(
      tx,
      "INSERT INTO tags (name, subject_id) VALUES (?1, ?2)",
      &[Value::from(name), Value::from(topic.id)],
    )?;
    tracing::debug!(tag_id = done.last_insert_id, topic_id = topic.id, "tag added");

    self.get_tag_by_id(tx, done.last_insert_id)
  }

  /// Attach `tag` to `thread`. Both must belong to the same topic.
  pub fn add_thread_tag(&self, tx: Option<&Tx>, thread: &Thread, tag: &Tag) -> Result<()> {
    if tag.topic.id != thread.topic.id {
      let err = forum_core::Error::invalid_input("Tag does not belong to the thread's topic.");
      return Err(err.into());
    }

    self.db.execute(
      tx,
      "INSERT INTO thread_tags (thread_id, tag_id, subject_id) VALUES (?1, ?2, ?3)",
      &[
        Value::from(thread.id),
        Value::from(tag.id),
        Value::from(thread.topic.id),
      ],
    )?;
    tracing::debug!(thread_id = thread.id, tag_id = tag.id, "thread tagged");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tag_projection_embeds_the_topic_columns() {
    let sql = tags().build().sql;
    assert!(sql.contains(topic_columns!()), "{sql}");
  }
}
