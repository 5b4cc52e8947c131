use forum_core::{Topic, validate};
use rusqlite::{Row, types::Value};

use crate::{Db, Result, Tx, query::Select};

const TOPIC_COLUMNS: &str = topic_columns!();

fn topics() -> Select { Select::new(TOPIC_COLUMNS, "topics") }

pub(crate) fn assemble_topic(row: &Row<'_>) -> Result<Topic> {
  Ok(Topic {
    id:          row.get("topic_id")?,
    name:        row.get("topic_name")?,
    title:       row.get("topic_title")?,
    description: row.get("topic_description")?,
  })
}

/// Reads and creates topics.
#[derive(Clone)]
pub struct TopicModel {
  db: Db,
}

impl TopicModel {
  pub fn new(db: Db) -> Self { Self { db } }

  pub fn get_all_topics(&self, tx: Option<&Tx>) -> Result<Vec<Topic>> {
    let stmt = topics().order_by("topics.name").build();
    self.db.fetch_many(tx, &stmt.sql, &stmt.args, assemble_topic)
  }

  pub fn get_topic_by_id(&self, tx: Option<&Tx>, id: i64) -> Result<Topic> {
    let stmt = topics().where_eq("topics.id", id).build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_topic)
  }

  /// Look a topic up by name, case-insensitively.
  pub fn get_topic_by_name(&self, tx: Option<&Tx>, name: &str) -> Result<Topic> {
    let stmt = topics()
      .where_eq("topics.name", validate::normalize_name(name))
      .build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_topic)
  }

  /// Create a topic. `name` must be a single alphanumeric word and is stored
  /// lowercase; `title` and `description` must be non-empty.
  pub fn add_topic(
    &self,
    tx: Option<&Tx>,
    name: &str,
    title: &str,
    description: &str,
  ) -> Result<Topic> {
    let name = validate::check_topic(name, title, description)?;

    let done = self.db.execute(
      tx,
      "INSERT INTO topics (name, title, description) VALUES (?1, ?2, ?3)",
      &[
        Value::from(name),
        Value::from(title.to_owned()),
        Value::from(description.to_owned()),
      ],
    )?;
    tracing::debug!(topic_id = done.last_insert_id, "topic added");

    self.get_topic_by_id(tx, done.last_insert_id)
  }
}
