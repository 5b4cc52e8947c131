use std::collections::HashSet;

use forum_core::{Tag, Thread, Topic, User, validate};
use rusqlite::{Row, types::Value};

use crate::{
  Db, Result, Tx,
  encode::get_dt,
  models::{topic::assemble_topic, user::assemble_user},
  query::Select,
};

/// Every thread read: the thread, its topic, its creator and its vote count,
/// one row per thread, highest score first.
fn threads() -> Select {
  Select::new(
    concat!(
      "threads.id AS thread_id, threads.title AS thread_title, \
       threads.content AS thread_content, threads.created_at AS thread_created_at, \
       threads.is_pinned AS thread_is_pinned, threads.is_visible AS thread_is_visible, \
       count(thread_votes.thread_id) AS thread_score, ",
      topic_columns!(),
      ", ",
      user_columns!(),
    ),
    "threads",
  )
  .join("topics ON topics.id = threads.topic_id")
  .join("users ON users.id = threads.creator_user_id")
  .left_join("thread_votes ON thread_votes.thread_id = threads.id")
  .group_by("threads.id")
  .order_by("thread_score DESC, threads.id DESC")
}

fn assemble_thread(row: &Row<'_>) -> Result<Thread> {
  Ok(Thread {
    id:         row.get("thread_id")?,
    title:      row.get("thread_title")?,
    content:    row.get("thread_content")?,
    created_at: get_dt(row, "thread_created_at")?,
    is_pinned:  row.get("thread_is_pinned")?,
    is_visible: row.get("thread_is_visible")?,
    score:      row.get("thread_score")?,
    topic:      assemble_topic(row)?,
    creator:    assemble_user(row)?,
  })
}

/// The two thread flags moderators can flip.
#[derive(Debug, Clone, Copy)]
enum Flag {
  Pinned,
  Visible,
}

impl Flag {
  fn update_sql(self) -> &'static str {
    match self {
      Flag::Pinned => "UPDATE threads SET is_pinned = ?1 WHERE id = ?2",
      Flag::Visible => "UPDATE threads SET is_visible = ?1 WHERE id = ?2",
    }
  }
}

/// Reads, creates and moderates threads, and records votes on them.
#[derive(Clone)]
pub struct ThreadModel {
  db: Db,
}

impl ThreadModel {
  pub fn new(db: Db) -> Self { Self { db } }

  fn find_all(&self, tx: Option<&Tx>, select: Select) -> Result<Vec<Thread>> {
    let stmt = select.build();
    self.db.fetch_many(tx, &stmt.sql, &stmt.args, assemble_thread)
  }

  pub fn get_thread_by_id(&self, tx: Option<&Tx>, id: i64) -> Result<Thread> {
    let stmt = threads().where_eq("threads.id", id).build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_thread)
  }

  /// The pinned (or unpinned) threads of `topic`. Empty when there are none.
  pub fn get_threads_by_topic_and_is_pinned(
    &self,
    tx: Option<&Tx>,
    topic: &Topic,
    is_pinned: bool,
  ) -> Result<Vec<Thread>> {
    self.find_all(
      tx,
      threads()
        .where_eq("threads.topic_id", topic.id)
        .where_eq("threads.is_pinned", is_pinned),
    )
  }

  pub fn get_threads_by_user(&self, tx: Option<&Tx>, user: &User) -> Result<Vec<Thread>> {
    self.find_all(tx, threads().where_eq("threads.creator_user_id", user.id))
  }

  pub fn get_threads_by_tag(&self, tx: Option<&Tx>, tag: &Tag) -> Result<Vec<Thread>> {
    self.find_all(
      tx,
      threads()
        .join("thread_tags ON thread_tags.thread_id = threads.id")
        .where_eq("thread_tags.tag_id", tag.id),
    )
  }

  /// Ids of every thread `user` has upvoted, for constant-time membership
  /// checks while rendering a list.
  pub fn get_thread_ids_upvoted_by_user(
    &self,
    tx: Option<&Tx>,
    user: &User,
  ) -> Result<HashSet<i64>> {
    self.db.query(
      tx,
      "SELECT thread_id FROM thread_votes WHERE user_id = ?1",
      &[Value::from(user.id)],
      |rows| {
        let mut ids: HashSet<i64> = HashSet::new();
        while let Some(row) = rows.next()? {
          ids.insert(row.get("thread_id")?);
        }
        Ok(ids)
      },
    )
  }

  /// Create a thread under `topic`. `title` and `content` must be non-empty.
  pub fn add_thread(
    &self,
    tx: Option<&Tx>,
    title: &str,
    content: &str,
    topic: &Topic,
    creator: &User,
  ) -> Result<Thread> {
    validate::check_thread(title, content)?;

    let done = self.db.execute(
      tx,
      "INSERT INTO threads (title, content, topic_id, creator_user_id) VALUES (?1, ?2, ?3, ?4)",
      &[
        Value::from(title.to_owned()),
        Value::from(content.to_owned()),
        Value::from(topic.id),
        Value::from(creator.id),
      ],
    )?;
    tracing::debug!(thread_id = done.last_insert_id, topic_id = topic.id, "thread added");

    self.get_thread_by_id(tx, done.last_insert_id)
  }

  /// Record `user`'s upvote. Returns `false` if the vote already existed.
  pub fn add_thread_vote_for_user(
    &self,
    tx: Option<&Tx>,
    thread: &Thread,
    user: &User,
  ) -> Result<bool> {
    let done = self.db.execute(
      tx,
      "INSERT OR IGNORE INTO thread_votes (user_id, thread_id) VALUES (?1, ?2)",
      &[Value::from(user.id), Value::from(thread.id)],
    )?;
    Ok(done.rows_affected == 1)
  }

  /// Withdraw `user`'s upvote. Returns `false` if there was none.
  pub fn remove_thread_vote_for_user(
    &self,
    tx: Option<&Tx>,
    thread: &Thread,
    user: &User,
  ) -> Result<bool> {
    let done = self.db.execute(
      tx,
      "DELETE FROM thread_votes WHERE user_id = ?1 AND thread_id = ?2",
      &[Value::from(user.id), Value::from(thread.id)],
    )?;
    Ok(done.rows_affected == 1)
  }

  // The flag setters are idempotent and do not re-read the thread.

  pub fn hide_thread(&self, tx: Option<&Tx>, thread: &Thread) -> Result<()> {
    self.set_flag(tx, thread, Flag::Visible, false)
  }

  pub fn unhide_thread(&self, tx: Option<&Tx>, thread: &Thread) -> Result<()> {
    self.set_flag(tx, thread, Flag::Visible, true)
  }

  pub fn pin_thread(&self, tx: Option<&Tx>, thread: &Thread) -> Result<()> {
    self.set_flag(tx, thread, Flag::Pinned, true)
  }

  pub fn unpin_thread(&self, tx: Option<&Tx>, thread: &Thread) -> Result<()> {
    self.set_flag(tx, thread, Flag::Pinned, false)
  }

  fn set_flag(&self, tx: Option<&Tx>, thread: &Thread, flag: Flag, value: bool) -> Result<()> {
    self.db.execute(
      tx,
      flag.update_sql(),
      &[Value::from(value), Value::from(thread.id)],
    )?;
    tracing::debug!(thread_id = thread.id, ?flag, value, "thread flag set");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn thread_projection_embeds_topic_and_creator_columns() {
    let sql = threads().build().sql;
    assert!(sql.contains(topic_columns!()), "{sql}");
    assert!(sql.contains(user_columns!()), "{sql}");
    assert!(sql.contains("count(thread_votes.thread_id) AS thread_score, topics.id AS topic_id"));
  }
}
