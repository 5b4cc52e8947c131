use forum_core::{User, validate};
use rusqlite::{Row, types::Value};

use crate::{Db, Result, Tx, query::Select};

/// User columns, also embedded in the thread projection as the creator.
const USER_COLUMNS: &str = user_columns!();

fn users() -> Select { Select::new(USER_COLUMNS, "users") }

pub(crate) fn assemble_user(row: &Row<'_>) -> Result<User> {
  Ok(User {
    id:       row.get("user_id")?,
    email:    row.get("user_email")?,
    name:     row.get("user_name")?,
    is_admin: row.get("user_is_admin")?,
  })
}

/// Signs users up and looks them up. Users are never updated here.
#[derive(Clone)]
pub struct UserModel {
  db: Db,
}

impl UserModel {
  pub fn new(db: Db) -> Self { Self { db } }

  pub fn get_user_by_id(&self, tx: Option<&Tx>, id: i64) -> Result<User> {
    let stmt = users().where_eq("users.id", id).build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_user)
  }

  /// Look a user up by email, case-insensitively.
  pub fn get_user_by_email(&self, tx: Option<&Tx>, email: &str) -> Result<User> {
    let stmt = users()
      .where_eq("users.email", validate::normalize_name(email))
      .build();
    self.db.fetch_one(tx, &stmt.sql, &stmt.args, assemble_user)
  }

  /// Create a non-admin user. The email is stored lowercase and the display
  /// name title-cased.
  pub fn signup(&self, tx: Option<&Tx>, email: &str, name: &str) -> Result<User> {
    let (email, name) = validate::check_signup(email, name)?;

    let done = self.db.execute(
      tx,
      "INSERT INTO users (email, name) VALUES (?1, ?2)",
      &[Value::from(email), Value::from(name)],
    )?;
    tracing::debug!(user_id = done.last_insert_id, "user signed up");

    self.get_user_by_id(tx, done.last_insert_id)
  }
}
