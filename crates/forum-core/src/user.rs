//! User: a forum member. Read-only once signed up.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       i64,
  /// Always lowercase.
  pub email:    String,
  pub name:     String,
  pub is_admin: bool,
}
