//! A small composable `SELECT` builder.
//!
//! Table, column and join text only ever comes from `&'static str` literals in
//! this crate; every caller-supplied value is pushed as a bound argument. A
//! base projection is built once per entity and cloned, so every read of an
//! entity shares the exact column layout its assembler expects.

use rusqlite::types::Value;

/// Finished SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  pub sql:  String,
  pub args: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
  Inner,
  Left,
}

#[derive(Debug, Clone)]
pub struct Select {
  columns:    &'static str,
  from:       &'static str,
  joins:      Vec<(JoinKind, &'static str)>,
  conditions: Vec<&'static str>,
  args:       Vec<Value>,
  group_by:   Option<&'static str>,
  order_by:   Option<&'static str>,
}

impl Select {
  pub fn new(columns: &'static str, from: &'static str) -> Self {
    Self {
      columns,
      from,
      joins: Vec::new(),
      conditions: Vec::new(),
      args: Vec::new(),
      group_by: None,
      order_by: None,
    }
  }

  /// `JOIN <on>`, e.g. `"topics ON topics.id = tags.subject_id"`.
  pub fn join(mut self, on: &'static str) -> Self {
    self.joins.push((JoinKind::Inner, on));
    self
  }

  pub fn left_join(mut self, on: &'static str) -> Self {
    self.joins.push((JoinKind::Left, on));
    self
  }

  /// Add `column = ?` to the conjunction of predicates.
  pub fn where_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
    self.conditions.push(column);
    self.args.push(value.into());
    self
  }

  pub fn group_by(mut self, expr: &'static str) -> Self {
    self.group_by = Some(expr);
    self
  }

  pub fn order_by(mut self, expr: &'static str) -> Self {
    self.order_by = Some(expr);
    self
  }

  pub fn build(&self) -> Statement {
    let mut sql = format!("SELECT {} FROM {}", self.columns, self.from);

    for (kind, on) in &self.joins {
      sql.push_str(match kind {
        JoinKind::Inner => " JOIN ",
        JoinKind::Left => " LEFT JOIN ",
      });
      sql.push_str(on);
    }

    for (i, column) in self.conditions.iter().enumerate() {
      sql.push_str(if i == 0 { " WHERE " } else { " AND " });
      sql.push_str(column);
      sql.push_str(&format!(" = ?{}", i + 1));
    }

    if let Some(group_by) = self.group_by {
      sql.push_str(" GROUP BY ");
      sql.push_str(group_by);
    }
    if let Some(order_by) = self.order_by {
      sql.push_str(" ORDER BY ");
      sql.push_str(order_by);
    }

    Statement { sql, args: self.args.clone() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bare_projection() {
    let stmt = Select::new("id, name", "topics").build();
    assert_eq!(stmt.sql, "SELECT id, name FROM topics");
    assert!(stmt.args.is_empty());
  }

  #[test]
  fn predicates_are_bound_in_order() {
    let stmt = Select::new("*", "threads")
      .where_eq("threads.topic_id", 3_i64)
      .where_eq("threads.is_pinned", true)
      .build();
    assert_eq!(
      stmt.sql,
      "SELECT * FROM threads WHERE threads.topic_id = ?1 AND threads.is_pinned = ?2"
    );
    assert_eq!(stmt.args, vec![Value::Integer(3), Value::Integer(1)]);
  }

  #[test]
  fn values_never_reach_the_sql_text() {
    let hostile = "x'; DROP TABLE users; --".to_string();
    let stmt = Select::new("*", "users").where_eq("users.email", hostile.clone()).build();
    assert!(!stmt.sql.contains("DROP"));
    assert_eq!(stmt.args, vec![Value::Text(hostile)]);
  }

  #[test]
  fn clauses_render_in_sql_order_regardless_of_call_order() {
    let base = Select::new("t.id", "t")
      .left_join("v ON v.t_id = t.id")
      .group_by("t.id")
      .order_by("count(v.t_id) DESC");
    let stmt = base.clone().join("x ON x.t_id = t.id").where_eq("x.k", 1_i64).build();
    assert_eq!(
      stmt.sql,
      "SELECT t.id FROM t LEFT JOIN v ON v.t_id = t.id JOIN x ON x.t_id = t.id \
       WHERE x.k = ?1 GROUP BY t.id ORDER BY count(v.t_id) DESC"
    );

    // The template itself is untouched.
    assert_eq!(
      base.build().sql,
      "SELECT t.id FROM t LEFT JOIN v ON v.t_id = t.id GROUP BY t.id ORDER BY count(v.t_id) DESC"
    );
  }
}
