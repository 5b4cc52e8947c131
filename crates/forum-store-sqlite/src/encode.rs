//! Decoding helpers for column values that need more than `FromSql`.
//!
//! Timestamps are stored as RFC 3339 text generated by SQLite itself
//! (`strftime('%Y-%m-%dT%H:%M:%fZ')`).

use chrono::{DateTime, Utc};
use rusqlite::Row;

use crate::{Error, Result};

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Read the named text column and decode it as a timestamp.
pub fn get_dt(row: &Row<'_>, column: &str) -> Result<DateTime<Utc>> {
  let raw: String = row.get(column)?;
  decode_dt(&raw)
}
