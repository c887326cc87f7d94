//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use roster_core::person::{Person, PersonId};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Search terms ────────────────────────────────────────────────────────────

/// Build a `LIKE` pattern that matches `term` as a literal, lowercased
/// substring. Pair with `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
  let mut pattern = String::with_capacity(term.len() + 2);
  pattern.push('%');
  for c in term.to_lowercase().chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str =
  "id, first_name, last_name, middle_name, email, address, date_of_birth";

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub id:            PersonId,
  pub first_name:    String,
  pub last_name:     String,
  pub middle_name:   Option<String>,
  pub email:         String,
  pub address:       String,
  pub date_of_birth: Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPerson {
      id:            row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      middle_name:   row.get(3)?,
      email:         row.get(4)?,
      address:       row.get(5)?,
      date_of_birth: row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:            self.id,
      first_name:    self.first_name,
      last_name:     self.last_name,
      middle_name:   self.middle_name,
      email:         self.email,
      address:       self.address,
      date_of_birth: self.date_of_birth.as_deref().map(decode_dt).transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("Jo"), "%jo%");
    assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
  }

  #[test]
  fn dt_roundtrip_keeps_subsecond_precision() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }
}
