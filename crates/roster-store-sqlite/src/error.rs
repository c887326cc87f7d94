//! Error type for `roster-store-sqlite`.

use roster_core::{PersonId, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to update a person that is not in the table.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

impl StoreError for Error {
  fn missing_person(&self) -> Option<PersonId> {
    match self {
      Self::PersonNotFound(id) => Some(*id),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
