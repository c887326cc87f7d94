//! Person, the single entity managed by Roster, and the payload shapes
//! exchanged with transports.
//!
//! The store owns the authoritative [`Person`]. Everything crossing the
//! service boundary uses [`NewPerson`], [`UpdatePerson`] or
//! [`PersonDetails`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier. Assigned ids are strictly positive; `0` marks a
/// record that has not been persisted yet.
pub type PersonId = i64;

/// Sentinel id carried by a record before the store assigns one.
pub const UNASSIGNED_ID: PersonId = 0;

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A person record as persisted by a [`PeopleStore`](crate::store::PeopleStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
  pub id:            PersonId,
  pub first_name:    String,
  pub last_name:     String,
  pub middle_name:   Option<String>,
  pub email:         String,
  pub address:       String,
  pub date_of_birth: Option<DateTime<Utc>>,
}

impl Person {
  /// Case-insensitive containment of `term` in the first or last name.
  ///
  /// A blank term matches every record.
  pub fn matches_term(&self, term: &str) -> bool {
    if term.trim().is_empty() {
      return true;
    }
    let needle = term.to_lowercase();
    self.first_name.to_lowercase().contains(&needle)
      || self.last_name.to_lowercase().contains(&needle)
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Creation payload. Carries no id; the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
  pub first_name:    String,
  pub last_name:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub middle_name:   Option<String>,
  pub email:         String,
  pub address:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_of_birth: Option<DateTime<Utc>>,
}

impl AsRef<NewPerson> for NewPerson {
  fn as_ref(&self) -> &NewPerson { self }
}

/// Update payload: the target id plus a full replacement of every other field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePerson {
  pub id:      PersonId,
  #[serde(flatten)]
  pub details: NewPerson,
}

impl AsRef<NewPerson> for UpdatePerson {
  fn as_ref(&self) -> &NewPerson { &self.details }
}

/// The record shape returned to transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
  pub id:            PersonId,
  pub first_name:    String,
  pub last_name:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub middle_name:   Option<String>,
  pub email:         String,
  pub address:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_of_birth: Option<DateTime<Utc>>,
}

// ─── Translations ────────────────────────────────────────────────────────────

impl From<NewPerson> for Person {
  fn from(p: NewPerson) -> Self {
    Person {
      id:            UNASSIGNED_ID,
      first_name:    p.first_name,
      last_name:     p.last_name,
      middle_name:   p.middle_name,
      email:         p.email,
      address:       p.address,
      date_of_birth: p.date_of_birth,
    }
  }
}

impl From<UpdatePerson> for Person {
  fn from(p: UpdatePerson) -> Self {
    Person { id: p.id, ..Person::from(p.details) }
  }
}

impl From<Person> for PersonDetails {
  fn from(p: Person) -> Self {
    PersonDetails {
      id:            p.id,
      first_name:    p.first_name,
      last_name:     p.last_name,
      middle_name:   p.middle_name,
      email:         p.email,
      address:       p.address,
      date_of_birth: p.date_of_birth,
    }
  }
}
