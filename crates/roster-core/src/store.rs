//! The `PeopleStore` trait.
//!
//! The trait is implemented by storage backends (`roster-store-sqlite`, and
//! [`InMemoryStore`](crate::memory::InMemoryStore) for tests). The validator
//! and the service depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::person::{Person, PersonId};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error type produced by a [`PeopleStore`].
///
/// Stores report a failed [`PeopleStore::update`] on a missing record through
/// [`StoreError::missing_person`], so callers can tell it apart from a
/// storage failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The id of the record an update targeted, if that record did not exist.
  fn missing_person(&self) -> Option<PersonId>;
}

impl StoreError for crate::Error {
  fn missing_person(&self) -> Option<PersonId> {
    match self {
      Self::PersonNotFound(id) => Some(*id),
      _ => None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable table of [`Person`] records.
///
/// "Not found" is a normal outcome for reads and deletes. Every method may
/// fail with a storage error, which callers receive unmodified; stores never
/// retry. Each call either applies completely or not at all, so dropping the
/// returned future never leaves a partial write behind.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PeopleStore: Send + Sync {
  type Error: StoreError;

  /// Every record. Order is unspecified but stable within one call.
  fn get_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Every record whose first or last name contains `term`, ignoring case.
  /// A blank term matches every record.
  fn search<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Persist a new record and return its freshly assigned id.
  ///
  /// `person.id` is ignored. Ids increase monotonically and are never reused
  /// for the lifetime of the store.
  fn add(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  /// Replace every field of the record with id `person.id`.
  ///
  /// Fails with an error whose [`StoreError::missing_person`] is `Some` if no
  /// such record exists.
  fn update(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Hard-delete a record. Returns `false` if there was nothing to delete.
  fn delete(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
