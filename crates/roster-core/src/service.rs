//! [`PeopleService`]: use-case orchestration over a [`PeopleStore`].
//!
//! Reads go straight to the store. Writes are validated first and reach the
//! store only when the validation report is empty.

use std::sync::Arc;

use thiserror::Error;

use crate::{
  person::{NewPerson, Person, PersonDetails, PersonId, UpdatePerson},
  store::{PeopleStore, StoreError},
  validation::{
    NewPersonValidator, UpdatePersonValidator, ValidationReport,
    new_person_validator, update_person_validator,
  },
};

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError<E> {
  /// The payload was rejected; nothing was written.
  #[error("validation failed: {0}")]
  Validation(ValidationReport),

  /// The record passed the existence check but was gone by the time the
  /// update reached the store.
  #[error("person {0} disappeared before it could be updated")]
  NotFound(PersonId),

  #[error("store error: {0}")]
  Store(#[source] E),
}

pub type ServiceResult<T, E> = Result<T, ServiceError<E>>;

/// Create, read, update and delete people through a validated pipeline.
pub struct PeopleService<S: PeopleStore> {
  store:        Arc<S>,
  create_rules: NewPersonValidator,
  update_rules: UpdatePersonValidator<S>,
}

impl<S: PeopleStore> PeopleService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      create_rules: new_person_validator(),
      update_rules: update_person_validator(store.clone()),
      store,
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn list_all(&self) -> ServiceResult<Vec<PersonDetails>, S::Error> {
    let people = self.store.get_all().await.map_err(ServiceError::Store)?;
    tracing::debug!(count = people.len(), "listed people");
    Ok(people.into_iter().map(PersonDetails::from).collect())
  }

  pub async fn find_by_id(
    &self,
    id: PersonId,
  ) -> ServiceResult<Option<PersonDetails>, S::Error> {
    let person = self.store.find_by_id(id).await.map_err(ServiceError::Store)?;
    tracing::debug!(id, found = person.is_some(), "looked up person");
    Ok(person.map(PersonDetails::from))
  }

  pub async fn search(
    &self,
    term: &str,
  ) -> ServiceResult<Vec<PersonDetails>, S::Error> {
    let people = self.store.search(term).await.map_err(ServiceError::Store)?;
    tracing::debug!(term, count = people.len(), "searched people");
    Ok(people.into_iter().map(PersonDetails::from).collect())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Validate `payload` and persist it, returning the new id.
  pub async fn create(&self, payload: NewPerson) -> ServiceResult<PersonId, S::Error> {
    let report = self.create_rules.validate_now(&payload);
    if !report.is_valid() {
      tracing::warn!(%report, "rejected new person");
      return Err(ServiceError::Validation(report));
    }

    let id = self
      .store
      .add(Person::from(payload))
      .await
      .map_err(ServiceError::Store)?;
    tracing::info!(id, "created person");
    Ok(id)
  }

  /// Validate `payload`, including that its target exists, then replace the
  /// stored record.
  pub async fn update(&self, payload: UpdatePerson) -> ServiceResult<(), S::Error> {
    let report = self
      .update_rules
      .validate(&payload)
      .await
      .map_err(ServiceError::Store)?;
    if !report.is_valid() {
      tracing::warn!(id = payload.id, %report, "rejected person update");
      return Err(ServiceError::Validation(report));
    }

    let id = payload.id;
    match self.store.update(Person::from(payload)).await {
      Ok(()) => {
        tracing::info!(id, "updated person");
        Ok(())
      }
      Err(e) => match e.missing_person() {
        Some(missing) => {
          tracing::warn!(id = missing, "person vanished between validation and update");
          Err(ServiceError::NotFound(missing))
        }
        None => Err(ServiceError::Store(e)),
      },
    }
  }

  /// Delete without validation. `false` means there was no such person.
  pub async fn delete(&self, id: PersonId) -> ServiceResult<bool, S::Error> {
    let deleted = self.store.delete(id).await.map_err(ServiceError::Store)?;
    tracing::info!(id, deleted, "deleted person");
    Ok(deleted)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;
  use crate::{Error, memory::InMemoryStore, validation::ValidationFailure};

  fn new_person(first: &str) -> NewPerson {
    NewPerson {
      first_name:    first.into(),
      last_name:     "Doe".into(),
      middle_name:   None,
      email:         format!("{}@example.com", first.to_lowercase()),
      address:       "1 Main Street".into(),
      date_of_birth: Some(Utc::now() - Duration::days(10_000)),
    }
  }

  fn service() -> (Arc<InMemoryStore>, PeopleService<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (store.clone(), PeopleService::new(store))
  }

  #[tokio::test]
  async fn create_then_find_round_trips() {
    let (_, svc) = service();
    let payload = new_person("John");
    let id = svc.create(payload.clone()).await.unwrap();

    let found = svc.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.first_name, payload.first_name);
    assert_eq!(found.last_name, payload.last_name);
    assert_eq!(found.middle_name, payload.middle_name);
    assert_eq!(found.email, payload.email);
    assert_eq!(found.address, payload.address);
    assert_eq!(found.date_of_birth, payload.date_of_birth);
  }

  #[tokio::test]
  async fn invalid_create_never_reaches_store() {
    let (store, svc) = service();
    let payload = NewPerson { email: "not-an-email".into(), ..new_person("John") };

    let err = svc.create(payload).await.unwrap_err();
    let report = match err {
      ServiceError::Validation(report) => report,
      other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(report.failures()[0].field, "email");
    assert!(store.get_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_replaces_fields() {
    let (_, svc) = service();
    let id = svc.create(new_person("John")).await.unwrap();

    let details = NewPerson { address: "2 Side Street".into(), ..new_person("Johnny") };
    svc.update(UpdatePerson { id, details }).await.unwrap();

    let found = svc.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.first_name, "Johnny");
    assert_eq!(found.address, "2 Side Street");
  }

  #[tokio::test]
  async fn update_of_missing_person_is_a_single_gate_failure() {
    let (store, svc) = service();
    for name in ["John", "Jane", "Alice"] {
      svc.create(new_person(name)).await.unwrap();
    }

    let details = NewPerson { first_name: String::new(), ..new_person("Ghost") };
    let err = svc.update(UpdatePerson { id: 999, details }).await.unwrap_err();
    let report = match err {
      ServiceError::Validation(report) => report,
      other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(
      report.failures(),
      [ValidationFailure::new("id", "Person not found")]
    );
    assert_eq!(store.get_all().await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn search_is_case_insensitive_and_blank_matches_all() {
    let (_, svc) = service();
    let john = svc.create(new_person("John")).await.unwrap();
    svc.create(new_person("Jane")).await.unwrap();
    svc.create(new_person("Alice")).await.unwrap();

    let hits = svc.search("John").await.unwrap();
    assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), [john]);

    let hits = svc.search("jo").await.unwrap();
    assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), [john]);

    assert_eq!(svc.search("").await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn delete_reports_whether_anything_was_removed() {
    let (_, svc) = service();
    let id = svc.create(new_person("John")).await.unwrap();

    assert!(svc.delete(id).await.unwrap());
    assert!(svc.find_by_id(id).await.unwrap().is_none());
    assert!(!svc.delete(id).await.unwrap());
  }

  #[tokio::test]
  async fn storage_failures_propagate_unchanged() {
    let (store, svc) = service();
    let id = svc.create(new_person("John")).await.unwrap();
    store.set_unavailable(true);

    assert!(matches!(
      svc.list_all().await,
      Err(ServiceError::Store(Error::Unavailable(_)))
    ));
    assert!(matches!(
      svc.create(new_person("Jane")).await,
      Err(ServiceError::Store(Error::Unavailable(_)))
    ));
    assert!(matches!(
      svc.update(UpdatePerson { id, details: new_person("Jim") }).await,
      Err(ServiceError::Store(Error::Unavailable(_)))
    ));
  }

  /// Hands out the record on lookup, then forgets it, so the write that
  /// follows a passing existence check finds nothing.
  #[derive(Default)]
  struct VanishingStore(InMemoryStore);

  impl PeopleStore for VanishingStore {
    type Error = Error;

    async fn get_all(&self) -> crate::Result<Vec<Person>> { self.0.get_all().await }

    async fn find_by_id(&self, id: PersonId) -> crate::Result<Option<Person>> {
      let found = self.0.find_by_id(id).await?;
      self.0.delete(id).await?;
      Ok(found)
    }

    async fn search(&self, term: &str) -> crate::Result<Vec<Person>> {
      self.0.search(term).await
    }

    async fn add(&self, person: Person) -> crate::Result<PersonId> { self.0.add(person).await }

    async fn update(&self, person: Person) -> crate::Result<()> { self.0.update(person).await }

    async fn delete(&self, id: PersonId) -> crate::Result<bool> { self.0.delete(id).await }
  }

  #[tokio::test]
  async fn update_of_person_removed_after_the_check_is_not_found() {
    let store = Arc::new(VanishingStore::default());
    let svc = PeopleService::new(store.clone());
    let id = svc.create(new_person("John")).await.unwrap();

    let err = svc
      .update(UpdatePerson { id, details: new_person("Johnny") })
      .await
      .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(missing) if missing == id), "{err:?}");
    assert!(store.0.get_all().await.unwrap().is_empty());
  }
}
