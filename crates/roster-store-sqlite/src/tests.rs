//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::{Duration, Utc};
use roster_core::{
  person::{NewPerson, Person, UpdatePerson},
  service::{PeopleService, ServiceError},
  store::{PeopleStore, StoreError},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn person(first: &str) -> Person {
  Person {
    id:            0,
    first_name:    first.into(),
    last_name:     "Doe".into(),
    middle_name:   None,
    email:         format!("{}@example.com", first.to_lowercase()),
    address:       "1 Main Street".into(),
    date_of_birth: None,
  }
}

// ─── Ids ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_assigns_increasing_ids() {
  let s = store().await;

  let a = s.add(person("John")).await.unwrap();
  let b = s.add(person("Jane")).await.unwrap();
  let c = s.add(person("Alice")).await.unwrap();

  assert!(a > 0);
  assert!(a < b && b < c);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
  let s = store().await;

  s.add(person("John")).await.unwrap();
  let last = s.add(person("Jane")).await.unwrap();
  assert!(s.delete(last).await.unwrap());

  let next = s.add(person("Alice")).await.unwrap();
  assert!(next > last);
}

#[tokio::test]
async fn add_ignores_caller_supplied_id() {
  let s = store().await;

  let mut p = person("John");
  p.id = 500;
  let id = s.add(p).await.unwrap();

  assert_ne!(id, 500);
  assert!(s.find_by_id(500).await.unwrap().is_none());
}

#[tokio::test]
async fn schema_can_be_applied_again_without_losing_rows() {
  let s = store().await;
  let id = s.add(person("John")).await.unwrap();

  s.init_schema().await.unwrap();

  assert_eq!(s.find_by_id(id).await.unwrap().unwrap().first_name, "John");
  assert!(s.add(person("Jane")).await.unwrap() > id);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_roundtrip() {
  let s = store().await;

  let mut p = person("John");
  p.middle_name = Some("Quincy".into());
  p.date_of_birth = Some(Utc::now() - Duration::days(9_000));
  let id = s.add(p.clone()).await.unwrap();

  let fetched = s.find_by_id(id).await.unwrap().unwrap();
  assert_eq!(fetched, Person { id, ..p });
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  assert!(s.find_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn get_all_returns_every_record() {
  let s = store().await;
  s.add(person("John")).await.unwrap();
  s.add(person("Jane")).await.unwrap();
  s.add(person("Alice")).await.unwrap();

  let all = s.get_all().await.unwrap();
  assert_eq!(all.len(), 3);
}

// ─── Search ──────────────────────────────────────────────────────────────────

async fn seeded() -> (SqliteStore, i64) {
  let s = store().await;
  let john = s.add(person("John")).await.unwrap();
  s.add(person("Jane")).await.unwrap();
  s.add(person("Alice")).await.unwrap();
  (s, john)
}

#[tokio::test]
async fn search_exact_name() {
  let (s, john) = seeded().await;
  let results = s.search("John").await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].id, john);
}

#[tokio::test]
async fn search_is_case_insensitive() {
  let (s, john) = seeded().await;
  let results = s.search("jo").await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].id, john);

  let results = s.search("JOHN").await.unwrap();
  assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn search_matches_last_name() {
  let (s, _) = seeded().await;
  assert_eq!(s.search("doe").await.unwrap().len(), 3);
}

#[tokio::test]
async fn blank_search_returns_everything() {
  let (s, _) = seeded().await;
  assert_eq!(s.search("").await.unwrap().len(), 3);
  assert_eq!(s.search("  ").await.unwrap().len(), 3);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let (s, _) = seeded().await;
  assert!(s.search("%").await.unwrap().is_empty());
  assert!(s.search("J_hn").await.unwrap().is_empty());
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_fields_in_place() {
  let s = store().await;
  let id = s.add(person("John")).await.unwrap();

  let mut changed = person("Johnny");
  changed.id = id;
  changed.address = "2 Side Street".into();
  s.update(changed.clone()).await.unwrap();

  assert_eq!(s.find_by_id(id).await.unwrap().unwrap(), changed);
}

#[tokio::test]
async fn update_missing_is_reported() {
  let s = store().await;
  let mut p = person("Ghost");
  p.id = 42;

  let err = s.update(p).await.unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(42)));
  assert_eq!(err.missing_person(), Some(42));
}

#[tokio::test]
async fn delete_existing_and_missing() {
  let s = store().await;
  let id = s.add(person("John")).await.unwrap();

  assert!(s.delete(id).await.unwrap());
  assert!(s.find_by_id(id).await.unwrap().is_none());
  assert!(!s.delete(id).await.unwrap());
}

#[tokio::test]
async fn constraint_violations_are_database_errors() {
  let s = store().await;
  let mut p = person("John");
  p.first_name = "A".repeat(101);

  let err = s.add(p).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
  assert!(s.get_all().await.unwrap().is_empty());
}

// ─── Through the service ─────────────────────────────────────────────────────

#[tokio::test]
async fn service_over_sqlite() {
  let svc = PeopleService::new(Arc::new(store().await));

  let payload = NewPerson {
    first_name:    "Ada".into(),
    last_name:     "Lovelace".into(),
    middle_name:   None,
    email:         "ada@example.com".into(),
    address:       "12 St James's Square".into(),
    date_of_birth: Some(Utc::now() - Duration::days(20_000)),
  };
  let id = svc.create(payload.clone()).await.unwrap();

  let found = svc.find_by_id(id).await.unwrap().unwrap();
  assert_eq!(found.first_name, "Ada");
  assert_eq!(found.date_of_birth, payload.date_of_birth);

  let err = svc
    .update(UpdatePerson { id: id + 1, details: payload })
    .await
    .unwrap_err();
  match err {
    ServiceError::Validation(report) => {
      assert_eq!(report.failures().len(), 1);
      assert_eq!(report.failures()[0].field, "id");
      assert_eq!(report.failures()[0].message, "Person not found");
    }
    other => panic!("expected validation failure, got {other:?}"),
  }
}
