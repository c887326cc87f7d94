//! [`InMemoryStore`]: a [`PeopleStore`] held entirely in process memory.
//!
//! Used to exercise the validator and the service without a database.

use std::{
  collections::BTreeMap,
  sync::{
    RwLock, RwLockReadGuard, RwLockWriteGuard,
    atomic::{AtomicBool, Ordering},
  },
};

use crate::{
  Error, Result,
  person::{Person, PersonId},
  store::PeopleStore,
};

#[derive(Debug, Default)]
struct Table {
  people:  BTreeMap<PersonId, Person>,
  last_id: PersonId,
}

/// An in-memory people table.
///
/// Writes are serialised by an internal lock. Ids come from a counter that
/// only moves forward, so deleted ids are never handed out again.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  table:       RwLock<Table>,
  unavailable: AtomicBool,
}

impl InMemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent call fail with [`Error::Unavailable`] until reset.
  pub fn set_unavailable(&self, unavailable: bool) {
    self.unavailable.store(unavailable, Ordering::SeqCst);
  }

  fn check_available(&self) -> Result<()> {
    if self.unavailable.load(Ordering::SeqCst) {
      return Err(Error::Unavailable("store is offline".into()));
    }
    Ok(())
  }

  fn read(&self) -> Result<RwLockReadGuard<'_, Table>> {
    self.check_available()?;
    self
      .table
      .read()
      .map_err(|_| Error::Unavailable("lock poisoned".into()))
  }

  fn write(&self) -> Result<RwLockWriteGuard<'_, Table>> {
    self.check_available()?;
    self
      .table
      .write()
      .map_err(|_| Error::Unavailable("lock poisoned".into()))
  }
}

impl PeopleStore for InMemoryStore {
  type Error = Error;

  async fn get_all(&self) -> Result<Vec<Person>> {
    Ok(self.read()?.people.values().cloned().collect())
  }

  async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>> {
    Ok(self.read()?.people.get(&id).cloned())
  }

  async fn search(&self, term: &str) -> Result<Vec<Person>> {
    Ok(
      self
        .read()?
        .people
        .values()
        .filter(|p| p.matches_term(term))
        .cloned()
        .collect(),
    )
  }

  async fn add(&self, mut person: Person) -> Result<PersonId> {
    let mut table = self.write()?;
    table.last_id += 1;
    person.id = table.last_id;
    table.people.insert(person.id, person);
    Ok(table.last_id)
  }

  async fn update(&self, person: Person) -> Result<()> {
    let mut table = self.write()?;
    match table.people.get_mut(&person.id) {
      Some(existing) => {
        *existing = person;
        Ok(())
      }
      None => Err(Error::PersonNotFound(person.id)),
    }
  }

  async fn delete(&self, id: PersonId) -> Result<bool> {
    Ok(self.write()?.people.remove(&id).is_some())
  }
}
