//! [`SqliteStore`]: the SQLite implementation of [`PeopleStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use roster_core::{
  person::{Person, PersonId},
  store::PeopleStore,
};

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, RawPerson, encode_dt, like_pattern},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A people store backed by a single SQLite file.
///
/// Every operation is one SQL statement executed on the connection thread, so
/// a caller that gives up on a pending call never observes a partial write.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` over `people` with an optional `WHERE` clause and one
  /// bound parameter.
  async fn query_people(
    &self,
    filter: Option<&'static str>,
    param: Option<String>,
  ) -> Result<Vec<Person>> {
    let sql = match filter {
      Some(cond) => format!("SELECT {PERSON_COLUMNS} FROM people WHERE {cond} ORDER BY id"),
      None => format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY id"),
    };

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

// ─── PeopleStore impl ────────────────────────────────────────────────────────

impl PeopleStore for SqliteStore {
  type Error = Error;

  async fn get_all(&self) -> Result<Vec<Person>> {
    self.query_people(None, None).await
  }

  async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>> {
    let sql = format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = ?1");

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawPerson::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn search(&self, term: &str) -> Result<Vec<Person>> {
    if term.trim().is_empty() {
      return self.query_people(None, None).await;
    }

    self
      .query_people(
        Some(
          "lower(first_name) LIKE ?1 ESCAPE '\\'
              OR lower(last_name) LIKE ?1 ESCAPE '\\'",
        ),
        Some(like_pattern(term)),
      )
      .await
  }

  async fn add(&self, person: Person) -> Result<PersonId> {
    let dob = person.date_of_birth.map(encode_dt);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (
             first_name, last_name, middle_name, email, address, date_of_birth
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            person.first_name,
            person.last_name,
            person.middle_name,
            person.email,
            person.address,
            dob,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(id)
  }

  async fn update(&self, person: Person) -> Result<()> {
    let id  = person.id;
    let dob = person.date_of_birth.map(encode_dt);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people SET
             first_name = ?2, last_name = ?3, middle_name = ?4,
             email = ?5, address = ?6, date_of_birth = ?7
           WHERE id = ?1",
          rusqlite::params![
            id,
            person.first_name,
            person.last_name,
            person.middle_name,
            person.email,
            person.address,
            dob,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }
    Ok(())
  }

  async fn delete(&self, id: PersonId) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM people WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    Ok(changed > 0)
  }
}
