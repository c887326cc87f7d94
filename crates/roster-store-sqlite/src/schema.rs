//! SQL schema for the Roster SQLite store.
//!
//! Applied in full every time a store is opened. Every statement is guarded
//! with `IF NOT EXISTS`, so reopening an existing database changes nothing.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids monotonic: a deleted id is never handed out again.
CREATE TABLE IF NOT EXISTS people (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL CHECK (length(first_name) BETWEEN 1 AND 100),
    last_name     TEXT NOT NULL CHECK (length(last_name)  BETWEEN 1 AND 100),
    middle_name   TEXT          CHECK (middle_name IS NULL OR length(middle_name) <= 100),
    email         TEXT NOT NULL CHECK (length(email)      BETWEEN 1 AND 100),
    address       TEXT NOT NULL CHECK (length(address)    BETWEEN 1 AND 300),
    date_of_birth TEXT             -- ISO 8601 UTC or NULL
);

CREATE INDEX IF NOT EXISTS people_first_name_idx ON people(first_name);
CREATE INDEX IF NOT EXISTS people_last_name_idx  ON people(last_name);

PRAGMA user_version = 1;
";
