//! Storage layer for flightdesk.
//!
//! This module provides `SQLite`-based persistent storage for destinations,
//! pilots and flights. [`Storage`] owns the connection; the per-table
//! submodules hold the SQL and operate on any `&Connection`, so the same
//! statements run standalone or inside a [`Storage::transaction`].

pub mod destinations;
pub mod flights;
pub mod migrations;
pub mod pilots;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, Transaction};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Storage engine for flight data.
///
/// Provides persistent storage using `SQLite` with:
/// - Foreign keys enforced between flights, pilots and destinations
/// - WAL journaling for file-backed databases
/// - Closure-scoped transactions that roll back on error
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow the connection for read-only statements.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise,
    /// so no partial write of a failed operation is ever visible.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a database error if the
    /// transaction cannot be started or committed.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Years whose instants encode to the fixed-width stored form.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Whether `instant` encodes to a four-digit year that sorts and reads back.
#[must_use]
pub fn is_storable(instant: &DateTime<Utc>) -> bool {
    STORABLE_YEARS.contains(&instant.year())
}

/// Encode an instant in the stored `YYYY-MM-DDTHH:MM:SSZ` form.
///
/// Only instants accepted by [`is_storable`] keep that form.
#[must_use]
pub fn encode_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Decode a non-null stored instant from column `idx`.
pub(crate) fn decode_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_stored(&raw, idx)
}

/// Decode a nullable stored instant from column `idx`.
pub(crate) fn decode_optional_timestamp(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_stored(&raw, idx)).transpose()
}

fn parse_stored(raw: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_storable_year_range() {
        assert!(is_storable(&Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap()));
        assert!(is_storable(&Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap()));
        assert!(!is_storable(&Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap()));
        assert!(!is_storable(&Utc.with_ymd_and_hms(-1, 12, 31, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_path() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let storage = Storage::open_in_memory().unwrap();
        let enabled: i32 = storage
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let mut storage = Storage::open_in_memory().unwrap();
        storage
            .transaction(|tx| {
                tx.execute(
                    "INSERT INTO destinations (short_code, full_name) VALUES ('LHR', 'London')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        assert!(destinations::exists(storage.connection(), "LHR").unwrap());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut storage = Storage::open_in_memory().unwrap();
        let result: Result<()> = storage.transaction(|tx| {
            tx.execute(
                "INSERT INTO destinations (short_code, full_name) VALUES ('LHR', 'London')",
                [],
            )?;
            Err(Error::internal("abort"))
        });

        assert!(result.is_err());
        assert!(!destinations::exists(storage.connection(), "LHR").unwrap());
    }

    #[test]
    fn test_encode_timestamp_is_whole_seconds_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 2, 8, 5, 9).unwrap();
        assert_eq!(encode_timestamp(&instant), "2024-01-02T08:05:09Z");
    }

    #[test]
    fn test_encoded_timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        assert!(encode_timestamp(&earlier) < encode_timestamp(&later));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.query_row("SELECT 'yesterday'", [], |row| decode_timestamp(row, 0));
        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _))
        ));
    }

    #[test]
    fn test_decode_optional_null() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn
            .query_row("SELECT NULL", [], |row| decode_optional_timestamp(row, 0))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_open_file_based() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("flightdesk.db");

        let storage = Storage::open(&db_path).unwrap();
        assert_eq!(storage.path(), db_path);
        assert!(db_path.exists());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/flightdesk.db");

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(storage);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("flightdesk.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage
                .connection()
                .execute(
                    "INSERT INTO destinations (short_code, full_name) VALUES ('CDG', 'Paris')",
                    [],
                )
                .unwrap();
        }

        let storage = Storage::open(&db_path).unwrap();
        assert!(destinations::exists(storage.connection(), "CDG").unwrap());
    }
}
