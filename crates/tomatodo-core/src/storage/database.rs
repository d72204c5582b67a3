//! SQLite-backed key-value slots.
//!
//! The whole application state lives in a single row of the `kv` table, so
//! the schema is deliberately tiny.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::warn;

use super::data_dir;
use super::slot::SlotStore;
use crate::error::StorageError;

/// File name inside the data directory.
pub const DB_FILE: &str = "tomatodo.db";

/// SQLite database holding the snapshot slot.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/tomatodo.db`.
    ///
    /// Creates the database file and schema if they don't exist. A file that
    /// is not a usable database is set aside (see [`Database::open_or_recover`]).
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or no database
    /// can be opened there.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_or_recover(&data_dir()?.join(DB_FILE))
    }

    /// Open `path`, moving an unusable file to `<path>.corrupt` and starting
    /// over with an empty database.
    ///
    /// A locked database is reported as is and never moved.
    ///
    /// # Errors
    /// Returns an error if the file cannot be moved or the fresh database
    /// cannot be created.
    pub fn open_or_recover(path: &Path) -> Result<Self, StorageError> {
        match Self::open_at(path) {
            Ok(db) => Ok(db),
            Err(StorageError::Locked) => Err(StorageError::Locked),
            Err(e) if path.is_file() => {
                let mut aside = path.as_os_str().to_owned();
                aside.push(".corrupt");
                let aside = PathBuf::from(aside);
                warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "database unusable, starting fresh"
                );
                std::fs::rename(path, &aside).map_err(|source| StorageError::SetAside {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::open_at(path)
            }
            Err(e) => Err(e),
        }
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SlotStore for Database {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }
}
