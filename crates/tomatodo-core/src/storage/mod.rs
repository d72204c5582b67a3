mod config;
pub mod database;
mod slot;
mod snapshot;

pub use config::{AlertConfig, Config, KeysConfig, LoggingConfig};
pub use database::Database;
pub use slot::{MemorySlots, SlotStore};
pub use snapshot::{PersistedSnapshot, PersistenceGateway, SNAPSHOT_KEY};

use std::path::PathBuf;

use tracing::warn;

use crate::error::StorageError;

/// Snapshot gateway over the default database.
///
/// Never fails. If no database can be opened the session runs from memory
/// and nothing is kept across runs.
pub fn open_gateway() -> PersistenceGateway {
    match Database::open() {
        Ok(db) => PersistenceGateway::new(db),
        Err(e) => {
            warn!(error = %e, "storage unavailable, state will not be saved");
            PersistenceGateway::new(MemorySlots::new())
        }
    }
}

/// Resolve the data directory and make sure it exists.
///
/// `TOMATODO_DATA_DIR` wins when set. Otherwise `~/.config/tomatodo`, or
/// `~/.config/tomatodo-dev` with `TOMATODO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("TOMATODO_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOMATODO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tomatodo-dev")
            } else {
                base_dir.join("tomatodo")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
