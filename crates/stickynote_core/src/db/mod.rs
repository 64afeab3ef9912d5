//! SQLite bootstrap for the key-value defaults store.
//!
//! # Responsibility
//! - Open the defaults database (file-backed or in-memory) and migrate it.
//! - Report open failures with enough context to pick a fallback store.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No defaults are read or written before migrations succeed.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The directory that should hold the defaults file could not be created.
    DataDirectory { path: PathBuf, source: io::Error },
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Short machine-readable tag used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataDirectory { .. } => "dir_create_failed",
            Self::Sqlite(_) => "sqlite_failed",
            Self::UnsupportedSchemaVersion { .. } => "schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataDirectory { path, source } => write!(
                f,
                "cannot create defaults directory {}: {source}",
                path.display()
            ),
            Self::Sqlite(err) => write!(f, "defaults database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "defaults schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataDirectory { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
