//! Key-value defaults store contracts and implementations.
//!
//! # Responsibility
//! - Persist string-encoded preference values under stable keys.
//! - Isolate SQLite details from the preferences model.
//!
//! # Invariants
//! - `set` replaces any previous value for the key.
//! - Reading an absent key is `Ok(None)`, never an error.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type DefaultsResult<T> = Result<T, DefaultsError>;

#[derive(Debug)]
pub enum DefaultsError {
    Db(DbError),
}

impl Display for DefaultsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "defaults store failure: {err}"),
        }
    }
}

impl Error for DefaultsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for DefaultsError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for DefaultsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string key-value storage for preferences.
pub trait DefaultsStore: Send {
    fn get(&self, key: &str) -> DefaultsResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> DefaultsResult<()>;
    fn remove(&mut self, key: &str) -> DefaultsResult<()>;
    /// All keys in ascending order.
    fn keys(&self) -> DefaultsResult<Vec<String>>;
}

/// SQLite-backed defaults store.
pub struct SqliteDefaultsStore {
    conn: Connection,
}

impl SqliteDefaultsStore {
    /// Opens (and migrates) the defaults database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DefaultsResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DefaultsResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl DefaultsStore for SqliteDefaultsStore {
    fn get(&self, key: &str) -> DefaultsResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM defaults WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> DefaultsResult<()> {
        self.conn.execute(
            "INSERT INTO defaults (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DefaultsResult<()> {
        self.conn
            .execute("DELETE FROM defaults WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> DefaultsResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM defaults ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }
}

/// Volatile defaults store for tests and hosts without a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDefaultsStore {
    values: BTreeMap<String, String>,
}

impl MemoryDefaultsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DefaultsStore for MemoryDefaultsStore {
    fn get(&self, key: &str) -> DefaultsResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DefaultsResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DefaultsResult<()> {
        self.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> DefaultsResult<Vec<String>> {
        Ok(self.values.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultsStore, MemoryDefaultsStore, SqliteDefaultsStore};

    fn exercise(store: &mut dyn DefaultsStore) {
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("b", "1").unwrap();
        store.set("a", "2").unwrap();
        store.set("b", "3").unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some("3"));
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn memory_store_upserts_and_removes() {
        exercise(&mut MemoryDefaultsStore::new());
    }

    #[test]
    fn sqlite_store_upserts_and_removes() {
        let mut store = SqliteDefaultsStore::open_in_memory().expect("in-memory store");
        exercise(&mut store);
    }

    #[test]
    fn sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("defaults.sqlite3");
        {
            let mut store = SqliteDefaultsStore::open(&path).unwrap();
            store.set("default_font_size", "18").unwrap();
        }
        let store = SqliteDefaultsStore::open(&path).unwrap();
        assert_eq!(
            store.get("default_font_size").unwrap().as_deref(),
            Some("18")
        );
    }
}
