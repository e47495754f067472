//! Key-value persistence gateway and its implementations.
//!
//! # Responsibility
//! - Provide whole-blob `get`/`put`/`remove` over string keys.
//! - Encode/decode whole collections as JSON under well-known keys.
//!
//! # Invariants
//! - `put` overwrites the previous value for a key atomically.
//! - Encode/decode failures are returned, never swallowed.
//! - SQLite-backed stores refuse connections that were not migrated.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the JSON array of tasks.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the JSON array of task ids in custom order.
pub const CUSTOM_ORDER_KEY: &str = "customOrder";
/// Key holding the JSON array of notes.
pub const NOTES_KEY: &str = "notes";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure while reading or writing persisted blobs.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    Encode {
        key: String,
        source: serde_json::Error,
    },
    Decode {
        key: String,
        source: serde_json::Error,
    },
    InvalidUtf8 {
        key: String,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "failed to decode `{key}`: {source}"),
            Self::InvalidUtf8 { key } => write!(f, "value under `{key}` is not valid UTF-8"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::UninitializedConnection { .. } | Self::InvalidUtf8 { .. } => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Blob store addressed by string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> PersistenceResult<()>;
    fn remove(&self, key: &str) -> PersistenceResult<()>;
    /// Keys starting with `prefix`, ascending.
    fn keys_with_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> PersistenceResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        (**self).remove(key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }
}

/// Reads and decodes the JSON value under `key`. Missing keys yield `None`.
pub fn load_json<T, S>(store: &S, key: &str) -> PersistenceResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(bytes) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| PersistenceError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Encodes `value` as JSON and overwrites `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> PersistenceResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let bytes = serde_json::to_vec(value).map_err(|source| PersistenceError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.put(key, &bytes)
}

/// Reads the plain UTF-8 text under `key`.
pub fn load_text<S>(store: &S, key: &str) -> PersistenceResult<Option<String>>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| PersistenceError::InvalidUtf8 {
                key: key.to_string(),
            }),
        None => Ok(None),
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
#[derive(Clone, Copy)]
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> PersistenceResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(PersistenceError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> PersistenceResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries WHERE substr(key, 1, ?2) = ?1 ORDER BY key ASC;")?;
        let char_len = i64::try_from(prefix.chars().count()).unwrap_or(i64::MAX);
        let mut rows = stmt.query(params![prefix, char_len])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }
}

/// Process-local store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> PersistenceResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> PersistenceResult<Vec<String>> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
