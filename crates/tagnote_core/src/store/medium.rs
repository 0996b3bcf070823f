//! Durable key-value media.
//!
//! # Responsibility
//! - Define the `DurableMedium` read/write contract used by stores.
//! - Provide the in-memory medium (the SQLite medium lives in `store::sqlite`).
//!
//! # Invariants
//! - `write` is synchronous: the payload is durable when it returns `Ok`.
//! - Media are single-threaded (`&self` receivers over interior mutability).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MediumResult<T> = Result<T, MediumError>;

#[derive(Debug)]
pub enum MediumError {
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `user_version` claims a bootstrapped database but `kv_entries` is gone.
    MissingKvTable,
    /// The medium refused the operation (for example, storage is full).
    Unavailable(String),
}

impl Display for MediumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingKvTable => write!(f, "database has no `kv_entries` table"),
            Self::Unavailable(message) => write!(f, "durable medium unavailable: {message}"),
        }
    }
}

impl Error for MediumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for MediumError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Host-provided persistent key-value storage.
pub trait DurableMedium {
    /// Returns the payload stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> MediumResult<Option<String>>;
    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, payload: &str) -> MediumResult<()>;
}

/// Process-local medium. Counts reads and writes.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RefCell<BTreeMap<String, String>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one raw payload without counting it as a write.
    pub fn with_entry(self, key: impl Into<String>, payload: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), payload.into());
        self
    }

    /// Returns the raw payload under `key` without counting a read.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Makes subsequent writes fail with `MediumError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl DurableMedium for MemoryMedium {
    fn read(&self, key: &str) -> MediumResult<Option<String>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> MediumResult<()> {
        if self.fail_writes.get() {
            return Err(MediumError::Unavailable(format!(
                "writes disabled for key `{key}`"
            )));
        }
        self.writes.set(self.writes.get() + 1);
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
