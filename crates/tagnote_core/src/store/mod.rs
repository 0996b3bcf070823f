//! Persisted-state container over a host-provided key-value medium.
//!
//! # Responsibility
//! - Define the durable medium contract and its bundled implementations.
//! - Provide `PersistentStore<T>`: lazy first read, write-through `set`.
//!
//! # Invariants
//! - One successful medium read per store instance.
//! - One medium write per `set`, completed before `set` returns.
//! - Undecodable payloads surface as `CorruptPersistedState`, never as defaults.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod medium;
pub mod persistent;
pub mod sqlite;

pub use medium::{DurableMedium, MediumError, MediumResult, MemoryMedium};
pub use persistent::{InitialValue, PersistentStore, ValueIdentity};
pub use sqlite::SqliteMedium;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reading or writing persisted state.
#[derive(Debug)]
pub enum StoreError {
    /// A payload exists under `key` but does not decode into the stored type.
    CorruptPersistedState {
        key: String,
        source: serde_json::Error,
    },
    /// The in-memory value could not be encoded for `key`.
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    Medium(MediumError),
    /// Internal bookkeeping mismatch.
    InconsistentState(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptPersistedState { key, source } => {
                write!(f, "corrupt persisted state under `{key}`: {source}")
            }
            Self::Serialize { key, source } => {
                write!(f, "failed to serialize state for `{key}`: {source}")
            }
            Self::Medium(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptPersistedState { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            Self::Medium(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<MediumError> for StoreError {
    fn from(value: MediumError) -> Self {
        Self::Medium(value)
    }
}
