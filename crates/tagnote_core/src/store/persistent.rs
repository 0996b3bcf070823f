//! Lazily-materialized, write-through persisted value.
//!
//! # Responsibility
//! - Bind one typed value to one key of a `DurableMedium`.
//! - Resolve the initial value on first read only.
//! - Expose a value identity that changes on every `set`.
//!
//! # Invariants
//! - The medium is read at most once per successful materialization, and a
//!   store materializes at most once.
//! - `set` writes before it replaces the in-memory value, so a failed write
//!   leaves memory and medium in agreement.
//! - Payloads that fail to decode are reported, never replaced by defaults.

use crate::store::medium::DurableMedium;
use crate::store::{StoreError, StoreResult};
use log::{debug, error, info};
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

/// Value used when the medium has no entry for the store's key.
pub enum InitialValue<T> {
    Value(T),
    /// Zero-argument producer, called at most once.
    Producer(Box<dyn FnOnce() -> T>),
}

impl<T> InitialValue<T> {
    pub fn producer(f: impl FnOnce() -> T + 'static) -> Self {
        Self::Producer(Box::new(f))
    }

    fn resolve(self) -> T {
        match self {
            Self::Value(value) => value,
            Self::Producer(produce) => produce(),
        }
    }
}

/// Identity of the value currently held by one store instance.
///
/// Two identities compare equal only when they name the same store instance
/// and no `set` happened in between. Deep equality of values is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueIdentity {
    store: Uuid,
    revision: u64,
}

/// Typed value persisted as JSON under one key.
pub struct PersistentStore<T, M: DurableMedium> {
    medium: Rc<M>,
    key: String,
    initial: Cell<Option<InitialValue<T>>>,
    value: OnceCell<T>,
    instance: Uuid,
    revision: u64,
}

impl<T, M> PersistentStore<T, M>
where
    T: Serialize + DeserializeOwned,
    M: DurableMedium,
{
    /// Creates a store without touching the medium.
    pub fn new(medium: Rc<M>, key: impl Into<String>, initial: InitialValue<T>) -> Self {
        Self {
            medium,
            key: key.into(),
            initial: Cell::new(Some(initial)),
            value: OnceCell::new(),
            instance: Uuid::new_v4(),
            revision: 0,
        }
    }

    pub fn with_default(medium: Rc<M>, key: impl Into<String>, value: T) -> Self {
        Self::new(medium, key, InitialValue::Value(value))
    }

    pub fn with_producer(
        medium: Rc<M>,
        key: impl Into<String>,
        produce: impl FnOnce() -> T + 'static,
    ) -> Self {
        Self::new(medium, key, InitialValue::producer(produce))
    }

    /// Returns the current value, reading the medium on first access.
    ///
    /// # Errors
    /// - `CorruptPersistedState` when the stored payload does not decode.
    /// - `Medium` when the medium read fails.
    ///
    /// A failed first read leaves the store unmaterialized.
    pub fn get(&self) -> StoreResult<&T> {
        self.value.get_or_try_init(|| self.materialize())
    }

    /// Serializes `value`, writes it under the key, then replaces memory.
    pub fn set(&mut self, value: T) -> StoreResult<()> {
        let started_at = Instant::now();
        let payload = serde_json::to_string(&value).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;

        if let Err(err) = self.medium.write(&self.key, &payload) {
            error!(
                "event=store_write module=store status=error key={} duration_ms={} error={}",
                self.key,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        // A value set before the first read makes the initial value moot.
        drop(self.initial.take());
        self.value = OnceCell::from(value);
        self.revision += 1;
        debug!(
            "event=store_write module=store status=ok key={} revision={} bytes={} duration_ms={}",
            self.key,
            self.revision,
            payload.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Applies `mutate` to a copy of the current value and `set`s the result.
    pub fn modify<R>(&mut self, mutate: impl FnOnce(&mut T) -> R) -> StoreResult<R>
    where
        T: Clone,
    {
        let mut next = self.get()?.clone();
        let output = mutate(&mut next);
        self.set(next)?;
        Ok(output)
    }

    /// Returns the identity of the current value.
    pub fn identity(&self) -> ValueIdentity {
        ValueIdentity {
            store: self.instance,
            revision: self.revision,
        }
    }

    fn materialize(&self) -> StoreResult<T> {
        let started_at = Instant::now();
        let payload = match self.medium.read(&self.key) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=store_read module=store status=error key={} error_code=medium_read_failed error={}",
                    self.key, err
                );
                return Err(err.into());
            }
        };

        let Some(payload) = payload else {
            let initial = self
                .initial
                .take()
                .ok_or(StoreError::InconsistentState("initial value already consumed"))?;
            info!(
                "event=store_read module=store status=ok key={} source=initial duration_ms={}",
                self.key,
                started_at.elapsed().as_millis()
            );
            return Ok(initial.resolve());
        };

        match serde_json::from_str::<T>(&payload) {
            Ok(value) => {
                drop(self.initial.take());
                info!(
                    "event=store_read module=store status=ok key={} source=medium bytes={} duration_ms={}",
                    self.key,
                    payload.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(source) => {
                error!(
                    "event=store_read module=store status=error key={} error_code=corrupt_persisted_state line={} column={}",
                    self.key,
                    source.line(),
                    source.column()
                );
                Err(StoreError::CorruptPersistedState {
                    key: self.key.clone(),
                    source,
                })
            }
        }
    }
}
