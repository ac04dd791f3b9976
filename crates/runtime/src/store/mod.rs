//! Shared keyed simulation state.
//!
//! The store is the only persistent memory of the modules. Values are a
//! closed enum ([`StateValue`]), reads can be typed through [`StateRecord`],
//! and writes are last-write-wins. [`StateStore::snapshot`] produces a deep,
//! detached copy for renderers and tools.

pub mod keys;
mod value;

pub use value::{StateRecord, StateValue};

use std::collections::BTreeMap;

use arena_core::{ErrorSeverity, GameError};
use serde::Serialize;

/// Errors raised by typed store reads.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The key has not been written yet.
    #[error("state key '{key}' has not been written")]
    MissingState { key: String },

    #[error("state key '{key}' holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingState { .. } => ErrorSeverity::Recoverable,
            Self::TypeMismatch { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingState { .. } => "MISSING_STATE",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
        }
    }
}

type Entries = BTreeMap<String, StateValue>;

fn read_entry<'a, T: StateRecord>(entries: &'a Entries, key: &str) -> Result<&'a T, StateError> {
    let value = entries.get(key).ok_or_else(|| StateError::MissingState {
        key: key.to_owned(),
    })?;
    T::from_value(value).ok_or_else(|| StateError::TypeMismatch {
        key: key.to_owned(),
        expected: T::KIND,
        found: value.kind(),
    })
}

/// Live key → value store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateStore {
    entries: Entries,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    /// Typed read. Missing keys and wrong variants are distinct errors.
    pub fn read<T: StateRecord>(&self, key: &str) -> Result<&T, StateError> {
        read_entry(&self.entries, key)
    }

    /// Creates or overwrites `key`, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StateValue>,
    ) -> Option<StateValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deep copy of the whole store. Later writes never show through.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            entries: self.entries.clone(),
        }
    }
}

/// Read-only deep copy of the store at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    entries: Entries,
}

impl StateSnapshot {
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    pub fn read<T: StateRecord>(&self, key: &str) -> Result<&T, StateError> {
        read_entry(&self.entries, key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries whose key belongs to `owner`'s namespace.
    pub fn owned_by<'a>(
        &'a self,
        owner: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a StateValue)> {
        self.entries
            .iter()
            .filter(move |(key, _)| keys::owner(key) == Some(owner))
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detached mutable copy; writes to it never reach the live store.
    pub fn into_store(self) -> StateStore {
        StateStore {
            entries: self.entries,
        }
    }
}
