//! Durable key-value slot abstraction.

use std::collections::HashMap;

use crate::error::StorageError;

/// A string-keyed store of string values, overwrite semantics.
pub trait SlotStore {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace whatever is stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory slots for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, e.g. with a hand-written snapshot.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl SlotStore for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
