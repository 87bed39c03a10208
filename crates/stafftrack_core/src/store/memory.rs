//! In-process blob store.
//!
//! Holds values for the life of the value only. Read and write failures can
//! be switched on to exercise the degraded paths of `DataStore`.

use super::{BlobStore, StoreError, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    values: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        store.values.borrow_mut().insert(key.into(), value.into());
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Returns the raw stored value without going through failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.peek(key))
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
