use std::collections::HashMap;

use anyhow::Result;

/// Durable key-value home for the encoded budget snapshot.
pub(crate) trait SnapshotStore {
    fn write(&mut self, key: &str, payload: &str) -> Result<()>;
    fn read(&self, key: &str) -> Result<Option<String>>;
}

/// Volatile store. Used when the database cannot be opened, and by tests.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    #[cfg(test)]
    pub(crate) fn with_record(key: &str, payload: &str) -> Self {
        let mut store = Self::default();
        store.records.insert(key.to_string(), payload.to_string());
        store
    }
}

impl SnapshotStore for MemoryStore {
    fn write(&mut self, key: &str, payload: &str) -> Result<()> {
        self.records.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }
}
