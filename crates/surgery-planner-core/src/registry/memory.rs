//! In-memory registry store.

use std::collections::BTreeMap;

use super::{NonOperableEntry, RegistryStore};
use crate::db::DbResult;

/// Process-lifetime store backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<i64, NonOperableEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStore for MemoryStore {
    fn upsert(&mut self, entry: NonOperableEntry) -> DbResult<()> {
        self.entries.insert(entry.case.id, entry);
        Ok(())
    }

    fn get(&self, case_id: i64) -> DbResult<Option<NonOperableEntry>> {
        Ok(self.entries.get(&case_id).cloned())
    }

    fn remove(&mut self, case_id: i64) -> DbResult<Option<NonOperableEntry>> {
        Ok(self.entries.remove(&case_id))
    }

    fn list(&self) -> DbResult<Vec<NonOperableEntry>> {
        Ok(self.entries.values().cloned().collect())
    }
}
