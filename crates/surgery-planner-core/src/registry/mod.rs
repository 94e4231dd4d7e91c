//! Registry of NON-OPERABLE cases.
//!
//! A case is operable unless it has an entry here. Registration stores the
//! case with its reason; promotion removes it again. Every operation takes one
//! lock around the backing store, so two promotions of the same id can never
//! both succeed.

mod memory;

pub use memory::*;

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbError, DbResult};
use crate::models::Case;

/// Registry errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Case {case_id} is not registered as non-operable")]
    NotFound { case_id: i64 },

    #[error("Registry storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Registry lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<PoisonError<T>> for RegistryError {
    fn from(e: PoisonError<T>) -> Self {
        RegistryError::LockPoisoned(e.to_string())
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A case held back from scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NonOperableEntry {
    /// The held case; its `condition_reason` mirrors `reason`
    pub case: Case,
    /// Why the case cannot be operated
    pub reason: String,
    /// Registration timestamp (RFC 3339, UTC)
    pub registered_at: String,
}

/// Key-value storage for registry entries, keyed by case id.
///
/// Each call must be atomic on its own; the registry adds the cross-call lock.
pub trait RegistryStore: Send {
    /// Insert or replace the entry for `entry.case.id`.
    fn upsert(&mut self, entry: NonOperableEntry) -> DbResult<()>;

    fn get(&self, case_id: i64) -> DbResult<Option<NonOperableEntry>>;

    /// Remove and return the entry, if present.
    fn remove(&mut self, case_id: i64) -> DbResult<Option<NonOperableEntry>>;

    /// All entries ordered by case id.
    fn list(&self) -> DbResult<Vec<NonOperableEntry>>;
}

/// Thread-safe NON-OPERABLE registry.
pub struct CaseRegistry {
    store: Mutex<Box<dyn RegistryStore>>,
}

impl Default for CaseRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl CaseRegistry {
    /// Registry that lives as long as the process.
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Registry persisted in a SQLite file.
    pub fn open<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        let db = Database::open(path)?;
        Ok(Self::with_store(Box::new(db)))
    }

    pub fn with_store(store: Box<dyn RegistryStore>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, Box<dyn RegistryStore>>> {
        Ok(self.store.lock()?)
    }

    /// Mark a case NON-OPERABLE. Re-registering an id replaces the previous entry.
    pub fn register(&self, mut case: Case, reason: impl Into<String>) -> RegistryResult<NonOperableEntry> {
        let reason = reason.into();
        case.condition_reason = Some(reason.clone());
        let entry = NonOperableEntry {
            case,
            reason,
            registered_at: chrono::Utc::now().to_rfc3339(),
        };

        self.lock()?.upsert(entry.clone())?;
        tracing::info!(
            case_id = entry.case.id,
            reason = %entry.reason,
            "case registered as non-operable"
        );
        Ok(entry)
    }

    /// Look up a NON-OPERABLE case.
    pub fn find(&self, case_id: i64) -> RegistryResult<Option<Case>> {
        Ok(self.lock()?.get(case_id)?.map(|entry| entry.case))
    }

    /// Look up the full registry entry.
    pub fn entry(&self, case_id: i64) -> RegistryResult<Option<NonOperableEntry>> {
        Ok(self.lock()?.get(case_id)?)
    }

    pub fn contains(&self, case_id: i64) -> RegistryResult<bool> {
        Ok(self.lock()?.get(case_id)?.is_some())
    }

    /// Return a case to OPERABLE.
    ///
    /// The returned case has no `condition_reason`. Scheduling it again is up
    /// to the caller.
    pub fn promote(&self, case_id: i64) -> RegistryResult<Case> {
        let removed = self.lock()?.remove(case_id)?;

        match removed {
            Some(entry) => {
                tracing::info!(case_id, "case promoted to operable");
                let mut case = entry.case;
                case.condition_reason = None;
                Ok(case)
            }
            None => {
                tracing::warn!(case_id, "promotion requested for unregistered case");
                Err(RegistryError::NotFound { case_id })
            }
        }
    }

    /// All entries ordered by case id.
    pub fn list(&self) -> RegistryResult<Vec<NonOperableEntry>> {
        Ok(self.lock()?.list()?)
    }

    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.lock()?.list()?.len())
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Medication;
    use chrono::NaiveDate;

    fn case(id: i64) -> Case {
        Case {
            id,
            urgency: 3,
            time_since_injury: 1,
            functional_impact: 2,
            patient_condition: 1,
            medication: Medication::Ninguna,
            last_medication_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            delay_days: 0,
            surgery_type: 2,
            operating_room: 1,
            condition_reason: None,
        }
    }

    #[test]
    fn test_register_then_promote() {
        let registry = CaseRegistry::in_memory();
        registry.register(case(7), "hemoglobina baja").unwrap();
        assert!(registry.find(7).unwrap().is_some());

        let promoted = registry.promote(7).unwrap();
        assert_eq!(promoted.id, 7);
        assert_eq!(promoted.condition_reason, None);
        assert!(registry.find(7).unwrap().is_none());
    }

    #[test]
    fn test_promote_unregistered() {
        let registry = CaseRegistry::in_memory();
        let err = registry.promote(99).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { case_id: 99 }));
    }

    #[test]
    fn test_reregistration_keeps_latest_reason() {
        let registry = CaseRegistry::in_memory();
        registry.register(case(7), "first").unwrap();
        registry.register(case(7), "second").unwrap();

        let entries = registry.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reason, "second");
        assert_eq!(
            registry.find(7).unwrap().unwrap().condition_reason,
            Some("second".into())
        );
    }

    #[test]
    fn test_promote_twice_fails_second_time() {
        let registry = CaseRegistry::in_memory();
        registry.register(case(3), "fiebre").unwrap();

        assert!(registry.promote(3).is_ok());
        assert!(matches!(
            registry.promote(3),
            Err(RegistryError::NotFound { case_id: 3 })
        ));
    }

    #[test]
    fn test_list_ordered_and_len() {
        let registry = CaseRegistry::in_memory();
        assert!(registry.is_empty().unwrap());

        for id in [30, 10, 20] {
            registry.register(case(id), "hold").unwrap();
        }

        let ids: Vec<i64> = registry.list().unwrap().iter().map(|e| e.case.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(registry.len().unwrap(), 3);
        assert!(registry.contains(20).unwrap());
        assert!(!registry.contains(40).unwrap());
    }

    #[test]
    fn test_entry_has_timestamp() {
        let registry = CaseRegistry::in_memory();
        let entry = registry.register(case(1), "pendiente de analítica").unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.registered_at).is_ok());
        assert_eq!(registry.entry(1).unwrap(), Some(entry));
    }

    #[test]
    fn test_sqlite_backed_registry() {
        let registry = CaseRegistry::with_store(Box::new(Database::open_in_memory().unwrap()));
        registry.register(case(7), "INR elevado").unwrap();
        registry.register(case(7), "INR elevado (control)").unwrap();

        assert_eq!(registry.len().unwrap(), 1);
        assert!(registry.promote(7).is_ok());
        assert!(registry.find(7).unwrap().is_none());
        assert!(registry.promote(7).is_err());
    }
}
