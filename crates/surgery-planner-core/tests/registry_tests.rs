//! NON-OPERABLE registry integration tests.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use surgery_planner_core::{Case, CaseRegistry, Medication, RegistryError};

fn make_case(id: i64) -> Case {
    Case {
        id,
        urgency: 3,
        time_since_injury: 2,
        functional_impact: 2,
        patient_condition: 2,
        medication: Medication::Acenocumarol,
        last_medication_date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
        delay_days: 4,
        surgery_type: 2,
        operating_room: 1,
        condition_reason: None,
    }
}

#[test]
fn test_concurrent_promote_succeeds_once() {
    let registry = Arc::new(CaseRegistry::in_memory());
    registry.register(make_case(1), "INR elevado").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.promote(1))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, RegistryError::NotFound { case_id: 1 })));
    assert!(registry.is_empty().unwrap());
}

#[test]
fn test_concurrent_registration_of_distinct_ids() {
    let registry = Arc::new(CaseRegistry::in_memory());

    let handles: Vec<_> = (0..16)
        .map(|id| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.register(make_case(id), "pendiente").map(|_| ()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(registry.len().unwrap(), 16);
}

#[test]
fn test_reregistration_replaces_reason() {
    let registry = CaseRegistry::in_memory();
    registry.register(make_case(3), "fiebre").unwrap();
    registry.register(make_case(3), "anemia").unwrap();

    assert_eq!(registry.len().unwrap(), 1);
    let entry = registry.entry(3).unwrap().unwrap();
    assert_eq!(entry.reason, "anemia");
    assert_eq!(entry.case.condition_reason.as_deref(), Some("anemia"));
}

#[test]
fn test_promote_clears_reason() {
    let registry = CaseRegistry::in_memory();
    registry.register(make_case(4), "hipopotasemia").unwrap();

    let case = registry.promote(4).unwrap();
    assert_eq!(case.id, 4);
    assert!(case.condition_reason.is_none());
    assert!(!registry.contains(4).unwrap());
    assert!(matches!(
        registry.promote(4),
        Err(RegistryError::NotFound { case_id: 4 })
    ));
}

#[test]
fn test_sqlite_registry_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");

    {
        let registry = CaseRegistry::open(&path).unwrap();
        registry.register(make_case(10), "INR elevado").unwrap();
        registry.register(make_case(11), "fiebre").unwrap();
        registry.promote(11).unwrap();
    }

    let registry = CaseRegistry::open(&path).unwrap();
    let ids: Vec<i64> = registry.list().unwrap().iter().map(|e| e.case.id).collect();
    assert_eq!(ids, vec![10]);

    let case = registry.find(10).unwrap().unwrap();
    assert_eq!(case.medication, Medication::Acenocumarol);
    assert_eq!(case.condition_reason.as_deref(), Some("INR elevado"));
}
