//! Surgery Planner Core Library
//!
//! Eligibility and session allocation for operating-room cases.
//!
//! # Architecture
//!
//! ```text
//! Raw case → Validation ──(rejected)──→ caller
//!                │
//!                ├──(condition_reason)──→ NON-OPERABLE registry ──(promote)──→ caller resubmits
//!                │
//!                ▼
//!        Priority classifier (opaque model)
//!                │
//!                ▼
//!        Order by priority (stable)
//!                │
//!                ▼
//!        Session allocator ──→ morning │ afternoon │ waiting
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Case, Medication, Priority, ScheduleResult)
//! - [`validation`]: Field-range and date checks on inbound payloads
//! - [`suspension`]: Earliest surgery date after withholding a drug
//! - [`registry`]: NON-OPERABLE case registry (memory or SQLite)
//! - [`classifier`]: Adapter from cases to the priority model
//! - [`allocator`]: Greedy capacity-bounded session allocation
//! - [`planner`]: Facade owning the registry and classifier
//! - [`db`]: SQLite storage for the registry

pub mod allocator;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod planner;
pub mod registry;
pub mod suspension;
pub mod validation;

// Re-export commonly used types
pub use allocator::{allocate_schedule, order_by_priority, SessionAllocator};
pub use classifier::{ClassifierError, PriorityClassifier};
pub use config::{ConfigError, PlannerConfig};
pub use db::Database;
pub use error::{PlannerError, PlannerResult};
pub use models::{
    Case, InvalidConfigError, Medication, Priority, RawCase, ScheduleResult, Session,
    SessionCapacity, SessionConfig,
};
pub use planner::{PlanOutcome, SurgeryPlanner};
pub use registry::{CaseRegistry, NonOperableEntry, RegistryError};
pub use suspension::{surgery_date, InvalidDateError};
pub use validation::{validate, ValidationError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiPlannerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model contract violation: {0}")]
    ContractViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ValidationError> for FfiPlannerError {
    fn from(e: ValidationError) -> Self {
        FfiPlannerError::Validation(e.to_string())
    }
}

impl From<InvalidDateError> for FfiPlannerError {
    fn from(e: InvalidDateError) -> Self {
        FfiPlannerError::InvalidDate(e.to_string())
    }
}

impl From<RegistryError> for FfiPlannerError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound { .. } => FfiPlannerError::NotFound(e.to_string()),
            _ => FfiPlannerError::Storage(e.to_string()),
        }
    }
}

impl From<ClassifierError> for FfiPlannerError {
    fn from(e: ClassifierError) -> Self {
        match e {
            ClassifierError::ModelUnavailable => FfiPlannerError::ModelUnavailable(e.to_string()),
            ClassifierError::ContractViolation { .. } | ClassifierError::Inference(_) => {
                FfiPlannerError::ContractViolation(e.to_string())
            }
        }
    }
}

impl From<InvalidConfigError> for FfiPlannerError {
    fn from(e: InvalidConfigError) -> Self {
        FfiPlannerError::InvalidConfig(e.to_string())
    }
}

impl From<ConfigError> for FfiPlannerError {
    fn from(e: ConfigError) -> Self {
        FfiPlannerError::InvalidConfig(e.to_string())
    }
}

impl From<PlannerError> for FfiPlannerError {
    fn from(e: PlannerError) -> Self {
        match e {
            PlannerError::Validation(e) => e.into(),
            PlannerError::InvalidDate(e) => e.into(),
            PlannerError::Registry(e) => e.into(),
            PlannerError::Classifier(e) => e.into(),
            PlannerError::InvalidConfig(e) => e.into(),
            PlannerError::Config(e) => e.into(),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a planner from a JSON configuration (`"{}"` for defaults).
#[uniffi::export]
pub fn open_planner(config_json: String) -> Result<Arc<SurgeryPlannerCore>, FfiPlannerError> {
    let config = PlannerConfig::from_json(&config_json)?;
    let planner = SurgeryPlanner::from_config(&config)?;
    Ok(Arc::new(SurgeryPlannerCore { planner }))
}

/// Open a planner with default sessions, an in-memory registry and no model (for testing).
#[uniffi::export]
pub fn open_planner_in_memory() -> Result<Arc<SurgeryPlannerCore>, FfiPlannerError> {
    let planner = SurgeryPlanner::from_config(&PlannerConfig::default())?;
    Ok(Arc::new(SurgeryPlannerCore { planner }))
}

/// Earliest surgery date (`YYYY-MM-DD`) after suspending a medication.
#[uniffi::export]
pub fn suspension_surgery_date(medication: String, last_dose_date: String) -> Result<String, FfiPlannerError> {
    let date = surgery_date(&medication, &last_dose_date)?;
    Ok(date.format(suspension::DATE_FORMAT).to_string())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe planner wrapper for FFI.
#[derive(uniffi::Object)]
pub struct SurgeryPlannerCore {
    planner: SurgeryPlanner,
}

impl SurgeryPlannerCore {
    /// Borrow the native planner.
    pub fn planner(&self) -> &SurgeryPlanner {
        &self.planner
    }

    fn validated(&self, cases: Vec<FfiCase>) -> Result<Vec<Case>, FfiPlannerError> {
        cases
            .into_iter()
            .map(|c| {
                self.planner
                    .validate(&RawCase::from(c))
                    .map_err(FfiPlannerError::from)
            })
            .collect()
    }
}

#[uniffi::export]
impl SurgeryPlannerCore {
    // =========================================================================
    // Case Operations
    // =========================================================================

    /// Validate a case payload; returns the normalized case.
    pub fn validate_case(&self, case: FfiCase) -> Result<FfiCase, FfiPlannerError> {
        let case = self.planner.validate(&RawCase::from(case))?;
        Ok(case.into())
    }

    // =========================================================================
    // Registry Operations
    // =========================================================================

    /// Mark a case NON-OPERABLE with a reason.
    pub fn register_non_operable(&self, case: FfiCase, reason: String) -> Result<FfiNonOperableEntry, FfiPlannerError> {
        let case = self.planner.validate(&RawCase::from(case))?;
        let entry = self.planner.register_non_operable(case, reason)?;
        Ok(entry.into())
    }

    /// Return a case to OPERABLE.
    pub fn promote_operable(&self, case_id: i64) -> Result<FfiCase, FfiPlannerError> {
        let case = self.planner.promote_operable(case_id)?;
        Ok(case.into())
    }

    /// Get a NON-OPERABLE entry by case ID.
    pub fn find_non_operable(&self, case_id: i64) -> Result<Option<FfiNonOperableEntry>, FfiPlannerError> {
        let entry = self.planner.find_non_operable(case_id)?;
        Ok(entry.map(|e| e.into()))
    }

    /// List all NON-OPERABLE entries.
    pub fn list_non_operable(&self) -> Result<Vec<FfiNonOperableEntry>, FfiPlannerError> {
        let entries = self.planner.list_non_operable()?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Scheduling Operations
    // =========================================================================

    /// Priority label ("Urgente", "Alta", "Media", "Baja") for a case.
    pub fn classify_priority(&self, case: FfiCase) -> Result<String, FfiPlannerError> {
        let case = self.planner.validate(&RawCase::from(case))?;
        let priority = self.planner.classify_priority(&case)?;
        Ok(priority.label().to_string())
    }

    /// Allocate cases in the given order.
    pub fn allocate_schedule(
        &self,
        cases: Vec<FfiCase>,
        morning_rooms: i64,
        afternoon_rooms: i64,
        max_per_room: i64,
    ) -> Result<FfiScheduleResult, FfiPlannerError> {
        let cases = self.validated(cases)?;
        let result = self
            .planner
            .allocate_schedule(cases, morning_rooms, afternoon_rooms, max_per_room)?;
        Ok(result.into())
    }

    /// Run the full pipeline with the configured sessions.
    pub fn plan(&self, cases: Vec<FfiCase>) -> Result<FfiPlanOutcome, FfiPlannerError> {
        let raws: Vec<RawCase> = cases.into_iter().map(Into::into).collect();
        let outcome = self.planner.plan(&raws)?;
        Ok(outcome.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe case payload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCase {
    pub id: i64,
    pub urgency: i64,
    pub time_since_injury: i64,
    pub functional_impact: i64,
    pub patient_condition: i64,
    pub medication: String,
    pub last_medication_date: String,
    pub delay_days: i64,
    pub surgery_type: i64,
    pub operating_room: i64,
    pub condition_reason: Option<String>,
}

impl From<FfiCase> for RawCase {
    fn from(case: FfiCase) -> Self {
        RawCase {
            id: case.id,
            urgency: case.urgency,
            time_since_injury: case.time_since_injury,
            functional_impact: case.functional_impact,
            patient_condition: case.patient_condition,
            medication: case.medication,
            last_medication_date: case.last_medication_date,
            delay_days: case.delay_days,
            surgery_type: case.surgery_type,
            operating_room: case.operating_room,
            condition_reason: case.condition_reason,
        }
    }
}

impl From<Case> for FfiCase {
    fn from(case: Case) -> Self {
        let raw = RawCase::from(&case);
        Self {
            id: raw.id,
            urgency: raw.urgency,
            time_since_injury: raw.time_since_injury,
            functional_impact: raw.functional_impact,
            patient_condition: raw.patient_condition,
            medication: raw.medication,
            last_medication_date: raw.last_medication_date,
            delay_days: raw.delay_days,
            surgery_type: raw.surgery_type,
            operating_room: raw.operating_room,
            condition_reason: raw.condition_reason,
        }
    }
}

/// FFI-safe registry entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNonOperableEntry {
    pub case_record: FfiCase,
    pub reason: String,
    pub registered_at: String,
}

impl From<NonOperableEntry> for FfiNonOperableEntry {
    fn from(entry: NonOperableEntry) -> Self {
        Self {
            case_record: entry.case.into(),
            reason: entry.reason,
            registered_at: entry.registered_at,
        }
    }
}

/// FFI-safe schedule.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScheduleResult {
    pub morning: Vec<FfiCase>,
    pub afternoon: Vec<FfiCase>,
    pub waiting: Vec<FfiCase>,
}

impl From<ScheduleResult> for FfiScheduleResult {
    fn from(result: ScheduleResult) -> Self {
        Self {
            morning: result.morning.into_iter().map(|c| c.into()).collect(),
            afternoon: result.afternoon.into_iter().map(|c| c.into()).collect(),
            waiting: result.waiting.into_iter().map(|c| c.into()).collect(),
        }
    }
}

/// FFI-safe priority assignment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCasePriority {
    pub case_id: i64,
    pub priority: String,
}

/// FFI-safe pipeline outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanOutcome {
    pub schedule: FfiScheduleResult,
    pub priorities: Vec<FfiCasePriority>,
    pub held: Vec<i64>,
    pub rejected: Vec<String>,
}

impl From<PlanOutcome> for FfiPlanOutcome {
    fn from(outcome: PlanOutcome) -> Self {
        Self {
            schedule: outcome.schedule.into(),
            priorities: outcome
                .priorities
                .into_iter()
                .map(|(case_id, priority)| FfiCasePriority {
                    case_id,
                    priority: priority.label().to_string(),
                })
                .collect(),
            held: outcome.held,
            rejected: outcome.rejected.iter().map(|e| e.to_string()).collect(),
        }
    }
}
