//! Planner facade.
//!
//! Owns the registry, the classifier and the default session configuration for
//! one process. Handlers share it through an `Arc`; every method takes `&self`.

use chrono::NaiveDate;

use crate::allocator::{allocate_schedule, order_by_priority, SessionAllocator};
use crate::classifier::{ClassifierResult, PriorityClassifier};
use crate::config::PlannerConfig;
use crate::error::PlannerResult;
use crate::models::{Case, InvalidConfigError, Priority, RawCase, ScheduleResult};
use crate::registry::{CaseRegistry, NonOperableEntry, RegistryResult};
use crate::suspension::{surgery_date, InvalidDateError};
use crate::validation::{validate, Clock, SystemClock, ValidationError};

/// Result of running a batch through the full pipeline.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    /// Session assignment of the operable cases
    pub schedule: ScheduleResult,
    /// Priority per scheduled case id, most urgent first
    pub priorities: Vec<(i64, Priority)>,
    /// Ids held back as NON-OPERABLE
    pub held: Vec<i64>,
    /// Payloads that failed validation
    pub rejected: Vec<ValidationError>,
}

pub struct SurgeryPlanner {
    registry: CaseRegistry,
    classifier: PriorityClassifier,
    allocator: SessionAllocator,
    clock: Box<dyn Clock>,
}

impl SurgeryPlanner {
    /// Build a planner from configuration.
    ///
    /// A model artifact that fails to load is logged and leaves the classifier
    /// unavailable; a registry file that cannot be opened is an error.
    pub fn from_config(config: &PlannerConfig) -> PlannerResult<Self> {
        let registry = match &config.registry_path {
            Some(path) => CaseRegistry::open(path)?,
            None => CaseRegistry::in_memory(),
        };
        let classifier = match &config.model_path {
            Some(path) => PriorityClassifier::load_or_unavailable(path),
            None => PriorityClassifier::unavailable(),
        };

        Ok(Self::new(
            registry,
            classifier,
            SessionAllocator::from_config(&config.sessions)?,
        ))
    }

    pub fn new(registry: CaseRegistry, classifier: PriorityClassifier, allocator: SessionAllocator) -> Self {
        Self {
            registry,
            classifier,
            allocator,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the date source used for validation.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn registry(&self) -> &CaseRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &PriorityClassifier {
        &self.classifier
    }

    // =========================================================================
    // Case operations
    // =========================================================================

    /// Validate an inbound payload.
    pub fn validate(&self, raw: &RawCase) -> Result<Case, ValidationError> {
        validate(raw, self.today())
    }

    /// Earliest surgery date after suspending `medication`.
    pub fn suspension_surgery_date(
        &self,
        medication: &str,
        last_dose_date: &str,
    ) -> Result<NaiveDate, InvalidDateError> {
        surgery_date(medication, last_dose_date)
    }

    // =========================================================================
    // Registry operations
    // =========================================================================

    pub fn register_non_operable(&self, case: Case, reason: impl Into<String>) -> RegistryResult<NonOperableEntry> {
        self.registry.register(case, reason)
    }

    /// Return a case to OPERABLE. The caller resubmits it for scheduling.
    pub fn promote_operable(&self, case_id: i64) -> RegistryResult<Case> {
        self.registry.promote(case_id)
    }

    pub fn find_non_operable(&self, case_id: i64) -> RegistryResult<Option<NonOperableEntry>> {
        self.registry.entry(case_id)
    }

    pub fn list_non_operable(&self) -> RegistryResult<Vec<NonOperableEntry>> {
        self.registry.list()
    }

    // =========================================================================
    // Scheduling operations
    // =========================================================================

    pub fn classify_priority(&self, case: &Case) -> ClassifierResult<Priority> {
        self.classifier.classify(case)
    }

    /// Allocate cases in the given order with explicit room counts.
    pub fn allocate_schedule(
        &self,
        cases: Vec<Case>,
        morning_rooms: i64,
        afternoon_rooms: i64,
        max_per_room: i64,
    ) -> Result<ScheduleResult, InvalidConfigError> {
        allocate_schedule(cases, morning_rooms, afternoon_rooms, max_per_room)
    }

    /// Full pipeline over a batch of payloads.
    ///
    /// Invalid payloads are collected in `rejected`. Payloads carrying a
    /// `condition_reason` are registered as NON-OPERABLE, and cases already in
    /// the registry are held. The rest are classified, ordered by priority and
    /// allocated with the configured capacity. Classification errors abort
    /// the whole batch and leave the registry untouched.
    pub fn plan(&self, raws: &[RawCase]) -> PlannerResult<PlanOutcome> {
        let today = self.today();
        let mut outcome = PlanOutcome::default();
        let mut operable = Vec::new();
        let mut to_register = Vec::new();

        for raw in raws {
            let case = match validate(raw, today) {
                Ok(case) => case,
                Err(e) => {
                    tracing::warn!(case_id = raw.id, error = %e, "case rejected");
                    outcome.rejected.push(e);
                    continue;
                }
            };

            if let Some(reason) = case.condition_reason.clone() {
                outcome.held.push(case.id);
                to_register.push((case, reason));
            } else if self.registry.contains(case.id)? {
                outcome.held.push(case.id);
            } else {
                operable.push(case);
            }
        }

        let mut ranked = Vec::with_capacity(operable.len());
        for case in operable {
            let priority = self.classifier.classify(&case)?;
            ranked.push((case, priority));
        }

        // Registry writes only once every classification has succeeded
        for (case, reason) in to_register {
            self.registry.register(case, reason)?;
        }

        let mut priorities: Vec<(i64, Priority)> = ranked.iter().map(|(c, p)| (c.id, *p)).collect();
        priorities.sort_by(|(_, a), (_, b)| b.cmp(a));
        outcome.priorities = priorities;
        outcome.schedule = self.allocator.allocate(order_by_priority(ranked));

        tracing::info!(
            submitted = raws.len(),
            rejected = outcome.rejected.len(),
            held = outcome.held.len(),
            morning = outcome.schedule.morning.len(),
            afternoon = outcome.schedule.afternoon.len(),
            waiting = outcome.schedule.waiting.len(),
            "batch planned"
        );
        Ok(outcome)
    }
}
