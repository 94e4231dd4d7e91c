//! Inbound case validation.
//!
//! Fields are checked independently, in this fixed order, and every violation
//! is reported:
//!
//! 1. `urgency` (0–5)
//! 2. `time_since_injury` (0–4)
//! 3. `functional_impact` (0–3)
//! 4. `patient_condition` (0–2)
//! 5. `medication` (fixed set)
//! 6. `last_medication_date` (`YYYY-MM-DD`, not after today)
//! 7. `delay_days` (0–6)
//! 8. `surgery_type` (0–2)
//! 9. `operating_room` (0–2)

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Case, Medication, RawCase};
use crate::suspension::parse_date;

/// Source of the current date for the future-date check.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// What was wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    OutOfRange { min: i64, max: i64, actual: i64 },
    UnknownMedication(String),
    InvalidDate(String),
    FutureDate { date: NaiveDate, today: NaiveDate },
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ViolationKind::OutOfRange { min, max, actual } => write!(
                f,
                "{} must be between {} and {} (got {})",
                self.field, min, max, actual
            ),
            ViolationKind::UnknownMedication(name) => {
                write!(f, "{}: unknown medication '{}'", self.field, name)
            }
            ViolationKind::InvalidDate(text) => write!(
                f,
                "{}: invalid date '{}', expected YYYY-MM-DD",
                self.field, text
            ),
            ViolationKind::FutureDate { date, today } => write!(
                f,
                "{}: {} is after today ({})",
                self.field, date, today
            ),
        }
    }
}

/// A rejected case with all of its violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid case {case_id}: {}", join_violations(.violations))]
pub struct ValidationError {
    pub case_id: i64,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Names of the offending fields, in check order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn violation(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a payload. Pure: depends only on `raw` and `today`.
pub fn validate(raw: &RawCase, today: NaiveDate) -> Result<Case, ValidationError> {
    let mut violations = Vec::new();

    let urgency = bounded(&mut violations, "urgency", raw.urgency, 0, 5);
    let time_since_injury = bounded(&mut violations, "time_since_injury", raw.time_since_injury, 0, 4);
    let functional_impact = bounded(&mut violations, "functional_impact", raw.functional_impact, 0, 3);
    let patient_condition = bounded(&mut violations, "patient_condition", raw.patient_condition, 0, 2);

    let medication = Medication::from_name(&raw.medication);
    if medication.is_none() {
        violations.push(FieldViolation {
            field: "medication",
            kind: ViolationKind::UnknownMedication(raw.medication.clone()),
        });
    }

    let last_medication_date = match parse_date(&raw.last_medication_date) {
        Ok(date) if date > today => {
            violations.push(FieldViolation {
                field: "last_medication_date",
                kind: ViolationKind::FutureDate { date, today },
            });
            None
        }
        Ok(date) => Some(date),
        Err(_) => {
            violations.push(FieldViolation {
                field: "last_medication_date",
                kind: ViolationKind::InvalidDate(raw.last_medication_date.clone()),
            });
            None
        }
    };

    let delay_days = bounded(&mut violations, "delay_days", raw.delay_days, 0, 6);
    let surgery_type = bounded(&mut violations, "surgery_type", raw.surgery_type, 0, 2);
    let operating_room = bounded(&mut violations, "operating_room", raw.operating_room, 0, 2);

    match (medication, last_medication_date) {
        (Some(medication), Some(last_medication_date)) if violations.is_empty() => Ok(Case {
            id: raw.id,
            urgency,
            time_since_injury,
            functional_impact,
            patient_condition,
            medication,
            last_medication_date,
            delay_days,
            surgery_type,
            operating_room,
            condition_reason: raw.condition_reason.clone(),
        }),
        _ => Err(ValidationError {
            case_id: raw.id,
            violations,
        }),
    }
}

/// Range-check one field. The returned value is only meaningful when no
/// violation was recorded.
fn bounded(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> u8 {
    if value < min || value > max {
        violations.push(FieldViolation {
            field,
            kind: ViolationKind::OutOfRange {
                min,
                max,
                actual: value,
            },
        });
        return 0;
    }
    u8::try_from(value).unwrap_or_default()
}
