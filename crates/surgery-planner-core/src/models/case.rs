//! Surgical case models.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::medication::Medication;

/// `surgery_type` value for the hip-fracture class, which is operated in the afternoon.
pub const HIP_FRACTURE: u8 = 2;

/// Default `surgery_type` when a payload omits it.
pub const DEFAULT_SURGERY_TYPE: i64 = 2;

/// Default `operating_room` hint when a payload omits it.
pub const DEFAULT_OPERATING_ROOM: i64 = 1;

/// A validated surgical case. Build one with [`crate::validation::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    /// Caller-assigned identifier
    pub id: i64,
    /// 0 (least urgent) to 5
    pub urgency: u8,
    /// Coarse bucket, 0 to 4
    pub time_since_injury: u8,
    /// 0 to 3
    pub functional_impact: u8,
    /// 0 to 2
    pub patient_condition: u8,
    /// Current anticoagulant / antiplatelet, if any
    pub medication: Medication,
    /// Date of the last dose, never in the future
    pub last_medication_date: NaiveDate,
    /// 0 to 6
    pub delay_days: u8,
    /// 0 to 2; [`HIP_FRACTURE`] routes to the afternoon session
    pub surgery_type: u8,
    /// Preferred room, 0 to 2 (a hint, not used for allocation)
    pub operating_room: u8,
    /// Why the case cannot be operated; only set while NON-OPERABLE
    pub condition_reason: Option<String>,
}

impl Case {
    /// Whether this case belongs to the afternoon (hip-fracture) track.
    pub fn is_hip_fracture(&self) -> bool {
        self.surgery_type == HIP_FRACTURE
    }

    /// Feature vector consumed by the priority model.
    ///
    /// Order: urgency, time_since_injury, functional_impact, patient_condition,
    /// medication_code, delay_days, surgery_type, operating_room.
    pub fn features(&self) -> [f64; 8] {
        [
            f64::from(self.urgency),
            f64::from(self.time_since_injury),
            f64::from(self.functional_impact),
            f64::from(self.patient_condition),
            f64::from(self.medication.code()),
            f64::from(self.delay_days),
            f64::from(self.surgery_type),
            f64::from(self.operating_room),
        ]
    }

    /// Earliest date the medication suspension allows surgery.
    ///
    /// `None` only if the date would overflow the calendar.
    pub fn earliest_surgery_date(&self) -> Option<NaiveDate> {
        self.last_medication_date
            .checked_add_days(Days::new(self.medication.suspension_days()))
    }

    /// Whether the suspension interval has elapsed by `date`.
    pub fn is_cleared_on(&self, date: NaiveDate) -> bool {
        self.earliest_surgery_date().is_some_and(|earliest| earliest <= date)
    }
}

/// An inbound case payload, before validation.
///
/// Every bounded field is a plain integer so that out-of-range values reach
/// the validator instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawCase {
    pub id: i64,
    pub urgency: i64,
    pub time_since_injury: i64,
    pub functional_impact: i64,
    pub patient_condition: i64,
    pub medication: String,
    /// `YYYY-MM-DD`
    pub last_medication_date: String,
    pub delay_days: i64,
    #[serde(default = "default_surgery_type")]
    pub surgery_type: i64,
    #[serde(default = "default_operating_room")]
    pub operating_room: i64,
    #[serde(default)]
    pub condition_reason: Option<String>,
}

fn default_surgery_type() -> i64 {
    DEFAULT_SURGERY_TYPE
}

fn default_operating_room() -> i64 {
    DEFAULT_OPERATING_ROOM
}

impl From<&Case> for RawCase {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id,
            urgency: case.urgency.into(),
            time_since_injury: case.time_since_injury.into(),
            functional_impact: case.functional_impact.into(),
            patient_condition: case.patient_condition.into(),
            medication: case.medication.name().to_string(),
            last_medication_date: case.last_medication_date.format("%Y-%m-%d").to_string(),
            delay_days: case.delay_days.into(),
            surgery_type: case.surgery_type.into(),
            operating_room: case.operating_room.into(),
            condition_reason: case.condition_reason.clone(),
        }
    }
}
