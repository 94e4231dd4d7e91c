//! Earliest surgery date after anticoagulant / antiplatelet suspension.

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::models::suspension_days_for;

/// Date format accepted on every inbound date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date that could not be parsed or shifted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date '{input}', expected YYYY-MM-DD")]
pub struct InvalidDateError {
    pub input: String,
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| InvalidDateError {
        input: input.to_string(),
    })
}

/// Earliest permissible surgery date for a drug whose last dose was on `last_dose_date`.
///
/// Drugs outside the suspension table (including "Ninguna") need no wait.
pub fn surgery_date(medication: &str, last_dose_date: &str) -> Result<NaiveDate, InvalidDateError> {
    let last_dose = parse_date(last_dose_date)?;
    last_dose
        .checked_add_days(Days::new(suspension_days_for(medication)))
        .ok_or_else(|| InvalidDateError {
            input: last_dose_date.to_string(),
        })
}
