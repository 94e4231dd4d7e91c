//! Session capacity and schedule models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::case::Case;

/// Scheduling configuration that cannot produce a capacity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidConfigError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("session capacity overflows")]
    CapacityOverflow,
}

/// Room counts as supplied by the caller or a config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub morning_rooms: i64,
    pub afternoon_rooms: i64,
    pub max_per_room: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            morning_rooms: 2,
            afternoon_rooms: 1,
            max_per_room: 3,
        }
    }
}

impl SessionConfig {
    pub fn new(morning_rooms: i64, afternoon_rooms: i64, max_per_room: i64) -> Self {
        Self {
            morning_rooms,
            afternoon_rooms,
            max_per_room,
        }
    }

    /// Check the configuration and compute per-session capacities.
    ///
    /// Zero is a valid value and yields an empty session.
    pub fn capacity(&self) -> Result<SessionCapacity, InvalidConfigError> {
        let morning_rooms = non_negative("morning_rooms", self.morning_rooms)?;
        let afternoon_rooms = non_negative("afternoon_rooms", self.afternoon_rooms)?;
        let max_per_room = non_negative("max_per_room", self.max_per_room)?;

        Ok(SessionCapacity {
            morning: morning_rooms
                .checked_mul(max_per_room)
                .ok_or(InvalidConfigError::CapacityOverflow)?,
            afternoon: afternoon_rooms
                .checked_mul(max_per_room)
                .ok_or(InvalidConfigError::CapacityOverflow)?,
        })
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, InvalidConfigError> {
    usize::try_from(value).map_err(|_| {
        if value < 0 {
            InvalidConfigError::Negative { field, value }
        } else {
            InvalidConfigError::CapacityOverflow
        }
    })
}

/// Maximum number of cases per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCapacity {
    pub morning: usize,
    pub afternoon: usize,
}

/// Operating-room session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    Morning,
    Afternoon,
}

impl Session {
    /// Session a case is routed to; depends only on its surgery type.
    pub fn for_case(case: &Case) -> Self {
        if case.is_hip_fracture() {
            Session::Afternoon
        } else {
            Session::Morning
        }
    }
}

/// Partition of a batch of cases into sessions and a waiting list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub morning: Vec<Case>,
    pub afternoon: Vec<Case>,
    pub waiting: Vec<Case>,
}

impl ScheduleResult {
    /// Total number of cases across all three lists.
    pub fn total(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.waiting.len()
    }
}
