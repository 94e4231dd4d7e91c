//! Session allocation.
//!
//! Single greedy pass in input order. Hip-fracture cases go to the afternoon
//! session, everything else to the morning session; a case whose session is
//! full goes to the waiting list. The allocator never reorders: callers that
//! want priority order run [`order_by_priority`] first.

use crate::models::{Case, InvalidConfigError, Priority, ScheduleResult, Session, SessionCapacity, SessionConfig};

/// Capacity-bounded allocator for one scheduling request.
#[derive(Debug, Clone, Copy)]
pub struct SessionAllocator {
    capacity: SessionCapacity,
}

impl SessionAllocator {
    pub fn new(capacity: SessionCapacity) -> Self {
        Self { capacity }
    }

    /// Build an allocator from caller-supplied room counts.
    pub fn from_config(config: &SessionConfig) -> Result<Self, InvalidConfigError> {
        Ok(Self::new(config.capacity()?))
    }

    pub fn capacity(&self) -> SessionCapacity {
        self.capacity
    }

    /// Partition `cases` into morning, afternoon and waiting lists.
    pub fn allocate(&self, cases: Vec<Case>) -> ScheduleResult {
        let mut result = ScheduleResult::default();

        for case in cases {
            let (session, limit) = match Session::for_case(&case) {
                Session::Afternoon => (&mut result.afternoon, self.capacity.afternoon),
                Session::Morning => (&mut result.morning, self.capacity.morning),
            };

            if session.len() < limit {
                session.push(case);
            } else {
                result.waiting.push(case);
            }
        }

        tracing::debug!(
            morning = result.morning.len(),
            afternoon = result.afternoon.len(),
            waiting = result.waiting.len(),
            "cases allocated"
        );
        result
    }
}

/// Validate the room configuration and allocate.
pub fn allocate_schedule(
    cases: Vec<Case>,
    morning_rooms: i64,
    afternoon_rooms: i64,
    max_per_room: i64,
) -> Result<ScheduleResult, InvalidConfigError> {
    let config = SessionConfig::new(morning_rooms, afternoon_rooms, max_per_room);
    Ok(SessionAllocator::from_config(&config)?.allocate(cases))
}

/// Order cases by priority, most urgent first. Ties keep their input order.
pub fn order_by_priority(mut ranked: Vec<(Case, Priority)>) -> Vec<Case> {
    // sort_by is stable
    ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
    ranked.into_iter().map(|(case, _)| case).collect()
}
