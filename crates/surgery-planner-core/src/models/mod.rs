//! Domain models for the surgery planner.

mod case;
mod medication;
mod priority;
mod schedule;

pub use case::*;
pub use medication::*;
pub use priority::*;
pub use schedule::*;
