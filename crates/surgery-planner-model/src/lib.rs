//! Priority model wrapper for the surgery planner.
//!
//! This crate evaluates tree-ensemble artifacts exported by the offline
//! training pipeline. It knows nothing about cases or priority labels: it maps
//! an 8-element feature vector to a raw ordinal class.

pub mod forest;
pub mod model;

pub use forest::*;
pub use model::*;
