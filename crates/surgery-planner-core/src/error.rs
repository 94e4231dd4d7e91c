//! Crate-level error type.

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::config::ConfigError;
use crate::models::InvalidConfigError;
use crate::registry::RegistryError;
use crate::suspension::InvalidDateError;
use crate::validation::ValidationError;

/// Any failure surfaced by [`crate::SurgeryPlanner`].
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
