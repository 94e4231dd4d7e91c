//! Priority classifier adapter.
//!
//! Wraps an opaque [`OrdinalModel`] and turns its raw output into a
//! [`Priority`]. A missing model is an error, never a default label, and an
//! output outside the label table is reported as a contract violation.

use std::path::Path;

use surgery_planner_model::{ForestModel, ModelError, OrdinalModel};
use thiserror::Error;

use crate::models::{Case, Priority};

/// Classifier errors.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Priority model is not loaded")]
    ModelUnavailable,

    #[error("Priority model returned {raw}, which is not a known priority")]
    ContractViolation { raw: i64 },

    #[error("Priority model failed: {0}")]
    Inference(#[from] ModelError),
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Adapter between cases and the priority model.
pub struct PriorityClassifier {
    model: Option<Box<dyn OrdinalModel>>,
}

impl PriorityClassifier {
    pub fn new(model: Box<dyn OrdinalModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Classifier with no model; every call fails with `ModelUnavailable`.
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    /// Load a forest artifact, failing on any error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let model = ForestModel::load(path)?;
        Ok(Self::new(Box::new(model)))
    }

    /// Load a forest artifact, logging a failure and staying unloaded.
    pub fn load_or_unavailable<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(classifier) => {
                tracing::info!(path = %path.display(), "priority model loaded");
                classifier
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "failed to load priority model; classification disabled"
                );
                Self::unavailable()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Classify a raw feature vector.
    pub fn classify_features(&self, features: &[f64; 8]) -> ClassifierResult<Priority> {
        let model = self.model.as_ref().ok_or(ClassifierError::ModelUnavailable)?;
        let raw = model.predict(features)?;
        Priority::from_raw(raw).ok_or(ClassifierError::ContractViolation { raw })
    }

    /// Classify a case.
    pub fn classify(&self, case: &Case) -> ClassifierResult<Priority> {
        let priority = self.classify_features(&case.features())?;
        tracing::debug!(case_id = case.id, %priority, "case classified");
        Ok(priority)
    }
}
