//! Model trait and errors shared by every priority model backend.

use thiserror::Error;

/// Number of features every model expects, in the order produced by the core's
/// feature extraction.
pub const FEATURE_COUNT: usize = 8;

/// Model errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// A model mapping a numeric feature vector to a raw ordinal class.
///
/// Implementations return whatever the underlying artifact produces; range
/// checking of the output is the caller's job.
pub trait OrdinalModel: Send + Sync {
    /// Predict the raw class for one feature vector.
    fn predict(&self, features: &[f64]) -> ModelResult<i64>;
}

pub(crate) fn check_feature_count(features: &[f64]) -> ModelResult<()> {
    if features.len() != FEATURE_COUNT {
        return Err(ModelError::FeatureCount {
            expected: FEATURE_COUNT,
            actual: features.len(),
        });
    }
    Ok(())
}

/// Model that always answers with the same raw class.
///
/// Useful for tests and demos without a trained artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedModel {
    pub output: i64,
}

impl FixedModel {
    pub fn new(output: i64) -> Self {
        Self { output }
    }
}

impl OrdinalModel for FixedModel {
    fn predict(&self, features: &[f64]) -> ModelResult<i64> {
        check_feature_count(features)?;
        Ok(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_model() {
        let model = FixedModel::new(2);
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]).unwrap(), 2);
    }

    #[test]
    fn test_fixed_model_passes_through_out_of_range_output() {
        // Range checking belongs to the consumer
        let model = FixedModel::new(9);
        assert_eq!(model.predict(&[1.0; FEATURE_COUNT]).unwrap(), 9);
    }

    #[test]
    fn test_wrong_feature_count() {
        let model = FixedModel::new(0);
        let err = model.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureCount {
                expected: 8,
                actual: 2
            }
        ));
    }
}
