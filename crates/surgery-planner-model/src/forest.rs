//! Tree-ensemble artifact exported from the training pipeline.
//!
//! The artifact is a JSON document:
//!
//! ```json
//! {
//!   "classes": [0, 1, 2, 3],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 0, "threshold": 2.5, "left": 1, "right": 2 },
//!         { "value": [8.0, 2.0, 0.0, 0.0] },
//!         { "value": [0.0, 0.0, 3.0, 7.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Split nodes send a sample left when `features[feature] <= threshold`.
//! Leaves hold per-class sample counts; the forest averages the normalized
//! leaf distributions and answers with the first class of maximal weight.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{check_feature_count, ModelError, ModelResult, OrdinalModel, FEATURE_COUNT};

/// A forest of decision trees voting over a fixed class list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Raw class labels, indexed by leaf distribution position
    pub classes: Vec<i64>,
    /// Member trees
    pub trees: Vec<DecisionTree>,
}

/// A single decision tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// Tree node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl ForestModel {
    /// Parse and check an artifact from its JSON text.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.check()?;
        Ok(model)
    }

    /// Load an artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Structural checks so that evaluation can never index out of bounds or loop.
    fn check(&self) -> ModelResult<()> {
        if self.classes.is_empty() {
            return Err(invalid("class list is empty"));
        }
        if self.trees.is_empty() {
            return Err(invalid("forest has no trees"));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(invalid(format!("tree {} has no nodes", t)));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(invalid(format!(
                                "tree {} node {} splits on feature {}",
                                t, i, feature
                            )));
                        }
                        // Children must come after their parent, which rules out cycles
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(invalid(format!(
                                    "tree {} node {} has bad child {}",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return Err(invalid(format!(
                                "tree {} leaf {} has {} weights for {} classes",
                                t,
                                i,
                                value.len(),
                                self.classes.len()
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Averaged class distribution for one sample.
    pub fn predict_distribution(&self, features: &[f64]) -> ModelResult<Vec<f64>> {
        check_feature_count(features)?;

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf_for(features);
            let sum: f64 = leaf.iter().sum();
            if sum <= 0.0 {
                continue;
            }
            for (total, weight) in totals.iter_mut().zip(leaf) {
                *total += weight / sum;
            }
        }

        let n = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n).collect())
    }
}

impl DecisionTree {
    fn leaf_for(&self, features: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl OrdinalModel for ForestModel {
    fn predict(&self, features: &[f64]) -> ModelResult<i64> {
        let distribution = self.predict_distribution(features)?;

        let mut best = 0;
        for (i, weight) in distribution.iter().enumerate() {
            if *weight > distribution[best] {
                best = i;
            }
        }

        Ok(self.classes[best])
    }
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::InvalidArtifact(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two stumps on urgency (feature 0) and functional impact (feature 2)
    const ARTIFACT: &str = r#"{
        "classes": [0, 1, 2, 3],
        "trees": [
            { "nodes": [
                { "feature": 0, "threshold": 2.5, "left": 1, "right": 2 },
                { "value": [6.0, 4.0, 0.0, 0.0] },
                { "value": [0.0, 0.0, 2.0, 8.0] }
            ] },
            { "nodes": [
                { "feature": 2, "threshold": 1.5, "left": 1, "right": 2 },
                { "value": [5.0, 5.0, 0.0, 0.0] },
                { "value": [0.0, 0.0, 5.0, 5.0] }
            ] }
        ]
    }"#;

    fn features(urgency: f64, functional_impact: f64) -> Vec<f64> {
        vec![urgency, 0.0, functional_impact, 0.0, 0.0, 0.0, 2.0, 1.0]
    }

    #[test]
    fn test_parse_artifact() {
        let model = ForestModel::from_json(ARTIFACT).unwrap();
        assert_eq!(model.classes, vec![0, 1, 2, 3]);
        assert_eq!(model.trees.len(), 2);
        assert!(matches!(model.trees[0].nodes[1], TreeNode::Leaf { .. }));
    }

    #[test]
    fn test_predict_low_urgency() {
        let model = ForestModel::from_json(ARTIFACT).unwrap();
        // (0.6 + 0.5) / 2 for class 0 beats (0.4 + 0.5) / 2 for class 1
        assert_eq!(model.predict(&features(1.0, 0.0)).unwrap(), 0);
    }

    #[test]
    fn test_predict_high_urgency() {
        let model = ForestModel::from_json(ARTIFACT).unwrap();
        assert_eq!(model.predict(&features(5.0, 3.0)).unwrap(), 3);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let model = ForestModel::from_json(ARTIFACT).unwrap();
        let dist = model.predict_distribution(&features(4.0, 1.0)).unwrap();
        let sum: f64 = dist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_picks_first_class() {
        let json = r#"{
            "classes": [1, 2],
            "trees": [ { "nodes": [ { "value": [3.0, 3.0] } ] } ]
        }"#;
        let model = ForestModel::from_json(json).unwrap();
        assert_eq!(model.predict(&[0.0; FEATURE_COUNT]).unwrap(), 1);
    }

    #[test]
    fn test_rejects_backward_child() {
        let json = r#"{
            "classes": [0, 1],
            "trees": [ { "nodes": [
                { "feature": 0, "threshold": 1.0, "left": 0, "right": 1 },
                { "value": [1.0, 0.0] }
            ] } ]
        }"#;
        let err = ForestModel::from_json(json).unwrap_err();
        assert!(matches!(err, ModelError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_unknown_feature() {
        let json = r#"{
            "classes": [0, 1],
            "trees": [ { "nodes": [
                { "feature": 8, "threshold": 1.0, "left": 1, "right": 2 },
                { "value": [1.0, 0.0] },
                { "value": [0.0, 1.0] }
            ] } ]
        }"#;
        assert!(matches!(
            ForestModel::from_json(json),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_rejects_leaf_width_mismatch() {
        let json = r#"{
            "classes": [0, 1, 2],
            "trees": [ { "nodes": [ { "value": [1.0, 0.0] } ] } ]
        }"#;
        assert!(matches!(
            ForestModel::from_json(json),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_rejects_empty_forest() {
        let json = r#"{ "classes": [0], "trees": [] }"#;
        assert!(matches!(
            ForestModel::from_json(json),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ForestModel::from_json("not a model"),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priority_model.json");
        std::fs::write(&path, ARTIFACT).unwrap();

        let model = ForestModel::load(&path).unwrap();
        assert_eq!(model.trees.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ForestModel::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }

    proptest::proptest! {
        #[test]
        fn prop_prediction_is_a_known_class(values in proptest::collection::vec(0.0f64..6.0, FEATURE_COUNT)) {
            let model = ForestModel::from_json(ARTIFACT).unwrap();
            let raw = model.predict(&values).unwrap();
            proptest::prop_assert!(model.classes.contains(&raw));

            let sum: f64 = model.predict_distribution(&values).unwrap().iter().sum();
            proptest::prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
