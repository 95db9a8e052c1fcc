use crate::core::{InferenceError, InferenceModel};
use crate::models::{ModelMetadata, FEATURE_COUNT};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading the model artifact at startup
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact could not be read from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("model artifact is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model artifact contains no trees")]
    Empty,

    #[error("tree {tree} is inconsistent: {reason}")]
    BadTree { tree: usize, reason: String },
}

/// One regression tree in exported array form.
///
/// Parallel arrays indexed by node id: `feature[i] < 0` marks a leaf whose
/// prediction is `value[i]`; otherwise the row is routed left when
/// `row[feature[i]] <= threshold[i]` and right otherwise.
#[derive(Debug, Clone, Deserialize)]
struct TreeSpec {
    feature: Vec<i32>,
    threshold: Vec<f64>,
    left: Vec<u32>,
    right: Vec<u32>,
    value: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ArtifactSpec {
    metadata: ModelMetadata,
    trees: Vec<TreeSpec>,
}

/// Regression tree ensemble loaded from an exported JSON artifact.
///
/// The artifact is produced by the training pipeline; prediction is the
/// mean of the per-tree outputs. Immutable after load, safe for concurrent
/// evaluation.
pub struct ForestModel {
    metadata: ModelMetadata,
    trees: Vec<TreeSpec>,
}

impl ForestModel {
    /// Load and validate an artifact from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|source| ModelError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_artifact_json(&raw)
    }

    /// Parse and validate an artifact from its JSON text
    pub fn from_artifact_json(raw: &str) -> Result<Self, ModelError> {
        let spec: ArtifactSpec = serde_json::from_str(raw)?;
        if spec.trees.is_empty() {
            return Err(ModelError::Empty);
        }
        for (index, tree) in spec.trees.iter().enumerate() {
            validate_tree(index, tree)?;
        }
        Ok(Self {
            metadata: spec.metadata,
            trees: spec.trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

/// Check the structural invariants tree evaluation relies on, so that
/// `eval_tree` can index without runtime checks and always terminates.
fn validate_tree(index: usize, tree: &TreeSpec) -> Result<(), ModelError> {
    let nodes = tree.feature.len();
    let bad = |reason: String| ModelError::BadTree {
        tree: index,
        reason,
    };

    if nodes == 0 {
        return Err(bad("no nodes".to_string()));
    }
    if tree.threshold.len() != nodes
        || tree.left.len() != nodes
        || tree.right.len() != nodes
        || tree.value.len() != nodes
    {
        return Err(bad(format!(
            "array lengths differ (feature={}, threshold={}, left={}, right={}, value={})",
            nodes,
            tree.threshold.len(),
            tree.left.len(),
            tree.right.len(),
            tree.value.len()
        )));
    }

    for node in 0..nodes {
        let feature = tree.feature[node];
        if feature < 0 {
            continue; // leaf
        }
        if feature as usize >= FEATURE_COUNT {
            return Err(bad(format!(
                "node {} splits on feature {} but the model takes {} features",
                node, feature, FEATURE_COUNT
            )));
        }
        let (left, right) = (tree.left[node] as usize, tree.right[node] as usize);
        // Children must point forward; this is the export's node ordering
        // and it guarantees traversal terminates.
        if left <= node || left >= nodes || right <= node || right >= nodes {
            return Err(bad(format!(
                "node {} has out-of-order children ({}, {})",
                node, left, right
            )));
        }
    }
    Ok(())
}

/// Walk one tree from the root to a leaf. Bounds are guaranteed by
/// `validate_tree` at load time.
#[inline]
fn eval_tree(tree: &TreeSpec, row: &[f64; FEATURE_COUNT]) -> f64 {
    let mut node = 0usize;
    loop {
        let feature = tree.feature[node];
        if feature < 0 {
            return tree.value[node];
        }
        node = if row[feature as usize] <= tree.threshold[node] {
            tree.left[node] as usize
        } else {
            tree.right[node] as usize
        };
    }
}

impl InferenceModel for ForestModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict_batch(&self, rows: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>, InferenceError> {
        let results = rows
            .iter()
            .map(|row| {
                let sum: f64 = self.trees.iter().map(|tree| eval_tree(tree, row)).sum();
                sum / self.trees.len() as f64
            })
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FEATURE_ORDER;

    fn artifact(trees: &str) -> String {
        let names: Vec<String> = FEATURE_ORDER.iter().map(|s| format!("\"{}\"", s)).collect();
        format!(
            r#"{{
                "metadata": {{
                    "name": "energy_rf_model",
                    "version": "1.0.0",
                    "referenceYear": 2025,
                    "featureNames": [{}]
                }},
                "trees": {}
            }}"#,
            names.join(","),
            trees
        )
    }

    const STUMP: &str = r#"[{
        "feature": [4, -1, -1],
        "threshold": [500.0, 0.0, 0.0],
        "left": [1, 0, 0],
        "right": [2, 0, 0],
        "value": [0.0, 100.0, 300.0]
    }]"#;

    fn row_with_gfa_total(gfa: f64) -> [f64; FEATURE_COUNT] {
        let mut row = [0.0; FEATURE_COUNT];
        row[4] = gfa; // PropertyGFATotal
        row
    }

    #[test]
    fn test_stump_routes_on_threshold() {
        let model = ForestModel::from_artifact_json(&artifact(STUMP)).unwrap();
        let results = model
            .predict_batch(&[row_with_gfa_total(200.0), row_with_gfa_total(900.0)])
            .unwrap();
        assert_eq!(results, vec![100.0, 300.0]);
    }

    #[test]
    fn test_forest_averages_trees() {
        let trees = r#"[
            {"feature": [-1], "threshold": [0.0], "left": [0], "right": [0], "value": [10.0]},
            {"feature": [-1], "threshold": [0.0], "left": [0], "right": [0], "value": [30.0]}
        ]"#;
        let model = ForestModel::from_artifact_json(&artifact(trees)).unwrap();
        assert_eq!(model.tree_count(), 2);
        let results = model.predict_batch(&[row_with_gfa_total(0.0)]).unwrap();
        assert_eq!(results, vec![20.0]);
    }

    #[test]
    fn test_metadata_readable_through_arc() {
        // Startup wiring reads the reference year off the shared handle
        // before handing the model to the predictor.
        let model =
            std::sync::Arc::new(ForestModel::from_artifact_json(&artifact(STUMP)).unwrap());
        assert_eq!(model.metadata().name, "energy_rf_model");
        assert_eq!(model.metadata().reference_year, 2025);
        assert_eq!(model.metadata().feature_names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_empty_forest_rejected() {
        let result = ForestModel::from_artifact_json(&artifact("[]"));
        assert!(matches!(result, Err(ModelError::Empty)));
    }

    #[test]
    fn test_ragged_tree_rejected() {
        let trees = r#"[{
            "feature": [4, -1],
            "threshold": [500.0],
            "left": [1, 0],
            "right": [1, 0],
            "value": [0.0, 100.0]
        }]"#;
        let result = ForestModel::from_artifact_json(&artifact(trees));
        assert!(matches!(result, Err(ModelError::BadTree { tree: 0, .. })));
    }

    #[test]
    fn test_backward_child_rejected() {
        let trees = r#"[{
            "feature": [4, -1],
            "threshold": [500.0, 0.0],
            "left": [0, 0],
            "right": [1, 0],
            "value": [0.0, 100.0]
        }]"#;
        let result = ForestModel::from_artifact_json(&artifact(trees));
        assert!(matches!(result, Err(ModelError::BadTree { tree: 0, .. })));
    }

    #[test]
    fn test_split_on_unknown_feature_rejected() {
        let trees = r#"[{
            "feature": [12, -1, -1],
            "threshold": [0.5, 0.0, 0.0],
            "left": [1, 0, 0],
            "right": [2, 0, 0],
            "value": [0.0, 1.0, 2.0]
        }]"#;
        let result = ForestModel::from_artifact_json(&artifact(trees));
        assert!(matches!(result, Err(ModelError::BadTree { tree: 0, .. })));
    }
}
