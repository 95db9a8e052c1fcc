use crate::models::{FeatureVector, ModelMetadata, FEATURE_COUNT, FEATURE_ORDER};
use std::sync::Arc;
use thiserror::Error;

/// Failures surfaced by the model collaborator at inference time
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model evaluation failed: {0}")]
    ModelFailure(String),

    #[error("model returned an empty batch")]
    EmptyBatch,

    #[error("model returned a non-finite value: {0}")]
    NonFinite(f64),
}

/// Startup mismatch between the service's encoding schema and the
/// artifact's declared input columns
#[derive(Debug, Error)]
pub enum ModelSchemaError {
    #[error("model expects {expected} features, service encodes {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("feature {index} mismatch: model expects '{expected}', service encodes '{actual}'")]
    Order {
        index: usize,
        expected: String,
        actual: String,
    },
}

/// Inference capability of a loaded regression model.
///
/// Implementations must be safe for concurrent single-row calls; the
/// service invokes them from every worker without locking.
pub trait InferenceModel: Send + Sync {
    fn metadata(&self) -> &ModelMetadata;

    /// Evaluate a batch of rows in the model's positional column order
    fn predict_batch(&self, rows: &[[f64; FEATURE_COUNT]]) -> Result<Vec<f64>, InferenceError>;
}

/// Thin call-through to the loaded model.
///
/// Construction verifies the frozen feature order against the artifact's
/// declared schema, so a stale or reordered artifact is refused at startup
/// instead of silently mis-predicting.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn InferenceModel>,
}

// Not derivable over `Arc<dyn InferenceModel>`; identify the model instead.
impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let metadata = self.model.metadata();
        f.debug_struct("Predictor")
            .field("model", &metadata.name)
            .field("version", &metadata.version)
            .finish()
    }
}

impl Predictor {
    pub fn new(model: Arc<dyn InferenceModel>) -> Result<Self, ModelSchemaError> {
        let declared = &model.metadata().feature_names;
        if declared.len() != FEATURE_COUNT {
            return Err(ModelSchemaError::Arity {
                expected: declared.len(),
                actual: FEATURE_COUNT,
            });
        }
        for (index, (expected, actual)) in declared.iter().zip(FEATURE_ORDER.iter()).enumerate() {
            if expected != actual {
                return Err(ModelSchemaError::Order {
                    index,
                    expected: expected.clone(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(Self { model })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.model.metadata()
    }

    /// Run a single-row batch and extract the first result.
    ///
    /// No retries: inference is synchronous, in-process and deterministic,
    /// so a retry on identical input cannot change the outcome.
    pub fn predict(&self, vector: &FeatureVector) -> Result<f64, InferenceError> {
        let batch = [vector.to_row()];
        let results = self.model.predict_batch(&batch)?;
        let value = *results.first().ok_or(InferenceError::EmptyBatch)?;
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }
        Ok(value)
    }
}
