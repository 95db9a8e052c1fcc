// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FeatureVector, ModelMetadata, FEATURE_COUNT, FEATURE_ORDER};
pub use requests::{PredictPayload, PredictRequest};
pub use responses::{ErrorResponse, HealthResponse, LabelsResponse, PredictResponse};
