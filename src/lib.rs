//! Energy Predict - building energy consumption prediction service
//!
//! This library exposes the input validation and feature-encoding pipeline
//! that turns raw building characteristics into the fixed-order feature
//! vector a pre-trained regression model expects, plus the thin invoker
//! that runs the model and returns its scalar estimate.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{EncodeError, Encoder, MappingRegistry, Predictor};
pub use crate::models::{FeatureVector, PredictRequest, PredictResponse, FEATURE_ORDER};
pub use crate::services::ForestModel;
