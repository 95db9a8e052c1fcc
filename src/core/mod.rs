// Core pipeline exports
pub mod encoder;
pub mod predictor;
pub mod registry;

pub use encoder::{EncodeError, Encoder, MIN_YEAR_BUILT};
pub use predictor::{InferenceError, InferenceModel, ModelSchemaError, Predictor};
pub use registry::{CategoryMapping, MappingLoadError, MappingRegistry};
