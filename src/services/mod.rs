// Service exports
pub mod model;

pub use model::{ForestModel, ModelError};
