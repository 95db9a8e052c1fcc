use serde::{Deserialize, Serialize};

/// Response for the predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted annual site energy use, in the unit the model was trained on.
    pub prediction: f64,
    #[serde(rename = "modelVersion")]
    pub model_version: String,
}

/// Categorical domains for the form collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsResponse {
    #[serde(rename = "BuildingType")]
    pub building_type: Vec<String>,
    #[serde(rename = "PrimaryPropertyType")]
    pub primary_property_type: Vec<String>,
    #[serde(rename = "LargestPropertyUseType")]
    pub largest_property_use_type: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "modelName")]
    pub model_name: String,
    #[serde(rename = "modelVersion")]
    pub model_version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Offending request field, when the failure is a validation error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
