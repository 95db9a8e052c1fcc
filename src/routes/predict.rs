use crate::core::{EncodeError, Encoder, MappingRegistry, Predictor};
use crate::models::{
    ErrorResponse, HealthResponse, LabelsResponse, PredictPayload, PredictResponse,
};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MappingRegistry>,
    pub encoder: Encoder,
    pub predictor: Predictor,
}

/// Configure all prediction-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/labels", web::get().to(list_labels))
        .route("/predict", web::post().to(predict));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let metadata = state.predictor.metadata();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_name: metadata.name.clone(),
        model_version: metadata.version.clone(),
        timestamp: chrono::Utc::now(),
    })
}

/// Categorical domains endpoint
///
/// GET /api/v1/labels
///
/// Returns the valid labels for each categorical field, in stable order,
/// so the form collaborator can populate its dropdowns.
async fn list_labels(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(LabelsResponse {
        building_type: state.registry.building_type.labels().to_vec(),
        primary_property_type: state.registry.primary_property_type.labels().to_vec(),
        largest_property_use_type: state.registry.largest_property_use_type.labels().to_vec(),
    })
}

/// Prediction endpoint
///
/// POST /api/v1/predict
///
/// Request body (the `{"input_": {...}}` envelope is also accepted):
/// ```json
/// {
///   "BuildingType": "Hotel",
///   "PrimaryPropertyType": "Hotel",
///   "LargestPropertyUseType": "Hotel",
///   "NumberofBuildings": 1,
///   "NumberofFloors": 2,
///   "PropertyGFATotal": 1000.0,
///   "PropertyGFABuilding(s)": 900.0,
///   "NumPropertyUseTypes": 1,
///   "YearBuilt": 2000,
///   "UsesSteam": false,
///   "UsesNaturalGas": true,
///   "HasParking": false
/// }
/// ```
async fn predict(
    state: web::Data<AppState>,
    payload: web::Json<PredictPayload>,
) -> impl Responder {
    let request = payload.into_inner().into_inner();

    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for predict request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
            field: None,
        });
    }

    let vector = match state.encoder.encode(&request, &state.registry) {
        Ok(vector) => vector,
        Err(err) => {
            tracing::info!("Encoding rejected predict request: {}", err);
            let error = match err {
                EncodeError::UnknownCategory { .. } => "unknown_category",
                EncodeError::InvalidField { .. } => "invalid_field",
            };
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: error.to_string(),
                message: err.to_string(),
                status_code: 400,
                field: Some(err.field().to_string()),
            });
        }
    };

    // Accepted but suspicious: the building postdates the model's training
    // baseline, so the derived age is negative.
    if vector.building_age < 0 {
        tracing::warn!(
            "Implausible input: YearBuilt {} is ahead of reference year {} (age {})",
            request.year_built,
            state.encoder.reference_year(),
            vector.building_age
        );
    }

    match state.predictor.predict(&vector) {
        Ok(prediction) => {
            tracing::info!(
                "Predicted {:.2} for {} / {} ({} m2)",
                prediction,
                request.building_type,
                request.primary_property_type,
                request.property_gfa_total
            );
            HttpResponse::Ok().json(PredictResponse {
                prediction,
                model_version: state.predictor.metadata().version.clone(),
            })
        }
        Err(err) => {
            tracing::error!("Inference failed: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "inference_failed".to_string(),
                message: err.to_string(),
                status_code: 500,
                field: None,
            })
        }
    }
}
