use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use chrono::Datelike;
use energy_predict::config::Settings;
use energy_predict::core::{Encoder, InferenceModel, MappingRegistry, Predictor};
use energy_predict::routes;
use energy_predict::routes::predict::AppState;
use energy_predict::services::ForestModel;
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting energy prediction service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Load the label-encoding tables (startup-fatal on failure)
    let registry = Arc::new(MappingRegistry::load(&settings.mappings).unwrap_or_else(|e| {
        error!("Failed to load mapping tables: {}", e);
        panic!("Mapping load error: {}", e);
    }));

    info!(
        "Mapping tables loaded ({} building types, {} primary property types, {} largest use types)",
        registry.building_type.len(),
        registry.primary_property_type.len(),
        registry.largest_property_use_type.len()
    );

    // Load the model artifact
    let model = Arc::new(ForestModel::load(&settings.model.artifact).unwrap_or_else(|e| {
        error!("Failed to load model artifact: {}", e);
        panic!("Model load error: {}", e);
    }));

    info!(
        "Model '{}' v{} loaded ({} trees, reference year {})",
        model.metadata().name,
        model.metadata().version,
        model.tree_count(),
        model.metadata().reference_year
    );

    // Refuse to start if the artifact's column schema disagrees with ours
    let reference_year = model.metadata().reference_year;
    let predictor = Predictor::new(model).unwrap_or_else(|e| {
        error!("Model schema mismatch: {}", e);
        panic!("Model schema error: {}", e);
    });

    let current_year = chrono::Utc::now().year();
    let encoder = Encoder::new(reference_year, current_year);

    info!(
        "Encoder initialized (reference year {}, accepting YearBuilt up to {})",
        reference_year, current_year
    );

    // Build application state
    let app_state = AppState {
        registry,
        encoder,
        predictor,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
