// Library exports for the PhishGuard engine
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod features;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{config, AppConfig, CONFIG};
pub use features::{ContentFeatures, FeatureVector, LexicalFeatures, Signal, FEATURE_COUNT};
pub use models::analysis::{AnalyzeRequest, AnalyzeResponse, Verdict};
pub use services::{
    Analysis, AnalysisError, AnalysisService, Classifier, ClassifierError, FetchedPage,
    PageFetcher, Prediction,
};
pub use utils::url_normalizer::{normalize, NormalizeError, NormalizedUrl};
pub use utils::ServiceError;

// Re-export handler route builders
pub use handlers::analyze_routes;

// Re-export individual handlers for direct use
pub use handlers::analyze::analyze_url;

use axum::Router;

/// Build the full API router. The caller nests this under its base path and
/// attaches state.
pub fn api_routes() -> Router<AppState> {
    handlers::analyze_routes()
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let timestamp = chrono::Utc::now().to_rfc3339();

    // The classifier either loaded at startup or the process never came up,
    // so a running service is healthy; still report what it is serving with.
    let response = serde_json::json!({
        "status": "healthy",
        "service": "phishguard-core",
        "timestamp": timestamp,
        "components": {
            "classifier": {
                "status": "loaded",
                "trees": state.classifier.tree_count(),
                "classes": state.classifier.class_count(),
                "probability": state.classifier.supports_probability()
            }
        }
    });

    (StatusCode::OK, Json(response))
}
