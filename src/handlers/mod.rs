// URL analysis handlers

pub mod analyze;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze::analyze_url))
        .route("/health", get(crate::health_check))
}
