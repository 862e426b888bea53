// URL analysis endpoint
// Thin boundary over the analysis service: validate, evaluate, respond.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::warn;
use validator::Validate;

use crate::{
    app::AppState,
    models::analysis::{AnalyzeRequest, AnalyzeResponse},
    utils::service_error::ServiceError,
};

/// Analyze a URL and return a verdict with confidence and reasons
/// POST /api/v1/analyze
pub async fn analyze_url(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    // Validate request
    if let Err(e) = request.validate() {
        warn!("Rejected analyze request: {}", e);
        return ServiceError::from(e).into_response();
    }

    match state.analysis.analyze(&request.url).await {
        Ok(analysis) => {
            let response = AnalyzeResponse {
                status: analysis.verdict,
                confidence: analysis.confidence,
                reasons: analysis.reasons,
            };
            (StatusCode::OK, Json(response)).into_response()
        },
        Err(e) => {
            warn!("Analyze request failed: {}", e);
            ServiceError::from(e).into_response()
        },
    }
}
