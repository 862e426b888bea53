// Service error type for the analysis API
// Failures surfaced to the caller keep the analysis response shape: the
// status field carries "ERROR" in-band instead of a bare error object.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::analysis::AnalysisError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, reason) = match self {
            ServiceError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "status": "ERROR",
            "confidence": 0.0,
            "reasons": [reason]
        }));

        (status, body).into_response()
    }
}

// Conversion from engine error types
impl From<AnalysisError> for ServiceError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(error: validator::ValidationErrors) -> Self {
        ServiceError::InvalidInput(error.to_string())
    }
}
