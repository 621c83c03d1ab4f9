use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::errors::InputError;

/// Boundary error taxonomy: `InputError` is the only domain error that
/// crosses into the HTTP layer as a 4xx — every other failure mode
/// (`UpstreamError`, `InsufficientDataError`, `EvaluatorError`) is recovered
/// inside the pipeline before it gets here. `Fatal` covers everything else.
pub enum ApiError {
    Input(InputError),
    Fatal(anyhow::Error),
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::Input(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Fatal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Input(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response(),
            ApiError::Fatal(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response(),
        }
    }
}
