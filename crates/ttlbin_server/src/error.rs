//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use ttlbin_core::AppError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// JSON API error: renders `{"error": "..."}` with the mapped status.
///
/// Storage faults are logged here and replaced by a generic message so no
/// backend detail reaches the client.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl HttpError {
    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::MalformedRequestBody(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            AppError::NotFound => AppError::NotFound.to_string(),
            AppError::InvalidInput(message) | AppError::MalformedRequestBody(message) => {
                tracing::debug!("Rejected request: {}", message);
                message
            }
            other => {
                tracing::error!("Request failed: {}", other);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
