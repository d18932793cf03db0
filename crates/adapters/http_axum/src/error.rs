//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use plughub_domain::error::PlugError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PlugError`] to an HTTP response with appropriate status code.
pub struct ApiError(PlugError);

impl From<PlugError> for ApiError {
    fn from(err: PlugError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PlugError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            PlugError::AmbiguousMatch(err) => {
                tracing::error!(error = %err, "ambiguous smart plug address");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            err => {
                tracing::error!(
                    error = %err,
                    source = ?std::error::Error::source(err),
                    "smart plug operation failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
