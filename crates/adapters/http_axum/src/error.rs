//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use marshal_domain::error::{MarshalError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`MarshalError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(MarshalError);

impl From<MarshalError> for ApiError {
    fn from(err: MarshalError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            MarshalError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            MarshalError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            MarshalError::Command(err) => {
                tracing::warn!(error = %err, "command rejected by the game");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            MarshalError::Unavailable(err) => {
                tracing::error!(error = %err, "service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
