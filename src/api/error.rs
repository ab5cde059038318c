use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::engine::SimulationError;

/// Errors a handler can return. Data quality problems never end up here:
/// they are replaced with defaults before reaching the engine.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported technology: {0}")]
    UnsupportedTechnology(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::UnsupportedTechnology(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::UnsupportedTechnology(_) => "UnsupportedTechnology",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::UnsupportedTechnology(_) => {
                Some("supported technologies: solar, wind, solar_thermal".to_string())
            }
            ApiError::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Client error");

        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            details: self.details(),
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}

impl From<SimulationError> for ApiError {
    fn from(error: SimulationError) -> Self {
        match error {
            SimulationError::UnsupportedTechnology(key) => ApiError::UnsupportedTechnology(key),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::UnsupportedTechnology("bogus".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("bad json".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_simulation_error_conversion() {
        let err: ApiError = SimulationError::UnsupportedTechnology("bogus".into()).into();
        assert_eq!(err.error_type(), "UnsupportedTechnology");
        assert_eq!(err.to_string(), "Unsupported technology: bogus");
        assert!(err.details().is_some());
    }
}
