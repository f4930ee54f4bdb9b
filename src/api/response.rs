//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { field, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Invalid configuration",
                    format!("{}: {}", field, message),
                ),
            },
            EngineError::InvalidPeriod { year, month } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_PERIOD",
                    format!("Invalid payroll period {}-{}", year, month),
                    "month must be between 1 and 12",
                ),
            ),
            EngineError::InvalidShift { shift_id, message } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_SHIFT",
                    format!("Invalid shift '{}': {}", shift_id, message),
                    "The shift data contains invalid information",
                ),
            ),
        }
    }
}
