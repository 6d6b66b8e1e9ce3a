// ABOUTME: Unified error type, error codes and HTTP error bodies for the relay
// ABOUTME: Maps every failure to a status code and the `{"error", "details"}` wire shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Every fallible operation in the crate returns [`AppResult`]. Errors carry an
//! [`ErrorCode`] that decides the HTTP status, a message, and optional detail
//! text that handlers expose only outside production.

use std::error::Error as StdError;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request body or field is malformed
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Request lacks a required field
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Request body exceeds the size limit
    #[serde(rename = "PAYLOAD_TOO_LARGE")]
    PayloadTooLarge = 3002,

    // Harvesting (4000-4999)
    /// A portfolio page failed to load
    #[serde(rename = "PAGE_UNAVAILABLE")]
    PageUnavailable = 4000,
    /// The headless browser session could not be used
    #[serde(rename = "BROWSER_UNAVAILABLE")]
    BrowserUnavailable = 4001,

    // External Services (5000-5999)
    /// Completion API failed or answered unexpectedly
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Completion API rejected the credential
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Completion API rate limited the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// Configuration value is invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is absent
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// JSON encoding or decoding failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    ///
    /// Everything that is not the caller's fault is a 500.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => 400,
            Self::PayloadTooLarge => 413,
            Self::PageUnavailable
            | Self::BrowserUnavailable
            | Self::ExternalServiceError
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited
            | Self::ConfigError
            | Self::ConfigMissing
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Get a short description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::PayloadTooLarge => "The request body is too large",
            Self::PageUnavailable => "A portfolio page could not be loaded",
            Self::BrowserUnavailable => "The headless browser could not be started",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Diagnostic detail, shown to clients only outside production
    pub details: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach diagnostic detail text
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required request field missing
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field '{field}'"),
        )
    }

    /// Request body over the size limit
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            ErrorCode::PayloadTooLarge,
            format!("Request body exceeds {limit} bytes"),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration absent
    pub fn config_missing(key: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("Missing {key} environment variable"),
        )
    }

    /// A single page failed to load or render
    pub fn page_unavailable(url: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PageUnavailable,
            format!("{url}: {}", message.into()),
        )
    }

    /// The browser session could not be opened
    pub fn browser_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BrowserUnavailable, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service rejected our credential
    pub fn external_auth(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalAuthFailed,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service rate limited us
    pub fn external_rate_limited(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalRateLimited,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::config(format!("Invalid URL: {error}")).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// User-facing message
    pub error: String,
    /// Diagnostic detail (development builds only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Build a body for `error`, including diagnostics only when `expose_details` is set
    #[must_use]
    pub fn from_error(error: &AppError, expose_details: bool) -> Self {
        Self {
            error: error.message.clone(),
            details: expose_details.then(|| {
                error
                    .details
                    .clone()
                    .unwrap_or_else(|| error.to_string())
            }),
        }
    }

    /// Replace the user-facing message, keeping any diagnostics
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error = message.into();
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from_error(&self, false))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::MissingRequiredField.http_status(), 400);
        assert_eq!(ErrorCode::PayloadTooLarge.http_status(), 413);
        assert_eq!(ErrorCode::ConfigMissing.http_status(), 500);
        assert_eq!(ErrorCode::ExternalRateLimited.http_status(), 500);
    }

    #[test]
    fn test_error_response_hides_details_unless_exposed() {
        let error = AppError::external_service("Groq", "boom").with_details("status 503");

        let hidden = ErrorResponse::from_error(&error, false);
        assert_eq!(hidden.details, None);
        let json = serde_json::to_value(&hidden).unwrap();
        assert!(json.get("details").is_none());

        let shown = ErrorResponse::from_error(&error, true);
        assert_eq!(shown.details.as_deref(), Some("status 503"));
    }

    #[test]
    fn test_error_response_falls_back_to_display_for_details() {
        let error = AppError::internal("exploded");
        let body = ErrorResponse::from_error(&error, true);
        assert_eq!(
            body.details.as_deref(),
            Some("An internal server error occurred: exploded")
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::missing_field("message").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
