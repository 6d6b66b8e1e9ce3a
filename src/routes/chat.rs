// ABOUTME: Chat route handlers for the portfolio widget
// ABOUTME: Thin adapters from POST bodies to the chat relay, for the server path and the function path
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat routes
//!
//! `POST /chat` and `POST /.netlify/functions/chat` accept `{"message": "..."}`
//! and answer `{"response": "..."}`. Failures answer
//! `{"error": "...", "details"?: "..."}`: 400 for a malformed body, 413 for
//! one over the size limit, 500 for everything else. `details` is only present
//! outside production.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::constants::{
    limits::MAX_REQUEST_BODY_BYTES,
    messages::{CHAT_FAILURE, CHAT_NOT_CONFIGURED},
    routes::{CHAT, CHAT_FUNCTION},
};
use crate::errors::{AppError, AppResult, ErrorCode, ErrorResponse};
use crate::server::ServerResources;

/// Successful chat reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// Completion text, unmodified
    pub response: String,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(CHAT, post(Self::chat).options(Self::preflight))
            .route(CHAT_FUNCTION, post(Self::chat).options(Self::preflight))
            .with_state(resources)
    }

    /// Plain `OPTIONS` without CORS preflight headers still gets 200 and no body
    async fn preflight() -> StatusCode {
        StatusCode::OK
    }

    async fn chat(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Bytes, BytesRejection>,
    ) -> Response {
        let expose = resources.expose_error_details;

        let message = match body.map_err(body_error).and_then(|body| parse_message(&body)) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Rejected chat request");
                let status =
                    StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
                return (status, Json(ErrorResponse::from_error(&e, expose))).into_response();
            }
        };

        match resources.relay.reply(&message).await {
            Ok(response) => Json(ChatReply { response }).into_response(),
            Err(e) => {
                error!(error = %e, code = ?e.code, "Chat request failed");
                let user_message = match e.code {
                    ErrorCode::ConfigMissing | ErrorCode::ConfigError => CHAT_NOT_CONFIGURED,
                    _ => CHAT_FAILURE,
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::from_error(&e, expose).with_message(user_message)),
                )
                    .into_response()
            }
        }
    }
}

/// Map a body that could not be buffered, usually one over the size limit
fn body_error(rejection: BytesRejection) -> AppError {
    let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(MAX_REQUEST_BODY_BYTES)
    } else {
        AppError::invalid_input("Request body could not be read")
    };
    error.with_details(rejection.body_text())
}

/// Pull a non-blank `message` string out of a JSON body
fn parse_message(body: &[u8]) -> AppResult<String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        AppError::invalid_input("Request body must be a JSON object").with_details(e.to_string())
    })?;

    match value.get("message") {
        Some(Value::String(message)) if !message.trim().is_empty() => Ok(message.clone()),
        Some(Value::String(_)) => Err(AppError::invalid_input("Field 'message' must not be empty")),
        Some(_) => Err(AppError::invalid_input("Field 'message' must be a string")),
        None => Err(AppError::missing_field("message")),
    }
}
