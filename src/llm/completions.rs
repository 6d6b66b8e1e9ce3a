// ABOUTME: OpenAI-compatible chat completions provider, Groq by default
// ABOUTME: Sends one non-streaming completion per chat request with a bounded HTTP timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Completions Provider
//!
//! Implementation of [`LlmProvider`] for any `OpenAI`-compatible
//! `chat/completions` endpoint.
//!
//! ## Configuration
//!
//! - `GROQ_API_KEY`: bearer credential, from <https://console.groq.com/keys>
//! - `GROQ_API_BASE_URL`: endpoint root (default `https://api.groq.com/openai/v1`)
//! - `CHAT_MODEL`: model id (default `llama-3.3-70b-versatile`)
//! - `COMPLETION_TIMEOUT_SECS`: whole-request timeout (default 60)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use crate::constants::completion::API_KEY_ENV;
use crate::errors::{AppError, AppResult};

/// Service name used in error messages
const SERVICE: &str = "Groq";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for CompletionMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Chat completions client, built once at startup and shared by all requests
pub struct CompletionsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CompletionsProvider {
    /// Create a provider for `base_url` authenticating with `api_key`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            model: model.into(),
        })
    }

    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no credential is configured
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::config_missing(API_KEY_ENV)
                .with_details("Get an API key from https://console.groq.com/keys")
        })?;
        Self::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.request_timeout(),
        )
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Map a non-success response to an error
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let snippet = body.chars().take(200).collect::<String>();
        let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) else {
            return AppError::external_service(SERVICE, format!("API error ({status})"))
                .with_details(format!("{status}: {snippet}"));
        };
        let message = error_response.error.message;
        let details = format!("{status}: {message}");

        let error = match status.as_u16() {
            401 | 403 => {
                AppError::external_auth(SERVICE, format!("Authentication failed: {message}"))
            }
            429 => {
                AppError::external_rate_limited(SERVICE, format!("Rate limit exceeded: {message}"))
            }
            400 => AppError::external_service(SERVICE, format!("Request rejected: {message}")),
            _ => AppError::external_service(
                SERVICE,
                format!(
                    "{} - {message}",
                    error_response.error.error_type.as_deref().unwrap_or("unknown")
                ),
            ),
        };
        error.with_details(details)
    }
}

#[async_trait]
impl LlmProvider for CompletionsProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = self.model.as_str();

        debug!(messages = request.messages.len(), "Sending chat completion request");

        let body = CompletionRequest {
            model,
            messages: request.messages.iter().map(CompletionMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to completion API: {}", e);
                AppError::external_service(SERVICE, format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read completion API response: {}", e);
            AppError::external_service(SERVICE, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse completion API response: {}", e);
            AppError::external_service(SERVICE, format!("Failed to parse response: {e}"))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service(SERVICE, "API returned no choices"))?;

        let content = choice.message.content.ok_or_else(|| {
            AppError::external_service(SERVICE, "First choice carried no message content")
        })?;

        debug!(
            "Received completion: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}
