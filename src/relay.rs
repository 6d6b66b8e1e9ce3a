// ABOUTME: Chat relay that harvests portfolio content, assembles the prompt and calls the completion API
// ABOUTME: One stateless request-response turn per call; no conversation history is kept
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chat Relay
//!
//! [`ChatRelay::reply`] is the single operation behind every chat endpoint:
//!
//! 1. Refuse immediately when no completion provider is configured
//! 2. Harvest fresh portfolio content
//! 3. Assemble `[system, user]` with [`assemble_prompt`]
//! 4. Call the provider and return the first choice verbatim

use std::sync::Arc;

use tracing::{debug, info, instrument};
use url::Url;

use crate::constants::completion::{API_KEY_ENV, MAX_TOKENS, TEMPERATURE};
use crate::content::PortfolioContent;
use crate::errors::{AppError, AppResult};
use crate::harvester::ContentHarvester;
use crate::llm::{assemble_prompt, ChatRequest, LlmProvider};

/// Relay between visitors and the completion provider
pub struct ChatRelay {
    harvester: Arc<dyn ContentHarvester>,
    provider: Option<Arc<dyn LlmProvider>>,
    base_url: Url,
    temperature: f32,
    max_tokens: u32,
}

impl ChatRelay {
    /// Create a relay scraping `base_url`; `provider` is `None` when no credential is configured
    #[must_use]
    pub fn new(
        harvester: Arc<dyn ContentHarvester>,
        provider: Option<Arc<dyn LlmProvider>>,
        base_url: Url,
    ) -> Self {
        Self {
            harvester,
            provider,
            base_url,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Override the sampling settings
    #[must_use]
    pub const fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Harvest the site once
    pub async fn content(&self) -> PortfolioContent {
        self.harvester.harvest(&self.base_url).await
    }

    /// Answer one visitor message
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no provider is configured, without
    /// harvesting, or the provider's error when the completion call fails
    #[instrument(skip_all, fields(message_chars = user_message.chars().count()))]
    pub async fn reply(&self, user_message: &str) -> AppResult<String> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            AppError::config_missing(API_KEY_ENV)
                .with_details(format!("The chat relay was started without {API_KEY_ENV}"))
        })?;

        let content = self.content().await;
        let request = ChatRequest::new(assemble_prompt(&content, user_message))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        debug!(provider = provider.name(), model = provider.default_model(), "Relaying chat message");
        let response = provider.complete(&request).await?;

        let usage = response.usage.as_ref();
        info!(
            model = %response.model,
            reply_chars = response.content.chars().count(),
            finish_reason = ?response.finish_reason,
            prompt_tokens = usage.map(|u| u.prompt_tokens),
            completion_tokens = usage.map(|u| u.completion_tokens),
            total_tokens = usage.map(|u| u.total_tokens),
            "Chat reply relayed"
        );
        Ok(response.content)
    }
}
