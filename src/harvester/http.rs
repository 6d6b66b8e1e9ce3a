// ABOUTME: Page backend fetching raw HTML over plain HTTP GET
// ABOUTME: Used in html mode against prerendered or server-rendered portfolio pages
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{PageBackend, PageSession};
use crate::errors::{AppError, AppResult};

/// Backend issuing one `GET` per page; sessions share a pooled client
#[derive(Debug, Clone)]
pub struct HttpPageBackend {
    client: Client,
}

impl HttpPageBackend {
    /// Create a backend whose requests time out after `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("folio-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageBackend for HttpPageBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn open(&self) -> AppResult<Box<dyn PageSession>> {
        Ok(Box::new(HttpPageSession {
            client: self.client.clone(),
        }))
    }
}

struct HttpPageSession {
    client: Client,
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn load(&mut self, url: &Url) -> AppResult<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::page_unavailable(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::page_unavailable(
                url.as_str(),
                format!("HTTP {status}"),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::page_unavailable(url.as_str(), e.to_string()))?;
        debug!(url = %url, status = %status, "Fetched page");
        Ok(body)
    }

    async fn close(&mut self) -> AppResult<()> {
        Ok(())
    }
}
