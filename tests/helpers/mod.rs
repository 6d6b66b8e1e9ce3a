// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the in-process HTTP driver, fakes and router construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod fakes;

use std::sync::Arc;

use axum::Router;
use folio_relay::config::HttpConfig;
use folio_relay::harvester::ContentHarvester;
use folio_relay::llm::LlmProvider;
use folio_relay::relay::ChatRelay;
use folio_relay::server::{build_router, ServerResources};
use url::Url;

/// Base URL handed to harvesters in tests
pub fn test_site_url() -> Url {
    Url::parse("http://localhost:5173").unwrap()
}

/// Permissive HTTP settings
pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
        cors_allowed_origins: "*".to_owned(),
    }
}

/// Full router over the given harvester and provider
pub fn relay_router(
    harvester: Arc<dyn ContentHarvester>,
    provider: Option<Arc<dyn LlmProvider>>,
    expose_error_details: bool,
) -> Router {
    let relay = ChatRelay::new(harvester, provider, test_site_url());
    let resources = Arc::new(ServerResources::new(relay, expose_error_details));
    build_router(resources, &test_http_config())
}
