// ABOUTME: Route exposing the freshly harvested portfolio content as JSON
// ABOUTME: Serves both the bare path and the api-prefixed path
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content routes
//!
//! Useful for checking what the persona will be told before chatting with it.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::constants::routes::{API_CONTENT, CONTENT};
use crate::content::PortfolioContent;
use crate::server::ServerResources;

/// Content routes implementation
pub struct ContentRoutes;

impl ContentRoutes {
    /// Create the content routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(CONTENT, get(Self::content))
            .route(API_CONTENT, get(Self::content))
            .with_state(resources)
    }

    async fn content(State(resources): State<Arc<ServerResources>>) -> Json<PortfolioContent> {
        Json(resources.relay.content().await)
    }
}
