// ABOUTME: Health check route handler for liveness probes
// ABOUTME: Answers without touching the harvester or the completion API
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health check route

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::constants::routes::HEALTH;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> Router {
        Router::new().route(HEALTH, get(Self::health))
    }

    async fn health() -> Json<Value> {
        Json(json!({ "status": "ok" }))
    }
}
