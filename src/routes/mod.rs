// ABOUTME: Route module organization for the relay's HTTP endpoints
// ABOUTME: Chat, harvested content and health routes, each a thin adapter over shared resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to [`crate::relay::ChatRelay`].

/// Chat routes for the portfolio widget
pub mod chat;
/// Harvested content routes
pub mod content;
/// Health check route
pub mod health;

/// Chat route handlers
pub use chat::{ChatReply, ChatRoutes};
/// Content route handlers
pub use content::ContentRoutes;
/// Health route handlers
pub use health::HealthRoutes;
