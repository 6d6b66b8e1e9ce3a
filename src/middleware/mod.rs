// ABOUTME: HTTP middleware for the relay's router
// ABOUTME: CORS configuration applied to every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// CORS configuration
pub mod cors;

pub use cors::setup_cors;
