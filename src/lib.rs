// ABOUTME: Main library entry point for the portfolio chat relay
// ABOUTME: Harvests a portfolio site's own pages and relays visitor chat to a hosted LLM
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Folio Relay
//!
//! Backend for a personal portfolio website's chat widget. Each chat turn
//! scrapes the site's own about, projects and contact pages, folds the text
//! into a first-person persona prompt, and forwards the visitor's message to
//! an OpenAI-compatible completion API.
//!
//! ## Architecture
//!
//! - **Harvester**: page backends (plain HTTP or headless browser) paired with
//!   regex or DOM extraction, producing a complete [`content::PortfolioContent`]
//! - **LLM**: provider trait, completions client and persona prompt assembly
//! - **Relay**: one stateless request-response turn
//! - **Routes**: thin axum adapters for chat, content and health
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use folio_relay::config::ServerConfig;
//! use folio_relay::errors::AppResult;
//! use folio_relay::server::{build_router, serve, ServerResources};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(&config)?);
//!     let router = build_router(resources, &config.http);
//!     serve(router, &config.http).await
//! }
//! ```

/// Configuration management
pub mod config;

/// Application constants and default values
pub mod constants;

/// Harvested portfolio content model
pub mod content;

/// Unified error handling
pub mod errors;

/// Portfolio page harvesting
pub mod harvester;

/// LLM provider abstraction and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Chat relay
pub mod relay;

/// HTTP route handlers
pub mod routes;

/// Server bootstrap
pub mod server;
