// ABOUTME: Configuration module for the relay's environment-driven settings
// ABOUTME: Re-exports the server, HTTP, completion and harvester configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration module
//!
//! All configuration comes from environment variables; there is no config file.
//!
//! - **Environment**: deployment mode, which controls error detail exposure
//! - **HTTP**: bind address and CORS origins
//! - **LLM**: completion API credential, endpoint and sampling settings
//! - **Harvester**: page backend, self-scrape base URL and cache TTL

/// Environment and server configuration
pub mod environment;

pub use environment::{
    Environment, HarvestMode, HarvesterConfig, HttpConfig, LlmConfig, ServerConfig, SiteTarget,
};
