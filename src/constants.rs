// ABOUTME: System-wide constants and default configuration values for the portfolio chat relay
// ABOUTME: Groups ports, routes, harvest defaults, completion defaults and user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Constants Module
//!
//! Application constants grouped by concern. Environment-driven values live in
//! [`crate::config`]; this module only holds the defaults they fall back to.

/// Service identity used in structured logs
pub mod service_names {
    /// Service name reported at startup
    pub const FOLIO_RELAY: &str = "folio-relay";
}

/// Port defaults
pub mod ports {
    /// Default `HTTP` port when `PORT` is unset
    pub const DEFAULT_HTTP_PORT: u16 = 3000;
}

/// `HTTP` route paths
pub mod routes {
    /// Chat endpoint of the long-running server
    pub const CHAT: &str = "/chat";
    /// Chat endpoint at the serverless function path
    pub const CHAT_FUNCTION: &str = "/.netlify/functions/chat";
    /// Harvested content endpoint
    pub const CONTENT: &str = "/content";
    /// Harvested content endpoint under the api prefix
    pub const API_CONTENT: &str = "/api/content";
    /// Liveness endpoint
    pub const HEALTH: &str = "/health";
}

/// Portfolio site pages and section names
pub mod site {
    /// Page carrying the biography sections
    pub const ABOUT_PAGE: &str = "/about";
    /// Page carrying the project cards
    pub const PROJECTS_PAGE: &str = "/projects";
    /// Page carrying the contact channels
    pub const CONTACT_PAGE: &str = "/contact";

    /// Section names probed on the about page, in record order
    pub const ABOUT_SECTIONS: [&str; 4] = ["about", "experience", "education", "skills"];

    /// Attribute keying project cards
    pub const PROJECT_ATTRIBUTE: &str = "data-project";
    /// Attribute keying contact channels
    pub const CONTACT_ATTRIBUTE: &str = "data-contact";

    /// Key used when a keyed page yields only unstructured text
    pub const PAGE_TEXT_KEY: &str = "page";

    /// Default local development server
    pub const DEFAULT_LOCAL_SITE_URL: &str = "http://localhost:5173";
    /// Selector of the SPA mount element
    pub const DEFAULT_ROOT_SELECTOR: &str = "#root";
}

/// Harvested content defaults
pub mod content {
    /// Placeholder for any section that could not be harvested
    pub const PLACEHOLDER: &str = "No information available";
}

/// Completion `API` defaults
pub mod completion {
    /// Environment variable holding the completion `API` credential
    pub const API_KEY_ENV: &str = "GROQ_API_KEY";
    /// OpenAI-compatible base `URL`
    pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
    /// Model used for every reply
    pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.7;
    /// Completion token cap
    pub const MAX_TOKENS: u32 = 1024;
}

/// Timeouts
pub mod timeouts {
    /// Page load budget per navigation in browser mode
    pub const PAGE_LOAD_SECS: u64 = 30;
    /// Budget for the root mount element to attach after load
    pub const ROOT_ELEMENT_SECS: u64 = 10;
    /// Outbound completion request budget
    pub const COMPLETION_REQUEST_SECS: u64 = 60;
    /// Plain `HTTP` page fetch budget in html mode
    pub const PAGE_FETCH_SECS: u64 = 30;
}

/// Harvested-content cache defaults
pub mod cache {
    /// Cache is disabled unless a positive TTL is configured
    pub const DEFAULT_TTL_SECS: u64 = 0;
    /// Distinct base URLs kept
    pub const MAX_ENTRIES: usize = 16;
}

/// Request limits
pub mod limits {
    /// Largest accepted chat request body
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
}

/// User-facing messages
pub mod messages {
    /// Generic chat failure shown to visitors
    pub const CHAT_FAILURE: &str = "Sorry, I encountered an error. Please try again.";
    /// Chat failure when the completion credential is absent
    pub const CHAT_NOT_CONFIGURED: &str =
        "Chat is unavailable: the completion API credential is not configured.";
    /// Persona refusal for out-of-scope questions
    pub const OUT_OF_SCOPE_REFUSAL: &str = "I don't have that information in my portfolio.";
}
