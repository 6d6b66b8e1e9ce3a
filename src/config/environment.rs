// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed HTTP, completion and harvester configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management
//!
//! [`ServerConfig::from_env`] reads the process environment.
//! [`ServerConfig::from_lookup`] takes any key lookup so tests can build a
//! configuration without touching global state.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::constants::{cache, completion, ports, site, timeouts};
use crate::errors::{AppError, AppResult};

/// Environment type controlling error detail exposure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; error bodies carry details
    #[default]
    Development,
    /// Deployed; error details are suppressed
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// How portfolio pages are obtained and read
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HarvestMode {
    /// Render pages in a headless browser and probe the DOM with selector strategies
    Browser,
    /// Fetch raw HTML and scan it with regular expressions
    #[default]
    Html,
}

impl FromStr for HarvestMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "browser" | "webdriver" | "headless" => Ok(Self::Browser),
            "html" | "regex" | "text" => Ok(Self::Html),
            other => Err(AppError::config(format!(
                "Invalid HARVEST_MODE '{other}' (expected 'browser' or 'html')"
            ))),
        }
    }
}

impl fmt::Display for HarvestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser => write!(f, "browser"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Which copy of the site the harvester scrapes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SiteTarget {
    /// Local development server
    Local,
    /// Deployed origin
    Deployed,
}

impl SiteTarget {
    /// Parse from string; anything unrecognised follows the environment default
    #[must_use]
    pub fn from_str_or(s: Option<&str>, environment: Environment) -> Self {
        match s.map(str::to_lowercase).as_deref() {
            Some("local" | "dev" | "development") => Self::Local,
            Some("deployed" | "remote" | "production") => Self::Deployed,
            _ if environment.is_production() => Self::Deployed,
            _ => Self::Local,
        }
    }
}

/// `HTTP` listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Comma-separated allowed origins, `*` for any
    pub cors_allowed_origins: String,
}

/// Completion `API` configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Credential; `None` leaves the chat endpoint answering 500
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl LlmConfig {
    /// Outbound request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Content harvester configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvesterConfig {
    /// Page backend and extraction mode
    pub mode: HarvestMode,
    /// Local dev server or deployed origin
    pub site_target: SiteTarget,
    /// Local development server URL
    pub local_site_url: String,
    /// Deployed origin URL
    pub deployed_site_url: Option<String>,
    /// Explicit base URL; wins over the target selection
    pub base_url_override: Option<String>,
    /// WebDriver endpoint used in browser mode
    pub webdriver_url: String,
    /// Per-navigation page load budget in seconds
    pub page_load_timeout_secs: u64,
    /// Mount element awaited after each navigation
    pub root_selector: String,
    /// Harvested content cache TTL in seconds; zero disables caching
    pub cache_ttl_secs: u64,
}

impl HarvesterConfig {
    /// Resolve the base URL the harvester scrapes
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the deployed target has no URL or the
    /// chosen URL does not parse
    pub fn site_base_url(&self) -> AppResult<Url> {
        let raw = match (&self.base_url_override, self.site_target) {
            (Some(explicit), _) => explicit.as_str(),
            (None, SiteTarget::Local) => self.local_site_url.as_str(),
            (None, SiteTarget::Deployed) => self.deployed_site_url.as_deref().ok_or_else(|| {
                AppError::config_missing("DEPLOYED_SITE_URL (or URL)")
                    .with_details("SITE_TARGET is 'deployed' but no deployed origin is configured")
            })?,
        };
        Ok(Url::parse(raw)?)
    }

    /// Per-navigation page load budget
    #[must_use]
    pub const fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    /// Cache TTL, `None` when caching is disabled
    #[must_use]
    pub const fn cache_ttl(&self) -> Option<Duration> {
        if self.cache_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cache_ttl_secs))
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// `HTTP` listener
    pub http: HttpConfig,
    /// Completion `API`
    pub llm: LlmConfig,
    /// Content harvester
    pub harvester: HarvesterConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unparsable values or an unusable site URL
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unparsable values or an unusable site URL
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let environment = Environment::from_str_or_default(
            &vars
                .get("ENVIRONMENT")
                .or_else(|| vars.get("NODE_ENV"))
                .unwrap_or_default(),
        );

        let http = HttpConfig {
            host: vars.get_or("HOST", "0.0.0.0"),
            port: vars.parse_or("PORT", ports::DEFAULT_HTTP_PORT)?,
            cors_allowed_origins: vars.get_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        let llm = LlmConfig {
            api_key: vars
                .get(completion::API_KEY_ENV)
                .filter(|key| !key.trim().is_empty()),
            base_url: vars.get_or("GROQ_API_BASE_URL", completion::DEFAULT_BASE_URL),
            model: vars.get_or("CHAT_MODEL", completion::DEFAULT_MODEL),
            temperature: completion::TEMPERATURE,
            max_tokens: completion::MAX_TOKENS,
            request_timeout_secs: vars.parse_or(
                "COMPLETION_TIMEOUT_SECS",
                timeouts::COMPLETION_REQUEST_SECS,
            )?,
        };

        let mode = match vars.get("HARVEST_MODE") {
            Some(raw) => raw.parse()?,
            None => HarvestMode::default(),
        };

        let harvester = HarvesterConfig {
            mode,
            site_target: SiteTarget::from_str_or(vars.get("SITE_TARGET").as_deref(), environment),
            local_site_url: vars.get_or("LOCAL_SITE_URL", site::DEFAULT_LOCAL_SITE_URL),
            deployed_site_url: vars.get("DEPLOYED_SITE_URL").or_else(|| vars.get("URL")),
            base_url_override: vars.get("SITE_BASE_URL"),
            webdriver_url: vars.get_or("WEBDRIVER_URL", "http://localhost:9515"),
            page_load_timeout_secs: vars.parse_or("PAGE_LOAD_TIMEOUT_SECS", timeouts::PAGE_LOAD_SECS)?,
            root_selector: vars.get_or("ROOT_SELECTOR", site::DEFAULT_ROOT_SELECTOR),
            cache_ttl_secs: vars.parse_or("CONTENT_CACHE_TTL_SECS", cache::DEFAULT_TTL_SECS)?,
        };

        harvester.site_base_url()?;

        Ok(Self {
            environment,
            http,
            llm,
            harvester,
        })
    }

    /// Whether error responses may carry diagnostic detail
    #[must_use]
    pub const fn expose_error_details(&self) -> bool {
        !self.environment.is_production()
    }

    /// One-line-per-setting summary for startup logs; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Folio Relay Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}:{}\n\
             - CORS Origins: {}\n\
             - Completion API: {} (model {})\n\
             - Completion Credential: {}\n\
             - Harvest Mode: {}\n\
             - Site Base URL: {}\n\
             - Content Cache: {}",
            self.environment,
            self.http.host,
            self.http.port,
            self.http.cors_allowed_origins,
            self.llm.base_url,
            self.llm.model,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.harvester.mode,
            self.harvester
                .site_base_url()
                .map_or_else(|e| format!("<{e}>"), |url| url.to_string()),
            self.harvester
                .cache_ttl()
                .map_or_else(|| "Disabled".to_owned(), |ttl| format!("{}s TTL", ttl.as_secs())),
        )
    }
}

/// Typed access over a key lookup
struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_owned())
    }

    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> AppResult<T> {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|_| AppError::config(format!("Invalid {key} value: '{raw}'")))
        })
    }
}
