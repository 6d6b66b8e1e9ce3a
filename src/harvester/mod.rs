// ABOUTME: Content harvester that scrapes the portfolio site's own pages into PortfolioContent
// ABOUTME: Pluggable page backends (HTTP fetch, WebDriver) paired with DOM or regex extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Content Harvester
//!
//! A harvest opens one [`PageSession`] on a [`PageBackend`], loads the about,
//! projects and contact pages one after another, and extracts text from each.
//! A page that fails to load is logged and contributes placeholders; the other
//! pages are unaffected. A session that cannot be opened yields an
//! all-placeholder record. The session is closed on every path.
//!
//! ## Backends
//!
//! - [`http::HttpPageBackend`]: plain `GET`, paired with [`pattern`] extraction
//! - `browser::BrowserPageBackend` (feature `browser`): headless Chrome over
//!   WebDriver, paired with [`dom`] extraction

/// Headless browser page backend
#[cfg(feature = "browser")]
pub mod browser;
/// TTL cache decorator over a harvester
pub mod cache;
/// Selector-strategy extraction over a rendered DOM
pub mod dom;
/// Plain HTTP page backend
pub mod http;
/// Regular expression extraction over raw HTML
pub mod pattern;
/// Text normalization helpers
pub mod text;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::{HarvestMode, HarvesterConfig};
use crate::constants::{
    site::{ABOUT_PAGE, CONTACT_ATTRIBUTE, CONTACT_PAGE, PROJECTS_PAGE, PROJECT_ATTRIBUTE},
    timeouts,
};
use crate::content::{AboutPage, KeyedSections, PortfolioContent};
use crate::errors::{AppError, AppResult};

pub use cache::CachedHarvester;
pub use http::HttpPageBackend;

/// An open page-loading session, such as one browser instance
#[async_trait]
pub trait PageSession: Send {
    /// Load `url` and return its HTML
    async fn load(&mut self, url: &Url) -> AppResult<String>;

    /// Release the session; further loads are not expected
    async fn close(&mut self) -> AppResult<()>;
}

/// Source of page sessions
#[async_trait]
pub trait PageBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Open a fresh session for one harvest
    async fn open(&self) -> AppResult<Box<dyn PageSession>>;
}

/// Anything that can produce portfolio content for a site
#[async_trait]
pub trait ContentHarvester: Send + Sync {
    /// Harvest `base_url`; never fails, missing content becomes placeholders
    async fn harvest(&self, base_url: &Url) -> PortfolioContent;
}

/// How text is pulled out of a loaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Selector strategies over the parsed DOM
    Dom,
    /// Regular expressions over raw markup
    Pattern,
}

impl Extraction {
    fn about_page(self, html: &str) -> AboutPage {
        match self {
            Self::Dom => dom::about_page(html),
            Self::Pattern => pattern::about_page(html),
        }
    }

    fn keyed_sections(self, html: &str, attribute: &str) -> KeyedSections {
        match self {
            Self::Dom => dom::keyed_sections(html, attribute),
            Self::Pattern => pattern::keyed_sections(html, attribute),
        }
    }
}

/// Pages visited by a harvest, in visiting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    About,
    Projects,
    Contact,
}

impl Page {
    const fn path(self) -> &'static str {
        match self {
            Self::About => ABOUT_PAGE,
            Self::Projects => PROJECTS_PAGE,
            Self::Contact => CONTACT_PAGE,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Harvester over one page backend and one extraction mode
pub struct Harvester {
    backend: Arc<dyn PageBackend>,
    extraction: Extraction,
}

impl Harvester {
    /// Pair a backend with an extraction mode
    #[must_use]
    pub fn new(backend: Arc<dyn PageBackend>, extraction: Extraction) -> Self {
        Self {
            backend,
            extraction,
        }
    }

    /// Build the harvester for the configured mode
    ///
    /// # Errors
    ///
    /// Returns a configuration error if browser mode is requested in a build
    /// without the `browser` feature, or the HTTP client cannot be built
    pub fn from_config(config: &HarvesterConfig) -> AppResult<Self> {
        match config.mode {
            HarvestMode::Html => {
                let backend =
                    HttpPageBackend::new(std::time::Duration::from_secs(timeouts::PAGE_FETCH_SECS))?;
                Ok(Self::new(Arc::new(backend), Extraction::Pattern))
            }
            #[cfg(feature = "browser")]
            HarvestMode::Browser => {
                let backend = browser::BrowserPageBackend::new(
                    config.webdriver_url.clone(),
                    config.page_load_timeout(),
                    config.root_selector.clone(),
                );
                Ok(Self::new(Arc::new(backend), Extraction::Dom))
            }
            #[cfg(not(feature = "browser"))]
            HarvestMode::Browser => Err(AppError::config(
                "HARVEST_MODE=browser requires a build with the 'browser' feature",
            )),
        }
    }

    /// Extraction mode in use
    #[must_use]
    pub const fn extraction(&self) -> Extraction {
        self.extraction
    }

    async fn harvest_with(&self, session: &mut dyn PageSession, base_url: &Url) -> PortfolioContent {
        let about = Self::load(session, base_url, Page::About)
            .await
            .map(|html| self.extraction.about_page(&html));
        let projects = Self::load(session, base_url, Page::Projects)
            .await
            .map(|html| self.extraction.keyed_sections(&html, PROJECT_ATTRIBUTE));
        let contact = Self::load(session, base_url, Page::Contact)
            .await
            .map(|html| self.extraction.keyed_sections(&html, CONTACT_ATTRIBUTE));

        PortfolioContent::from_pages(about, projects, contact)
    }

    /// Load one page, logging and absorbing any failure
    async fn load(session: &mut dyn PageSession, base_url: &Url, page: Page) -> Option<String> {
        let result = match base_url.join(page.path()) {
            Ok(url) => session.load(&url).await,
            Err(e) => Err(AppError::from(e)),
        };
        match result {
            Ok(html) => {
                debug!(page = %page, bytes = html.len(), "Loaded portfolio page");
                Some(html)
            }
            Err(e) => {
                warn!(page = %page, error = %e, "Portfolio page unavailable; using placeholders");
                None
            }
        }
    }
}

#[async_trait]
impl ContentHarvester for Harvester {
    #[instrument(skip(self, base_url), fields(backend = self.backend.name(), extraction = ?self.extraction, base_url = %base_url))]
    async fn harvest(&self, base_url: &Url) -> PortfolioContent {
        let mut session = match self.backend.open().await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Could not open page session; serving placeholders");
                return PortfolioContent::placeholder();
            }
        };

        let content = self.harvest_with(session.as_mut(), base_url).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close page session");
        }

        info!(
            projects = content.projects.len(),
            contact = content.contact.len(),
            placeholder = content.is_placeholder(),
            "Harvested portfolio content"
        );
        content
    }
}
