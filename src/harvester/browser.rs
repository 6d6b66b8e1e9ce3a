// ABOUTME: Page backend driving headless Chrome over WebDriver via thirtyfour
// ABOUTME: Waits for the SPA mount element before returning the rendered page source
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Browser Backend
//!
//! Requires a running chromedriver (`chromedriver --port=9515`). Each session is
//! one browser instance. [`PageSession::close`] quits it explicitly; a session
//! dropped mid-harvest (a cancelled request) is quit by thirtyfour's own drop.

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use tracing::{debug, instrument};
use url::Url;

use super::{PageBackend, PageSession};
use crate::constants::timeouts::ROOT_ELEMENT_SECS;
use crate::errors::{AppError, AppResult};

/// Poll interval while waiting for the mount element
const ROOT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chrome flags for an unattended headless session
const CHROME_ARGS: &[&str] = &[
    "--headless=new",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-extensions",
    "--no-first-run",
    "--window-size=1280,1024",
];

/// Backend opening one headless Chrome per harvest
#[derive(Debug, Clone)]
pub struct BrowserPageBackend {
    webdriver_url: String,
    page_load_timeout: Duration,
    root_selector: String,
}

impl BrowserPageBackend {
    /// Create a backend talking to the WebDriver server at `webdriver_url`
    #[must_use]
    pub const fn new(webdriver_url: String, page_load_timeout: Duration, root_selector: String) -> Self {
        Self {
            webdriver_url,
            page_load_timeout,
            root_selector,
        }
    }
}

#[async_trait]
impl PageBackend for BrowserPageBackend {
    fn name(&self) -> &'static str {
        "webdriver"
    }

    #[instrument(skip(self), fields(webdriver = %self.webdriver_url))]
    async fn open(&self) -> AppResult<Box<dyn PageSession>> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in CHROME_ARGS {
            caps.add_arg(arg)
                .map_err(|e| AppError::browser_unavailable(format!("Invalid Chrome flag {arg}: {e}")))?;
        }

        let driver = WebDriver::new(self.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| {
                AppError::browser_unavailable(format!(
                    "Chrome WebDriver connection failed at {}: {e}",
                    self.webdriver_url
                ))
            })?;

        let mut session = BrowserPageSession {
            driver: Some(driver),
            root_selector: self.root_selector.clone(),
        };
        if let Err(e) = session.set_page_load_timeout(self.page_load_timeout).await {
            session.close().await.ok();
            return Err(e);
        }

        debug!("Opened headless browser session");
        Ok(Box::new(session))
    }
}

struct BrowserPageSession {
    driver: Option<WebDriver>,
    root_selector: String,
}

impl BrowserPageSession {
    fn driver(&self) -> AppResult<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| AppError::browser_unavailable("Browser session already closed"))
    }

    async fn set_page_load_timeout(&self, timeout: Duration) -> AppResult<()> {
        self.driver()?
            .set_page_load_timeout(timeout)
            .await
            .map_err(|e| AppError::browser_unavailable(format!("Failed to set page load timeout: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl PageSession for BrowserPageSession {
    async fn load(&mut self, url: &Url) -> AppResult<String> {
        let driver = self.driver()?;

        driver
            .goto(url.as_str())
            .await
            .map_err(|e| AppError::page_unavailable(url.as_str(), format!("navigation failed: {e}")))?;

        driver
            .query(By::Css(self.root_selector.as_str()))
            .wait(Duration::from_secs(ROOT_ELEMENT_SECS), ROOT_POLL_INTERVAL)
            .first()
            .await
            .map_err(|e| {
                AppError::page_unavailable(
                    url.as_str(),
                    format!("{} never attached: {e}", self.root_selector),
                )
            })?;

        driver
            .source()
            .await
            .map_err(|e| AppError::page_unavailable(url.as_str(), format!("could not read page source: {e}")))
    }

    async fn close(&mut self) -> AppResult<()> {
        if let Some(driver) = self.driver.take() {
            driver
                .quit()
                .await
                .map_err(|e| AppError::browser_unavailable(format!("Failed to quit browser: {e}")))?;
            debug!("Closed headless browser session");
        }
        Ok(())
    }
}
