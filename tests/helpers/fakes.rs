// ABOUTME: In-process fakes for the completion provider and the content harvester
// ABOUTME: Record every call so tests can assert what reached the outside world

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_relay::content::PortfolioContent;
use folio_relay::errors::AppError;
use folio_relay::harvester::ContentHarvester;
use folio_relay::llm::{ChatRequest, ChatResponse, LlmProvider};
use url::Url;

/// Provider answering every request with a fixed reply or a fixed failure
pub struct FakeProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeProvider {
    /// Provider that always answers `reply`
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Provider whose every call fails as the upstream would
    #[allow(dead_code)]
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "fake-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Err(message) => Err(AppError::external_service("Fake", message.clone())
                .with_details(format!("503 Service Unavailable: {message}"))),
        }
    }
}

/// Harvester returning fixed content and counting calls
pub struct StaticHarvester {
    content: PortfolioContent,
    calls: AtomicUsize,
}

impl StaticHarvester {
    /// Harvester returning `content` on every call
    pub fn new(content: PortfolioContent) -> Arc<Self> {
        Arc::new(Self {
            content,
            calls: AtomicUsize::new(0),
        })
    }

    /// Harvester whose `about` section reads `about` and everything else is a placeholder
    pub fn with_about(about: &str) -> Arc<Self> {
        let mut content = PortfolioContent::placeholder();
        content.about = about.to_owned();
        Self::new(content)
    }

    /// Number of harvests performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentHarvester for StaticHarvester {
    async fn harvest(&self, _base_url: &Url) -> PortfolioContent {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.content.clone()
    }
}
