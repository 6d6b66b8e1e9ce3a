// ABOUTME: Server bootstrap wiring configuration into the relay, router and HTTP listener
// ABOUTME: Builds shared resources once and serves with graceful shutdown on Ctrl-C or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Server
//!
//! [`ServerResources`] holds everything handlers share: the relay (with its
//! harvester and completion provider, each constructed once) and whether
//! error bodies may carry diagnostics. [`build_router`] mounts every route
//! behind request-id, tracing, CORS and body-limit layers.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::{HttpConfig, ServerConfig};
use crate::constants::limits::MAX_REQUEST_BODY_BYTES;
use crate::errors::{AppError, AppResult};
use crate::harvester::{CachedHarvester, ContentHarvester, Harvester};
use crate::llm::{CompletionsProvider, LlmProvider};
use crate::middleware::setup_cors;
use crate::relay::ChatRelay;
use crate::routes::{ChatRoutes, ContentRoutes, HealthRoutes};

/// State shared by every handler
pub struct ServerResources {
    /// Chat relay
    pub relay: ChatRelay,
    /// Include `details` in error bodies
    pub expose_error_details: bool,
}

impl ServerResources {
    /// Wrap a relay
    #[must_use]
    pub const fn new(relay: ChatRelay, expose_error_details: bool) -> Self {
        Self {
            relay,
            expose_error_details,
        }
    }

    /// Construct the harvester, completion provider and relay from configuration
    ///
    /// A missing credential leaves the relay without a provider; chat requests
    /// then fail with a configuration error.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unusable site URL or harvest mode,
    /// or if an HTTP client cannot be built
    pub fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let base_url = config.harvester.site_base_url()?;

        let harvester = Harvester::from_config(&config.harvester)?;
        info!(
            mode = %config.harvester.mode,
            extraction = ?harvester.extraction(),
            base_url = %base_url,
            "Content harvester ready"
        );
        let harvester: Arc<dyn ContentHarvester> = match config.harvester.cache_ttl() {
            Some(ttl) => {
                info!(ttl_secs = ttl.as_secs(), "Harvested content cache enabled");
                Arc::new(CachedHarvester::new(Arc::new(harvester), ttl))
            }
            None => Arc::new(harvester),
        };

        let provider: Option<Arc<dyn LlmProvider>> = if config.llm.api_key.is_some() {
            Some(Arc::new(CompletionsProvider::from_config(&config.llm)?))
        } else {
            warn!("No completion API credential configured; chat requests will fail");
            None
        };

        let relay = ChatRelay::new(harvester, provider, base_url)
            .with_sampling(config.llm.temperature, config.llm.max_tokens);

        Ok(Self::new(relay, config.expose_error_details()))
    }
}

/// Mount every route with the shared middleware stack
pub fn build_router(resources: Arc<ServerResources>, http: &HttpConfig) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(ChatRoutes::routes(Arc::clone(&resources)))
        .merge(ContentRoutes::routes(resources))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(setup_cors(http))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Bind the configured address and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(router: Router, http: &HttpConfig) -> AppResult<()> {
    let addr = format!("{}:{}", http.host, http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind {addr}: {e}")).with_source(e))?;
    serve_listener(listener, router).await
}

/// Serve on an already bound listener until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the server fails
pub async fn serve_listener(listener: TcpListener, router: Router) -> AppResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("HTTP server listening on http://{addr}");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("HTTP server error: {e}")).with_source(e))?;
    info!("HTTP server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
