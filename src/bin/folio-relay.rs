// ABOUTME: Long-running server binary for the portfolio chat relay
// ABOUTME: Loads configuration, checks the completion credential and serves the HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Folio Relay Server Binary
//!
//! Starts the chat relay on `PORT` (default 3000). A missing completion API
//! credential aborts startup unless `--defer-credential-check` is given, in
//! which case the server runs and each chat request answers 500.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use folio_relay::{
    config::ServerConfig,
    constants::completion::API_KEY_ENV,
    logging,
    server::{build_router, serve, ServerResources},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "folio-relay")]
#[command(about = "Portfolio chat relay - harvests the site's pages and proxies chat to a hosted LLM")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Start even when the completion API credential is missing
    #[arg(long)]
    defer_credential_check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;
    info!("Starting Folio Relay");

    let mut config = ServerConfig::from_env().inspect_err(|e| {
        error!(error = %e, details = ?e.details, "Invalid configuration");
    })?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    info!("{}", config.summary());

    if config.llm.api_key.is_none() {
        if args.defer_credential_check {
            error!("{API_KEY_ENV} is not set; chat requests will answer 500 until it is configured");
        } else {
            bail!("{API_KEY_ENV} is not set (pass --defer-credential-check to start anyway)");
        }
    }

    let resources = Arc::new(ServerResources::from_config(&config)?);
    let router = build_router(resources, &config.http);

    if let Err(e) = serve(router, &config.http).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
