// ABOUTME: Tests loading server configuration from real process environment variables
// ABOUTME: Serialized because the process environment is shared between test threads
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use folio_relay::config::{HarvestMode, ServerConfig};
use folio_relay::errors::ErrorCode;
use serial_test::serial;

const KEYS: &[&str] = &[
    "ENVIRONMENT",
    "NODE_ENV",
    "PORT",
    "GROQ_API_KEY",
    "CHAT_MODEL",
    "HARVEST_MODE",
    "SITE_TARGET",
    "SITE_BASE_URL",
    "DEPLOYED_SITE_URL",
    "URL",
    "CONTENT_CACHE_TTL_SECS",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http.port, 3000);
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.harvester.mode, HarvestMode::Html);
    assert!(config.expose_error_details());
}

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    clear_env();
    env::set_var("PORT", "8888");
    env::set_var("GROQ_API_KEY", "gsk_test");
    env::set_var("CHAT_MODEL", "llama-3.1-8b-instant");
    env::set_var("SITE_BASE_URL", "https://preview.example.com");
    env::set_var("CONTENT_CACHE_TTL_SECS", "30");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http.port, 8888);
    assert_eq!(config.llm.api_key.as_deref(), Some("gsk_test"));
    assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    assert_eq!(
        config.harvester.site_base_url().unwrap().as_str(),
        "https://preview.example.com/"
    );
    assert_eq!(config.harvester.cache_ttl().unwrap().as_secs(), 30);
    assert!(!config.summary().contains("gsk_test"));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_values() {
    clear_env();
    env::set_var("PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(err.code, ErrorCode::ConfigError);

    env::set_var("HARVEST_MODE", "telepathy");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_production_without_deployed_url_fails() {
    clear_env();
    env::set_var("NODE_ENV", "production");

    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert!(err.message.contains("DEPLOYED_SITE_URL"));
}
