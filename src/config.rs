// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::cache::CacheOptions;
use reqwest::Url;
use std::env;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the activities API (e.g. `http://localhost:5000/api`)
    pub api_url: Url,
    /// Upper bound on each remote call
    pub request_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: Url::parse("http://localhost:5000/api").expect("default URL is valid"),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let raw_url =
            env::var("ACTIVITIES_API_URL").map_err(|_| ConfigError::Missing("ACTIVITIES_API_URL"))?;
        let api_url = parse_api_url(&raw_url)?;

        let request_timeout = match env::var("ACTIVITIES_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }

    /// Options for the activity cache derived from this config.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            call_timeout: Some(self.request_timeout),
        }
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var: "ACTIVITIES_API_URL",
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            var: "ACTIVITIES_API_URL",
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            var: "ACTIVITIES_REQUEST_TIMEOUT_SECS",
            reason: format!("expected a positive number of seconds, got {:?}", raw),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
