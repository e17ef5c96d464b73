//! Process-wide configuration, read once at startup.
//!
//! The completion-endpoint bearer token comes from `AIPROXY_TOKEN` and is
//! required: the dispatch path cannot work without it, so startup fails
//! fast rather than at the first request. Everything else has a default
//! with a `PROMPTD_*` environment override.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Default chat-completions endpoint (an OpenAI-compatible proxy).
pub const DEFAULT_ENDPOINT: &str =
    "https://aiproxy.sanand.workers.dev/openai/v1/chat/completions";

/// Default model identifier sent in the request body.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Immutable configuration for the completion client and server.
///
/// Fields are public so tests can construct one directly against a stub
/// endpoint instead of going through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the completion endpoint.
    pub api_token: String,
    /// Chat-completions URL.
    pub endpoint: String,
    /// Model identifier (e.g. "gpt-4o-mini").
    pub model: String,
    /// TCP connect timeout for the completion client.
    pub connect_timeout: Duration,
    /// Per-request timeout for the completion client.
    pub request_timeout: Duration,
    /// Retries after the initial attempt, quota errors only.
    pub max_retries: usize,
    /// Fixed delay between quota retries.
    pub retry_delay: Duration,
    /// Root directory task file paths are resolved under.
    pub data_root: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails if `AIPROXY_TOKEN` is missing or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_token = std::env::var("AIPROXY_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .context("AIPROXY_TOKEN must be set")?;

        Ok(Self {
            api_token,
            endpoint: env_or("PROMPTD_ENDPOINT", DEFAULT_ENDPOINT),
            model: env_or("PROMPTD_MODEL", DEFAULT_MODEL),
            connect_timeout: Duration::from_secs(env_secs("PROMPTD_CONNECT_TIMEOUT_SECS", 30)),
            request_timeout: Duration::from_secs(env_secs("PROMPTD_REQUEST_TIMEOUT_SECS", 20)),
            max_retries: env_secs("PROMPTD_MAX_RETRIES", 3) as usize,
            retry_delay: Duration::from_millis(env_secs("PROMPTD_RETRY_DELAY_MS", 2000)),
            data_root: PathBuf::from(env_or("PROMPTD_DATA_ROOT", ".")),
        })
    }

    /// Config with explicit token and endpoint (useful for tests or
    /// non-default endpoints).
    pub fn with_endpoint(api_token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoint: endpoint.into(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(20),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            data_root: PathBuf::from("."),
        }
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_secs(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
