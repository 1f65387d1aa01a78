// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Proxy listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream provider settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Per-client admission control
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Cache directives attached to successful responses
    #[serde(default)]
    pub cache: CacheConfig,

    /// Client-side browsing behavior
    #[serde(default)]
    pub browse: BrowseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.user_agent.trim().is_empty() {
            return Err(AppError::config("upstream.user_agent is empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(AppError::config("upstream.timeout_secs must be > 0"));
        }
        Url::parse(&self.upstream.base_url)
            .map_err(|e| AppError::config(format!("upstream.base_url is invalid: {e}")))?;
        if self.rate_limit.capacity == 0 {
            return Err(AppError::config("rate_limit.capacity must be > 0"));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(AppError::config("rate_limit.window_ms must be > 0"));
        }
        if self.browse.page_size == 0 {
            return Err(AppError::config("browse.page_size must be > 0"));
        }
        Url::parse(&self.browse.proxy_url)
            .map_err(|e| AppError::config(format!("browse.proxy_url is invalid: {e}")))?;
        Ok(())
    }
}

/// Proxy listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Read client identity from `X-Forwarded-For` / `X-Real-IP`
    #[serde(default = "defaults::trust_forwarded_headers")]
    pub trust_forwarded_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            trust_forwarded_headers: defaults::trust_forwarded_headers(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL the list, detail and worth endpoints hang off
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for upstream requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Absolute request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Answer list failures with an empty, uncached batch instead of 500
    #[serde(default = "defaults::degrade_list_failures")]
    pub degrade_list_failures: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            degrade_list_failures: defaults::degrade_list_failures(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fixed-window admission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per window per client
    #[serde(default = "defaults::capacity")]
    pub capacity: u32,

    /// Window length in milliseconds
    #[serde(default = "defaults::window_ms")]
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::capacity(),
            window_ms: defaults::window_ms(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Cache directive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Shared-cache freshness for successful list/detail/stats responses
    #[serde(default = "defaults::s_maxage")]
    pub s_maxage_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            s_maxage_secs: defaults::s_maxage(),
        }
    }
}

/// Client-side browsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Listings per page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Quiet period before a search update is applied
    #[serde(default = "defaults::search_debounce")]
    pub search_debounce_ms: u64,

    /// Where the proxy is reachable from the client
    #[serde(default = "defaults::proxy_url")]
    pub proxy_url: String,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            search_debounce_ms: defaults::search_debounce(),
            proxy_url: defaults::proxy_url(),
        }
    }
}

impl BrowseConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

mod defaults {
    // Server defaults
    pub fn host() -> String {
        "127.0.0.1".into()
    }
    pub fn port() -> u16 {
        3000
    }
    pub fn trust_forwarded_headers() -> bool {
        true
    }

    // Upstream defaults
    pub fn base_url() -> String {
        "https://www.gamerpower.com/api".into()
    }
    pub fn user_agent() -> String {
        "freebie/0.1 (giveaway proxy)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn degrade_list_failures() -> bool {
        true
    }

    // Rate limit defaults
    pub fn capacity() -> u32 {
        4
    }
    pub fn window_ms() -> u64 {
        1000
    }

    // Cache defaults
    pub fn s_maxage() -> u64 {
        300
    }

    // Browse defaults
    pub fn page_size() -> usize {
        12
    }
    pub fn search_debounce() -> u64 {
        300
    }
    pub fn proxy_url() -> String {
        "http://127.0.0.1:3000".into()
    }
}
