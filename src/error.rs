// src/error.rs

//! Unified error handling for the giveaway proxy and its client pipeline.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for proxy and pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response was classified
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A query parameter is outside its allowed values
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Per-client admission budget exhausted
    #[error("Rate limit exceeded. Please wait before making another request.")]
    RateLimited { retry_after: Duration },

    /// Upstream did not answer within the absolute timeout
    #[error("Upstream request timed out after {timeout_secs}s")]
    UpstreamTimeout { timeout_secs: u64 },

    /// Upstream answered with a failure status or could not be reached
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { status: Option<u16>, message: String },

    /// Detail lookup for an unknown id
    #[error("{0}")]
    NotFound(String),

    /// The proxy answered the client with a failure
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error for a value outside a fixed enumeration.
    pub fn invalid_option(field: impl Into<String>, allowed: &[&str]) -> Self {
        let field = field.into();
        Self::Validation {
            message: format!("Invalid {}. Valid options: {}", field, allowed.join(", ")),
            field,
        }
    }

    /// Create a validation error with a free-form message.
    pub fn validation(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Create an upstream failure, keeping the upstream status when known.
    pub fn upstream(status: Option<u16>, message: impl fmt::Display) -> Self {
        Self::UpstreamUnavailable {
            status,
            message: message.to_string(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Status reported by the upstream, if the failure came from a response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamUnavailable { status, .. } => *status,
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is an upstream failure (timeout, network, or error status).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout { .. } | Self::UpstreamUnavailable { .. } | Self::Http(_)
        )
    }

    /// HTTP status this error surfaces as on the proxy.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound(_) => 404,
            Self::RateLimited { .. } => 429,
            Self::Api { status, .. } => *status,
            _ => 500,
        }
    }
}
