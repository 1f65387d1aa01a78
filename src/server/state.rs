// src/server/state.rs

//! Shared state passed to every route handler.

use std::sync::Arc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{CacheDirective, GiveawaySource, RateLimiter, UpstreamGateway};

pub struct AppState {
    pub config: Arc<Config>,
    pub limiter: RateLimiter,
    pub source: Arc<dyn GiveawaySource>,
}

impl AppState {
    /// State reading from an arbitrary source.
    pub fn new(config: Config, source: Arc<dyn GiveawaySource>) -> Self {
        Self {
            limiter: RateLimiter::from_config(&config.rate_limit),
            config: Arc::new(config),
            source,
        }
    }

    /// State reading from the configured upstream.
    pub fn from_config(config: Config) -> Result<Self> {
        let gateway = UpstreamGateway::new(&config.upstream)?;
        Ok(Self::new(config, Arc::new(gateway)))
    }

    /// Directive for successful, cacheable responses.
    pub fn public_cache(&self) -> CacheDirective {
        CacheDirective::Public {
            s_maxage: self.config.cache.s_maxage_secs,
        }
    }
}
