// src/services/proxy_client.rs

//! Client for the proxy's `/api/giveaways` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, GiveawayStats, Listing, NormalizedQuery};
use crate::pipeline::GiveawayFetcher;
use crate::utils::http::{create_async_client, endpoint, fetch_text, is_success};

use super::gateway::NO_GIVEAWAYS_STATUS;

/// Reads giveaways through a running proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl ProxyClient {
    /// Create a client for the proxy rooted at `proxy_url`.
    pub fn new(proxy_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(proxy_url)?;
        let api = endpoint(&base, "api")?;
        Ok(Self {
            client: create_async_client(user_agent, timeout)?,
            endpoint: endpoint(&api, "giveaways")?,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.browse.proxy_url,
            &config.upstream.user_agent,
            config.upstream.timeout(),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Listing batch for `query`. "No giveaways" comes back as an empty list.
    pub async fn fetch_giveaways(&self, query: &NormalizedQuery) -> Result<Vec<Listing>> {
        let mut url = self.endpoint.clone();
        let params = query.params();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        let (status, body) = fetch_text(&self.client, url, self.timeout).await?;
        if !is_success(status) {
            return Err(api_error(status, &body));
        }
        if status == NO_GIVEAWAYS_STATUS || body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Single listing, or `None` when the proxy answers 404.
    pub async fn fetch_giveaway_by_id(&self, id: u64) -> Result<Option<Listing>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("id", &id.to_string());

        let (status, body) = fetch_text(&self.client, url, self.timeout).await?;
        if status == 404 {
            return Ok(None);
        }
        if !is_success(status) {
            return Err(api_error(status, &body));
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Aggregate totals, or `None` if the proxy could not provide them.
    pub async fn fetch_stats(&self) -> Result<Option<GiveawayStats>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("stats", "true");

        let (status, body) = fetch_text(&self.client, url, self.timeout).await?;
        if !is_success(status) {
            log::warn!("Stats unavailable: {}", api_error(status, &body));
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[async_trait]
impl GiveawayFetcher for ProxyClient {
    async fn fetch_giveaways(&self, query: &NormalizedQuery) -> Result<Vec<Listing>> {
        ProxyClient::fetch_giveaways(self, query).await
    }
}

/// Build an [`AppError::Api`] from an error response, preferring the body's
/// `message` then `error` field. A 429 becomes [`AppError::RateLimited`].
pub fn api_error(status: u16, body: &str) -> AppError {
    if status == 429 {
        return AppError::RateLimited {
            retry_after: Duration::from_secs(1),
        };
    }
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP error! status: {status}"));
    AppError::Api { status, message }
}
