// src/services/gateway.rs

//! Upstream gateway.
//!
//! Builds upstream requests from validated queries, applies the absolute
//! timeout and classifies every outcome into a listing batch, an empty batch,
//! or an error carrying the upstream status when one was received.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{GiveawayStats, Listing, NormalizedQuery, UpstreamConfig};
use crate::pipeline::GiveawayFetcher;
use crate::utils::http::{create_async_client, endpoint, fetch_text, is_success};

const LIST_PATH: &str = "giveaways";
const DETAIL_PATH: &str = "giveaway";
const STATS_PATH: &str = "worth";

/// Status the proxy answers with when no giveaways are live.
pub const NO_GIVEAWAYS_STATUS: u16 = 201;

/// Result of a successful list call.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    /// At least one listing
    Listings(Vec<Listing>),
    /// No giveaways are live right now
    Empty,
}

impl ListOutcome {
    pub fn into_vec(self) -> Vec<Listing> {
        match self {
            ListOutcome::Listings(listings) => listings,
            ListOutcome::Empty => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListOutcome::Empty)
    }
}

/// Whether shared caches may keep a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    Public { s_maxage: u64 },
    NoCache,
}

impl CacheDirective {
    pub fn header_value(&self) -> String {
        match self {
            CacheDirective::Public { s_maxage } => format!("public, s-maxage={s_maxage}"),
            CacheDirective::NoCache => "no-cache".to_string(),
        }
    }
}

/// Where the proxy reads giveaways from.
#[async_trait]
pub trait GiveawaySource: Send + Sync {
    /// Filtered, sorted listing batch.
    async fn list_giveaways(&self, query: &NormalizedQuery) -> Result<ListOutcome>;

    /// Single listing by id.
    async fn giveaway(&self, id: u64) -> Result<Listing>;

    /// Aggregate totals.
    async fn stats(&self) -> Result<GiveawayStats>;
}

/// HTTP gateway to the upstream giveaway provider.
#[derive(Debug, Clone)]
pub struct UpstreamGateway {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl UpstreamGateway {
    /// Create a gateway from upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let timeout = config.timeout();
        Ok(Self {
            client: create_async_client(&config.user_agent, timeout)?,
            base_url: Url::parse(&config.base_url)?,
            timeout,
        })
    }

    /// Upstream URL for a list query. Default-valued parameters are omitted.
    pub fn list_url(&self, query: &NormalizedQuery) -> Result<Url> {
        let mut url = endpoint(&self.base_url, LIST_PATH)?;
        let params = query.params();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub fn detail_url(&self, id: u64) -> Result<Url> {
        let mut url = endpoint(&self.base_url, DETAIL_PATH)?;
        url.query_pairs_mut().append_pair("id", &id.to_string());
        Ok(url)
    }

    pub fn stats_url(&self) -> Result<Url> {
        endpoint(&self.base_url, STATS_PATH)
    }
}

#[async_trait]
impl GiveawaySource for UpstreamGateway {
    async fn list_giveaways(&self, query: &NormalizedQuery) -> Result<ListOutcome> {
        let url = self.list_url(query)?;
        let (status, body) = fetch_text(&self.client, url, self.timeout).await?;
        classify_list(status, &body)
    }

    async fn giveaway(&self, id: u64) -> Result<Listing> {
        let url = self.detail_url(id)?;
        let (status, body) = fetch_text(&self.client, url, self.timeout).await?;
        classify_detail(status, &body)
    }

    async fn stats(&self) -> Result<GiveawayStats> {
        let url = self.stats_url()?;
        let (status, body) = fetch_text(&self.client, url, self.timeout).await?;
        classify_stats(status, &body)
    }
}

/// Lets the browser read straight from the upstream, skipping the proxy.
#[async_trait]
impl GiveawayFetcher for UpstreamGateway {
    async fn fetch_giveaways(&self, query: &NormalizedQuery) -> Result<Vec<Listing>> {
        Ok(self.list_giveaways(query).await?.into_vec())
    }
}

fn malformed(status: u16, error: impl std::fmt::Display) -> AppError {
    AppError::upstream(Some(status), format!("malformed upstream body: {error}"))
}

fn failure_status(status: u16, what: &str) -> AppError {
    AppError::upstream(Some(status), format!("Failed to fetch {what}: upstream status {status}"))
}

/// Classify a list response.
///
/// A 2xx body that is empty, `null`, `[]` or a status object means nothing is
/// live. Duplicate ids are dropped, first occurrence wins.
pub fn classify_list(status: u16, body: &str) -> Result<ListOutcome> {
    if !is_success(status) {
        return Err(failure_status(status, "giveaways"));
    }

    let body = body.trim();
    if body.is_empty() {
        return Ok(ListOutcome::Empty);
    }

    let items = match serde_json::from_str::<Value>(body).map_err(|e| malformed(status, e))? {
        Value::Array(items) if items.is_empty() => return Ok(ListOutcome::Empty),
        Value::Array(items) => items,
        Value::Null => return Ok(ListOutcome::Empty),
        Value::Object(status_object) => {
            log::info!(
                "Upstream reports no live giveaways: {}",
                status_object
                    .get("status_message")
                    .and_then(Value::as_str)
                    .unwrap_or("no message")
            );
            return Ok(ListOutcome::Empty);
        }
        other => return Err(malformed(status, format!("unexpected JSON {other}"))),
    };

    let mut seen = HashSet::new();
    let mut listings = Vec::with_capacity(items.len());
    for item in items {
        let listing: Listing = serde_json::from_value(item).map_err(|e| malformed(status, e))?;
        if seen.insert(listing.id) {
            listings.push(listing);
        } else {
            log::warn!("Dropping duplicate giveaway id {} in upstream batch", listing.id);
        }
    }
    Ok(ListOutcome::Listings(listings))
}

/// Classify a detail response. A 404, or a 2xx body without a listing, is
/// [`AppError::NotFound`].
pub fn classify_detail(status: u16, body: &str) -> Result<Listing> {
    if status == 404 {
        return Err(AppError::not_found("Giveaway not found"));
    }
    if !is_success(status) {
        return Err(failure_status(status, "giveaway"));
    }

    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::not_found("Giveaway not found"));
    }
    match serde_json::from_str::<Value>(body).map_err(|e| malformed(status, e))? {
        value @ Value::Object(_) if value.get("id").is_some() => {
            serde_json::from_value(value).map_err(|e| malformed(status, e))
        }
        _ => Err(AppError::not_found("Giveaway not found")),
    }
}

/// Classify a stats response.
pub fn classify_stats(status: u16, body: &str) -> Result<GiveawayStats> {
    if !is_success(status) {
        return Err(failure_status(status, "giveaway statistics"));
    }
    serde_json::from_str(body.trim()).map_err(|e| malformed(status, e))
}
