// src/server/routes.rs

//! `GET /api/giveaways`.
//!
//! Order of operations: identify the client, apply the rate limit, resolve
//! and validate the query, then dispatch to the list, detail or stats
//! lookup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::Response;
use serde_json::json;

use crate::error::AppError;
use crate::models::{ApiRequest, NormalizedQuery};
use crate::services::{
    Admission, CacheDirective, ListOutcome, NO_GIVEAWAYS_STATUS, RawQuery, UNKNOWN_CLIENT,
    client_identity, resolve,
};

use super::response;
use super::state::AppState;

/// Giveaways endpoint handler
pub async fn giveaways(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let client = identify(&state, &headers, peer.map(|ConnectInfo(addr)| addr));
    if let Admission::Rejected { retry_after } = state.limiter.check(&client) {
        return response::rate_limited(state.limiter.capacity(), retry_after);
    }

    let raw = RawQuery::from_query_string(uri.query().unwrap_or_default());
    let request = match resolve(&raw) {
        Ok(request) => request,
        Err(e) => return response::error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    match request {
        ApiRequest::List(query) => list(&state, &query).await,
        ApiRequest::Detail(id) => detail(&state, id).await,
        ApiRequest::Stats => stats(&state).await,
    }
}

fn identify(state: &AppState, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    if state.config.server.trust_forwarded_headers {
        let client = client_identity(header("x-forwarded-for"), header("x-real-ip"));
        if client != UNKNOWN_CLIENT {
            return client;
        }
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

async fn list(state: &AppState, query: &NormalizedQuery) -> Response {
    match state.source.list_giveaways(query).await {
        Ok(ListOutcome::Listings(listings)) => {
            response::cached_json(StatusCode::OK, &listings, state.public_cache())
        }
        Ok(ListOutcome::Empty) => no_giveaways(),
        Err(e) if state.config.upstream.degrade_list_failures => {
            log::warn!("Giveaways API error, serving empty list: {}", e);
            response::cached_json(StatusCode::OK, &json!([]), CacheDirective::NoCache)
        }
        Err(e) => {
            log::error!("Giveaways API error: {}", e);
            response::failure_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Failed to fetch giveaways: {e}"),
            )
        }
    }
}

fn no_giveaways() -> Response {
    let status = StatusCode::from_u16(NO_GIVEAWAYS_STATUS).unwrap_or(StatusCode::CREATED);
    response::cached_json(status, &json!([]), CacheDirective::NoCache)
}

async fn detail(state: &AppState, id: u64) -> Response {
    match state.source.giveaway(id).await {
        Ok(listing) => response::cached_json(StatusCode::OK, &listing, state.public_cache()),
        Err(AppError::NotFound(message)) => response::error(StatusCode::NOT_FOUND, &message),
        Err(e) => {
            log::error!("Giveaway {} lookup failed: {}", id, e);
            response::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch giveaway details",
            )
        }
    }
}

async fn stats(state: &AppState) -> Response {
    match state.source.stats().await {
        Ok(stats) => response::cached_json(StatusCode::OK, &stats, state.public_cache()),
        Err(e) => {
            log::error!("Stats API error: {}", e);
            response::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch giveaway statistics",
            )
        }
    }
}
