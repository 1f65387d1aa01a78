// src/server/response.rs

//! JSON response builders with cache and rate-limit headers.

use std::time::Duration;

use axum::Json;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;

use crate::services::CacheDirective;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait before making another request.";

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// A JSON body with a `Cache-Control` header.
pub fn cached_json<T: Serialize>(status: StatusCode, body: &T, cache: CacheDirective) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&cache.header_value()) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    (status, headers, Json(body)).into_response()
}

/// `{"error": message}`, never cached.
pub fn error(status: StatusCode, message: &str) -> Response {
    cached_json(status, &json!({ "error": message }), CacheDirective::NoCache)
}

/// `{"message": message}`, never cached.
pub fn failure_message(status: StatusCode, message: &str) -> Response {
    cached_json(status, &json!({ "message": message }), CacheDirective::NoCache)
}

/// Whole seconds a client should wait, never less than one.
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// 429 with `Retry-After` and `X-RateLimit-*` headers.
pub fn rate_limited(limit: u32, retry_after: Duration) -> Response {
    let wait = retry_after_secs(retry_after);
    let reset = chrono::Duration::from_std(retry_after)
        .map(|d| Utc::now() + d)
        .unwrap_or_else(|_| Utc::now());

    let mut response = error(StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE);
    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(wait));
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
    if let Ok(value) = HeaderValue::from_str(&reset.to_rfc3339_opts(SecondsFormat::Millis, true)) {
        headers.insert(X_RATELIMIT_RESET, value);
    }
    response
}
