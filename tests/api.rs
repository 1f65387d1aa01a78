#![cfg(feature = "server")]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use freebie::error::{AppError, Result};
use freebie::models::{Config, GiveawayStats, Listing, NormalizedQuery, Platform, Selection};
use freebie::server::{AppState, build_router};
use freebie::services::{GiveawaySource, ListOutcome};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tower::ServiceExt;

/// What the fake source answers with.
#[derive(Clone, Copy)]
enum Mode {
    Listings,
    Empty,
    Failing,
}

struct FakeSource {
    mode: Mode,
    seen: Mutex<Vec<NormalizedQuery>>,
}

impl FakeSource {
    fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            seen: Mutex::new(Vec::new()),
        })
    }
}

fn listing(id: u64, title: &str) -> Listing {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "worth": "$9.99",
        "platforms": "PC, Steam",
        "type": "Game",
        "gamerpower_url": format!("https://example.com/{id}"),
    }))
    .unwrap()
}

#[async_trait]
impl GiveawaySource for FakeSource {
    async fn list_giveaways(&self, query: &NormalizedQuery) -> Result<ListOutcome> {
        self.seen.lock().push(*query);
        match self.mode {
            Mode::Listings => Ok(ListOutcome::Listings(vec![
                listing(1, "Cosmic Tide"),
                listing(2, "Night Relay"),
            ])),
            Mode::Empty => Ok(ListOutcome::Empty),
            Mode::Failing => Err(AppError::UpstreamTimeout { timeout_secs: 10 }),
        }
    }

    async fn giveaway(&self, id: u64) -> Result<Listing> {
        match (self.mode, id) {
            (Mode::Failing, _) => Err(AppError::upstream(Some(502), "bad gateway")),
            (_, 1) => Ok(listing(1, "Cosmic Tide")),
            _ => Err(AppError::not_found("Giveaway not found")),
        }
    }

    async fn stats(&self) -> Result<GiveawayStats> {
        match self.mode {
            Mode::Failing => Err(AppError::upstream(None, "connection refused")),
            _ => Ok(GiveawayStats {
                total_worth: "325.10".into(),
                total_count: 74,
            }),
        }
    }
}

fn app_with(source: Arc<FakeSource>, config: Config) -> axum::Router {
    build_router(Arc::new(AppState::new(config, source)))
}

fn app(source: Arc<FakeSource>) -> axum::Router {
    app_with(source, Config::default())
}

async fn get(app: &axum::Router, uri: &str, client: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn cache_control(response: &Response) -> &str {
    response.headers()[header::CACHE_CONTROL].to_str().unwrap()
}

#[tokio::test]
async fn list_is_cached_and_passes_fields_through() {
    let source = FakeSource::new(Mode::Listings);
    let app = app(source.clone());

    let response = get(&app, "/api/giveaways?platform=steam&sort-by=popularity", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_control(&response), "public, s-maxage=300");

    let body = body_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Cosmic Tide");
    assert_eq!(items[0]["type"], "Game");
    assert_eq!(items[0]["gamerpower_url"], "https://example.com/1");

    let seen = source.seen.lock();
    assert_eq!(seen[0].platform, Selection::One(Platform::Steam));
}

#[tokio::test]
async fn empty_list_uses_dedicated_status() {
    let app = app(FakeSource::new(Mode::Empty));
    let response = get(&app, "/api/giveaways", "10.0.0.2").await;
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(cache_control(&response), "no-cache");
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn list_failure_degrades_to_empty() {
    let app = app(FakeSource::new(Mode::Failing));
    let response = get(&app, "/api/giveaways", "10.0.0.3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_control(&response), "no-cache");
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn list_failure_surfaces_when_degrading_is_off() {
    let mut config = Config::default();
    config.upstream.degrade_list_failures = false;
    let app = app_with(FakeSource::new(Mode::Failing), config);

    let response = get(&app, "/api/giveaways", "10.0.0.4").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(cache_control(&response), "no-cache");
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().starts_with("Failed to fetch giveaways"));
}

#[tokio::test]
async fn invalid_values_name_the_field() {
    let source = FakeSource::new(Mode::Listings);
    let app = app(source.clone());

    for (uri, field) in [
        ("/api/giveaways?platform=nes", "Invalid platform"),
        ("/api/giveaways?type=demo", "Invalid type"),
        ("/api/giveaways?sort-by=newest", "Invalid sort-by"),
    ] {
        let response = get(&app, uri, "10.0.0.5").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with(field), "{body}");
    }
    assert!(source.seen.lock().is_empty());
}

#[tokio::test]
async fn detail_lookup() {
    let app = app(FakeSource::new(Mode::Listings));

    let response = get(&app, "/api/giveaways?id=1", "10.0.0.6").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], 1);

    let response = get(&app, "/api/giveaways?id=999", "10.0.0.6").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Giveaway not found");

    let response = get(&app, "/api/giveaways?id=abc", "10.0.0.6").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_and_stats_failures_are_explicit() {
    let app = app(FakeSource::new(Mode::Failing));

    let response = get(&app, "/api/giveaways?id=1", "10.0.0.7").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to fetch giveaway details");

    let response = get(&app, "/api/giveaways?stats=true", "10.0.0.7").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to fetch giveaway statistics");
}

#[tokio::test]
async fn stats_are_camel_cased() {
    let app = app(FakeSource::new(Mode::Listings));
    let response = get(&app, "/api/giveaways?stats=true", "10.0.0.8").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_control(&response), "public, s-maxage=300");
    assert_eq!(
        body_json(response).await,
        json!({ "totalWorth": "325.10", "totalCount": 74 })
    );
}

#[tokio::test]
async fn fifth_request_in_a_window_is_rejected() {
    let app = app(FakeSource::new(Mode::Listings));

    for _ in 0..4 {
        let response = get(&app, "/api/giveaways", "203.0.113.9").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(&app, "/api/giveaways", "203.0.113.9, 10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let headers = response.headers();
    assert_eq!(headers[header::RETRY_AFTER], "1");
    assert_eq!(headers["x-ratelimit-limit"], "4");
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert!(headers.contains_key("x-ratelimit-reset"));
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Rate limit exceeded"));

    // other clients keep their own budget
    let response = get(&app, "/api/giveaways", "198.51.100.4").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rate_limit_applies_before_validation() {
    let app = app(FakeSource::new(Mode::Listings));
    for _ in 0..4 {
        let response = get(&app, "/api/giveaways?platform=nes", "192.0.2.1").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    let response = get(&app, "/api/giveaways?platform=nes", "192.0.2.1").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
