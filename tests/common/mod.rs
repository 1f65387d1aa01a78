//! Local stand-in for the upstream giveaway provider.
//!
//! Routes are mounted under `/{mode}/...` so one server can play every
//! upstream behavior a test needs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query, RawQuery};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tokio::net::TcpListener;

const NO_ACTIVE: &str =
    r#"{"status":0,"status_message":"No active giveaways available at the moment, please try again later."}"#;

async fn giveaways(Path(mode): Path<String>, RawQuery(query): RawQuery) -> Response {
    match mode.as_str() {
        "ok" => axum::Json(json!([
            { "id": 10, "title": query.unwrap_or_default(), "type": "Game", "users": 5 },
            { "id": 11, "title": "Second", "type": "DLC", "platforms": "PC, Steam" },
            { "id": 10, "title": "duplicate", "type": "Game" },
        ]))
        .into_response(),
        "empty" => (StatusCode::CREATED, NO_ACTIVE).into_response(),
        "blank" => StatusCode::OK.into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
        "garbled" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            axum::Json(json!([])).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn giveaway(Path(mode): Path<String>, Query(params): Query<HashMap<String, String>>) -> Response {
    match (mode.as_str(), params.get("id").map(String::as_str)) {
        ("ok", Some("10")) => axum::Json(json!({
            "id": 10,
            "title": "Cosmic Tide",
            "end_date": "N/A",
            "status": "Active",
        }))
        .into_response(),
        ("ok", _) => (
            StatusCode::CREATED,
            r#"{"status":0,"status_message":"No giveaway found"}"#,
        )
            .into_response(),
        ("broken", _) => StatusCode::BAD_GATEWAY.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn worth(Path(mode): Path<String>) -> Response {
    match mode.as_str() {
        "ok" => axum::Json(json!({
            "active_giveaways_number": 74,
            "worth_estimation_usd": "325.10",
        }))
        .into_response(),
        _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

pub async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/:mode/giveaways", get(giveaways))
        .route("/:mode/giveaway", get(giveaway))
        .route("/:mode/worth", get(worth));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
