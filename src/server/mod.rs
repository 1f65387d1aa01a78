// src/server/mod.rs

//! HTTP surface of the proxy.

pub mod response;
pub mod routes;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{AppError, Result};
use crate::models::Config;

pub use state::AppState;

/// Path of the giveaways endpoint.
pub const GIVEAWAYS_PATH: &str = "/api/giveaways";

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    Router::new()
        .route(GIVEAWAYS_PATH, get(routes::giveaways))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Run the proxy until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::config(format!("Failed to bind to {}: {}", addr, e))
    })?;
    let local = listener.local_addr()?;

    log::info!("Giveaway proxy listening on http://{}{}", local, GIVEAWAYS_PATH);
    log::info!(
        "Upstream: {} (timeout {}s), rate limit {} per {}ms",
        state.config.upstream.base_url,
        state.config.upstream.timeout_secs,
        state.config.rate_limit.capacity,
        state.config.rate_limit.window_ms
    );

    let app = build_router(Arc::new(state));
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("Giveaway proxy stopped");
    Ok(())
}

/// Run the proxy against the configured upstream until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    serve_with_shutdown(state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Received shutdown signal, stopping proxy...");
}
