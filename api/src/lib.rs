//! HTTP surface of the service: `GET /` and the GitHub webhook.

pub mod core;
pub mod error_handler;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_config::{AppConfig, ConfigError};
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    core::app_state::AppState,
    routes::{root_route::root_route, webhook::webhook_route::webhook_route},
};

/// Builds the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_route))
        .route("/webhook", post(webhook_route))
        .route("/webhook/", post(webhook_route))
        .with_state(state)
}

/// Builds the state, binds `config.api_address` and serves until Ctrl+C.
pub async fn start(config: AppConfig) -> AppResult<()> {
    let address = config.api_address.clone();
    let state = Arc::new(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
