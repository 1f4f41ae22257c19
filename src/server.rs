//! HTTP transport: route wiring and the listener. All decision logic lives
//! in [`crate::write`].

use crate::config::ServerConfig;
use crate::errors::WriteError;
use crate::model::{WriteOutcome, WriteRequest};
use crate::state::AppState;
use crate::write::handle_write;
use anyhow::Result;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    message: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/write", post(write))
        .with_state(state)
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        message: "sheet-relay is running",
    })
}

async fn write(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<WriteOutcome>, WriteError> {
    handle_write(&state, req).await.map(Json)
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    serve_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Runs the server until `shutdown` resolves, then drains in-flight
/// requests and returns.
pub async fn serve_with_shutdown(
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let state = Arc::new(AppState::new(Arc::new(config)));
    let listener = tokio::net::TcpListener::bind(state.config().bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
