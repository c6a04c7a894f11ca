// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router construction and the listener loop.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use wanglai_core::{WanglaiError, WebhookVerifier};
use wanglai_line::WebhookPayload;

use crate::handlers;

/// Shared state for the webhook handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Verified payloads go here for the dispatch worker.
    pub inbound_tx: mpsc::Sender<WebhookPayload>,
    pub verifier: Arc<dyn WebhookVerifier>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webhook_path: String,
}

/// `GET /health` plus the webhook route at `webhook_path`.
pub fn router(state: GatewayState, webhook_path: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(webhook_path, post(handlers::post_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves until `cancel` fires, then drains in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), WanglaiError> {
    let app = router(state, &config.webhook_path);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WanglaiError::Channel {
            message: format!("failed to bind webhook server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(%addr, path = %config.webhook_path, "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| WanglaiError::Channel {
            message: format!("webhook server error: {e}"),
            source: Some(Box::new(e)),
        })
}
