// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook and health handlers.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, warn};

use wanglai_line::WebhookPayload;

use crate::server::GatewayState;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// GET /health
pub async fn get_health() -> &'static str {
    "OK"
}

/// POST {webhook_path}
///
/// Acknowledges as soon as the payload is queued; events are handled by the
/// dispatch worker after the response has gone out.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        warn!("webhook request without signature header");
        return (StatusCode::BAD_REQUEST, "Missing signature");
    };

    if !state.verifier.verify(&body, signature) {
        warn!("webhook signature mismatch");
        return (StatusCode::FORBIDDEN, "Invalid signature");
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "webhook body is not valid JSON");
            return (StatusCode::BAD_REQUEST, "Invalid body");
        }
    };

    debug!(events = payload.events.len(), "webhook accepted");
    match tokio::time::timeout(ENQUEUE_TIMEOUT, state.inbound_tx.send(payload)).await {
        Ok(Ok(())) => (StatusCode::OK, "OK"),
        Ok(Err(_)) => {
            warn!("dispatch worker is gone; dropping webhook");
            (StatusCode::SERVICE_UNAVAILABLE, "Unavailable")
        }
        Err(_) => {
            warn!("dispatch queue full; dropping webhook");
            (StatusCode::SERVICE_UNAVAILABLE, "Busy")
        }
    }
}
