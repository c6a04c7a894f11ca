// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! At-most-once handling of webhook event ids.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use wanglai_core::KeyValueStore;

fn event_key(event_id: &str) -> String {
    format!("event:{event_id}")
}

/// Processed-event set backed by a TTL'd key-value store.
#[derive(Clone)]
pub struct EventDedup {
    store: Arc<dyn KeyValueStore>,
    expiry: Duration,
}

impl EventDedup {
    pub fn new(store: Arc<dyn KeyValueStore>, expiry: Duration) -> Self {
        Self { store, expiry }
    }

    /// Store failures count as "not seen" so an outage never drops events.
    pub async fn seen(&self, event_id: &str) -> bool {
        match self.store.get(&event_key(event_id)).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(error = %e, event_id, "dedup lookup failed");
                false
            }
        }
    }

    pub async fn record(&self, event_id: &str) {
        let received_at = chrono::Utc::now().to_rfc3339();
        if let Err(e) = self
            .store
            .set(&event_key(event_id), received_at, Some(self.expiry))
            .await
        {
            warn!(error = %e, event_id, "failed to record processed event");
        }
    }
}

/// Purges expired keys every `interval` until `cancel` fires.
pub fn spawn_sweeper(
    store: Arc<dyn KeyValueStore>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match store.sweep().await {
                        Ok(0) => {}
                        Ok(removed) => debug!(removed, "expired keys swept"),
                        Err(e) => warn!(error = %e, "key sweep failed"),
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }
    })
}
