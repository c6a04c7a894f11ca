// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wanglai serve` command implementation.
//!
//! Opens the ledger database, builds the LINE, backend, and media clients,
//! and runs the webhook server in front of a single dispatch worker until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use wanglai_agent::{Collaborators, Dispatcher, dedup, shutdown};
use wanglai_config::model::WanglaiConfig;
use wanglai_core::{
    AssetHost, KeyValueStore, MemoryStore, PluginAdapter, Transcriber, WanglaiError,
};
use wanglai_dify::DifyClient;
use wanglai_gateway::{GatewayState, ServerConfig, start_server};
use wanglai_line::{LineClient, LineSignatureVerifier};
use wanglai_media::{CloudinaryHost, OpenAiTranscriber};
use wanglai_storage::SqliteStorage;

use crate::recurring;

/// Webhook payloads waiting for the dispatch worker.
const INBOUND_QUEUE_CAPACITY: usize = 256;

/// How long background tasks get to finish after the server stops.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the `wanglai serve` command.
pub async fn run_serve(config: WanglaiConfig) -> Result<(), WanglaiError> {
    info!("starting wanglai serve");

    if let Err(errors) = wanglai_config::validate_serving_secrets(&config) {
        wanglai_config::render_errors(&errors);
        return Err(WanglaiError::Config(format!(
            "{} required setting(s) missing",
            errors.len()
        )));
    }

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let state: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let transport = Arc::new(LineClient::new(&config.line)?);
    let backend = Arc::new(DifyClient::new(&config.backend, state.clone())?);

    let transcriber = match OpenAiTranscriber::new(&config.transcription) {
        Ok(t) => Some(Arc::new(t) as Arc<dyn Transcriber>),
        Err(e) => {
            warn!(error = %e, "transcription not configured, audio messages will be declined");
            None
        }
    };
    let assets = match CloudinaryHost::new(&config.asset) {
        Ok(host) => Some(Arc::new(host) as Arc<dyn AssetHost>),
        Err(e) => {
            warn!(error = %e, "image hosting not configured, image messages will be declined");
            None
        }
    };

    let channel_secret = config.line.channel_secret.clone().unwrap_or_default();
    let verifier = Arc::new(LineSignatureVerifier::new(channel_secret));

    let dispatcher = Arc::new(Dispatcher::new(
        Collaborators {
            transport,
            backend,
            store: storage.clone(),
            state: state.clone(),
            transcriber,
            assets,
        },
        &config,
    ));

    let cancel = shutdown::install_signal_handler();
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_CAPACITY);

    let mut tasks = Vec::new();

    {
        let dispatcher = dispatcher.clone();
        let worker_cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.run(inbound_rx, worker_cancel).await;
        }));
    }

    tasks.push(dedup::spawn_sweeper(
        state,
        Duration::from_secs(config.dedup.sweep_interval_secs),
        cancel.clone(),
    ));
    info!(
        expiry_secs = config.dedup.expiry_secs,
        sweep_interval_secs = config.dedup.sweep_interval_secs,
        "dedup sweeper started"
    );

    if config.recurring.enabled {
        tasks.push(recurring::spawn_scheduler(
            storage.clone(),
            &config.recurring,
            config.summary.utc_offset_hours,
            cancel.clone(),
        )?);
    } else {
        info!("recurring scheduler disabled by configuration");
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        webhook_path: config.server.webhook_path.clone(),
    };
    let gateway = GatewayState {
        inbound_tx,
        verifier,
    };

    let served = start_server(&server_config, gateway, cancel.clone()).await;

    // A bind failure returns before any signal; stop the background tasks too.
    cancel.cancel();
    for task in tasks {
        match tokio::time::timeout(DRAIN_TIMEOUT, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "background task panicked"),
            Err(_) => warn!("background task did not stop in time"),
        }
    }

    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }

    served?;
    info!("wanglai serve shutdown complete");
    Ok(())
}
