// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end harness: a real [`Dispatcher`] over mock collaborators.

use std::sync::Arc;

use wanglai_agent::{Collaborators, Dispatcher};
use wanglai_config::model::WanglaiConfig;
use wanglai_core::{
    AssetHost, CategoryLists, KeyValueStore, MemoryStore, TransactionRecord, Transcriber,
};
use wanglai_line::{EventMessage, EventSource, WebhookEvent, WebhookPayload};

use crate::mock_backend::{MockAssetHost, MockBackend, MockTranscriber};
use crate::mock_store::MockStore;
use crate::mock_transport::MockTransport;

pub struct TestHarnessBuilder {
    config: WanglaiConfig,
    backend: MockBackend,
    store: MockStore,
    transcriber: Option<MockTranscriber>,
    assets: Option<MockAssetHost>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = WanglaiConfig::default();
        config.reply.liff_id = "test-liff".to_string();
        Self {
            config,
            backend: MockBackend::new(),
            store: MockStore::new(),
            transcriber: None,
            assets: None,
        }
    }

    pub fn with_backend_replies(mut self, replies: Vec<String>) -> Self {
        self.backend = MockBackend::with_replies(replies);
        self
    }

    pub fn with_backend(mut self, backend: MockBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_records(mut self, records: Vec<TransactionRecord>) -> Self {
        self.store = self.store.with_records(records);
        self
    }

    pub fn with_categories(mut self, categories: CategoryLists) -> Self {
        self.store = self.store.with_categories(categories);
        self
    }

    pub fn with_transcriber(mut self, transcriber: MockTranscriber) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_asset_host(mut self, assets: MockAssetHost) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn with_admin(mut self, admin_user_id: &str, target_user_id: &str) -> Self {
        self.config.admin.admin_user_id = Some(admin_user_id.to_string());
        self.config.admin.target_user_id = Some(target_user_id.to_string());
        self
    }

    pub fn build(self) -> TestHarness {
        let transport = Arc::new(MockTransport::new());
        let backend = Arc::new(self.backend);
        let state = Arc::new(MemoryStore::new());
        let transcriber = self.transcriber.map(Arc::new);
        let assets = self.assets.map(Arc::new);

        let dispatcher = Dispatcher::new(
            Collaborators {
                transport: transport.clone(),
                backend: backend.clone(),
                store: Arc::new(self.store),
                state: state.clone(),
                transcriber: transcriber.clone().map(|t| t as Arc<dyn Transcriber>),
                assets: assets.clone().map(|a| a as Arc<dyn AssetHost>),
            },
            &self.config,
        );

        TestHarness {
            dispatcher: Arc::new(dispatcher),
            transport,
            backend,
            state,
            assets,
        }
    }
}

pub struct TestHarness {
    pub dispatcher: Arc<Dispatcher>,
    pub transport: Arc<MockTransport>,
    pub backend: Arc<MockBackend>,
    /// Dedup, admin, and conversation state.
    pub state: Arc<dyn KeyValueStore>,
    pub assets: Option<Arc<MockAssetHost>>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A one-event payload from `user_id` with `event_id` as its webhook id.
    pub fn message_payload(event_id: &str, user_id: &str, message: EventMessage) -> WebhookPayload {
        WebhookPayload {
            destination: "Ubot".to_string(),
            events: vec![WebhookEvent {
                kind: "message".to_string(),
                webhook_event_id: Some(event_id.to_string()),
                reply_token: Some(format!("rt-{event_id}")),
                source: Some(EventSource {
                    kind: "user".to_string(),
                    user_id: Some(user_id.to_string()),
                }),
                message: Some(message),
                timestamp: chrono::Utc::now().timestamp_millis(),
            }],
        }
    }

    pub async fn send_text(&self, event_id: &str, user_id: &str, text: &str) {
        let payload = Self::message_payload(
            event_id,
            user_id,
            EventMessage::Text {
                id: format!("m-{event_id}"),
                text: text.to_string(),
            },
        );
        self.dispatcher.handle_payload(payload).await;
    }

    pub async fn send_image(&self, event_id: &str, user_id: &str, bytes: Vec<u8>) {
        let id = format!("m-{event_id}");
        self.transport.add_content(&id, bytes).await;
        let payload = Self::message_payload(event_id, user_id, EventMessage::Image { id });
        self.dispatcher.handle_payload(payload).await;
    }

    pub async fn send_audio(&self, event_id: &str, user_id: &str, bytes: Vec<u8>) {
        let id = format!("m-{event_id}");
        self.transport.add_content(&id, bytes).await;
        let payload = Self::message_payload(event_id, user_id, EventMessage::Audio { id });
        self.dispatcher.handle_payload(payload).await;
    }
}
