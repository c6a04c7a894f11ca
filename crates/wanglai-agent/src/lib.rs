// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch loop for the Wanglai bookkeeping bot.
//!
//! The [`Dispatcher`] takes verified webhook payloads and, for each message
//! event:
//! - skips event ids already handled within the dedup window
//! - shows the loading indicator
//! - routes admin commands, text, images, and audio to their collaborators
//! - assembles the backend reply into segments and sends them back

pub mod admin;
pub mod dedup;
pub mod shutdown;
pub mod transmit;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use wanglai_config::model::WanglaiConfig;
use wanglai_core::{
    AssetHost, BackendInput, BackendReply, ChatTransport, ConversationBackend, KeyValueStore,
    SegmentBody, Sender, Transcriber, TransactionStore, WanglaiError,
};
use wanglai_line::{EventMessage, WebhookEvent, WebhookPayload};
use wanglai_reply::ReplyAssembler;

use crate::admin::AdminCommands;
use crate::dedup::EventDedup;

pub const BACKEND_UNAVAILABLE: &str = "抱歉，我現在無法回應，請稍後再試。";
pub const IMAGE_FAILED: &str = "抱歉，處理圖片時發生錯誤";
pub const AUDIO_UNRECOGNIZED: &str = "抱歉，無法識別您的語音訊息，請再試一次。";
pub const AUDIO_FAILED: &str = "抱歉，處理語音訊息時發生錯誤";

/// Text that switches the reply's text bubbles to the Cony persona.
pub const CONY_TRIGGER: &str = "Cony";
pub const CONY_NAME: &str = "Cony";
pub const CONY_ICON_URL: &str = "https://gcp-obs.line-scdn.net/0hERW2_cUbGn1qSwoc-HdlKlMdFgxZLw97BDMBHEYfTUxHKUEjVHhWB0pMQUpbKw58UzEFGk5OQkRFe1p4VS8";

/// Content type LINE serves image messages as.
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Collaborators the dispatcher drives.
///
/// Transcription and image hosting are optional; without them audio and
/// image messages get the matching failure reply.
pub struct Collaborators {
    pub transport: Arc<dyn ChatTransport>,
    pub backend: Arc<dyn ConversationBackend>,
    pub store: Arc<dyn TransactionStore>,
    pub state: Arc<dyn KeyValueStore>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub assets: Option<Arc<dyn AssetHost>>,
}

pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    backend: Arc<dyn ConversationBackend>,
    transcriber: Option<Arc<dyn Transcriber>>,
    assets: Option<Arc<dyn AssetHost>>,
    assembler: ReplyAssembler,
    admin: AdminCommands,
    dedup: EventDedup,
}

impl Dispatcher {
    pub fn new(parts: Collaborators, config: &WanglaiConfig) -> Self {
        let assembler = ReplyAssembler::new(
            &config.reply,
            parts.store,
            config.summary.utc_offset_hours,
        );
        let admin = AdminCommands::new(&config.admin, parts.state.clone(), parts.transport.clone());
        let dedup = EventDedup::new(parts.state, Duration::from_secs(config.dedup.expiry_secs));

        info!(
            transcription = parts.transcriber.is_some(),
            image_hosting = parts.assets.is_some(),
            "dispatcher initialized"
        );

        Self {
            transport: parts.transport,
            backend: parts.backend,
            transcriber: parts.transcriber,
            assets: parts.assets,
            assembler,
            admin,
            dedup,
        }
    }

    /// Consumes queued payloads one at a time until `cancel` fires or every
    /// sender is gone.
    pub async fn run(&self, mut inbound: mpsc::Receiver<WebhookPayload>, cancel: CancellationToken) {
        info!("dispatch worker running");
        loop {
            tokio::select! {
                payload = inbound.recv() => match payload {
                    Some(payload) => self.handle_payload(payload).await,
                    None => {
                        info!("webhook queue closed, stopping dispatch worker");
                        break;
                    }
                },
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dispatch worker");
                    break;
                }
            }
        }
    }

    /// Handles the payload's events in order.
    pub async fn handle_payload(&self, payload: WebhookPayload) {
        for event in payload.events {
            let event_id = event.webhook_event_id.clone();
            if let Some(id) = event_id.as_deref() {
                if self.dedup.seen(id).await {
                    debug!(event_id = id, "skipping duplicate event");
                    continue;
                }
            }

            self.handle_event(event).await;

            if let Some(id) = event_id.as_deref() {
                self.dedup.record(id).await;
            }
        }
    }

    async fn handle_event(&self, event: WebhookEvent) {
        if event.kind != "message" {
            debug!(kind = %event.kind, "ignoring non-message event");
            return;
        }
        let Some(user_id) = event.user_id().map(str::to_string) else {
            debug!("ignoring message without a user source");
            return;
        };
        let Some(message) = event.message else {
            return;
        };

        if let Err(e) = self.transport.show_loading(&user_id).await {
            debug!(error = %e, user_id = %user_id, "loading indicator failed");
        }

        let (reply, persona) = match message {
            EventMessage::Text { text, .. } => self.handle_text(&user_id, text).await,
            EventMessage::Image { id } => (self.handle_image(&user_id, &id).await, None),
            EventMessage::Audio { id } => (self.handle_audio(&user_id, &id).await, None),
            EventMessage::Other => {
                debug!(user_id = %user_id, "ignoring unsupported message type");
                return;
            }
        };

        let mut segments = self.assembler.assemble(&reply, &user_id).await;
        if let Some(sender) = persona {
            for segment in &mut segments {
                if matches!(segment.body, SegmentBody::Text(_)) {
                    segment.sender = Some(sender.clone());
                }
            }
        }
        if segments.is_empty() {
            debug!(user_id = %user_id, "nothing to send");
            return;
        }
        transmit::transmit(
            self.transport.as_ref(),
            event.reply_token.as_deref(),
            &user_id,
            &segments,
        )
        .await;
    }

    async fn ask_backend(&self, input: BackendInput, user_id: &str) -> String {
        match self.backend.send(input, user_id).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, user_id, "backend call failed");
                BACKEND_UNAVAILABLE.to_string()
            }
        }
    }

    /// Admin commands first, then the backend. Backend-bound text mentioning
    /// Cony also picks the persona its text replies are sent under.
    async fn handle_text(&self, user_id: &str, text: String) -> (BackendReply, Option<Sender>) {
        if let Some(reply) = self.admin.handle(user_id, &text).await {
            return (BackendReply::PlainText(reply.to_string()), None);
        }
        let persona = text.contains(CONY_TRIGGER).then(cony_sender);
        let answer = self.ask_backend(BackendInput::Text(text), user_id).await;
        (BackendReply::PlainText(answer), persona)
    }

    async fn handle_image(&self, user_id: &str, message_id: &str) -> BackendReply {
        let Some(assets) = &self.assets else {
            warn!(user_id, "image received but no asset host is configured");
            return BackendReply::PlainText(IMAGE_FAILED.to_string());
        };
        match self.host_image(assets.as_ref(), message_id).await {
            Ok(url) => {
                BackendReply::PlainText(self.ask_backend(BackendInput::ImageUrl(url), user_id).await)
            }
            Err(e) => {
                error!(error = %e, user_id, "image pipeline failed");
                BackendReply::PlainText(IMAGE_FAILED.to_string())
            }
        }
    }

    async fn host_image(
        &self,
        assets: &dyn AssetHost,
        message_id: &str,
    ) -> Result<String, WanglaiError> {
        let bytes = self.transport.fetch_content(message_id).await?;
        assets.upload(bytes, IMAGE_CONTENT_TYPE).await
    }

    async fn transcribe(
        &self,
        transcriber: &dyn Transcriber,
        user_id: &str,
        message_id: &str,
    ) -> Result<String, WanglaiError> {
        let bytes = self.transport.fetch_content(message_id).await?;
        transcriber.transcribe(bytes, user_id).await
    }

    async fn handle_audio(&self, user_id: &str, message_id: &str) -> BackendReply {
        let Some(transcriber) = &self.transcriber else {
            warn!(user_id, "audio received but no transcriber is configured");
            return BackendReply::PlainText(AUDIO_FAILED.to_string());
        };
        match self.transcribe(transcriber.as_ref(), user_id, message_id).await {
            Ok(text) if text.trim().is_empty() => {
                BackendReply::PlainText(AUDIO_UNRECOGNIZED.to_string())
            }
            Ok(text) => {
                let answer = self.ask_backend(BackendInput::Text(text.clone()), user_id).await;
                BackendReply::Structured {
                    text: answer,
                    transcript: Some(text),
                }
            }
            Err(e) => {
                error!(error = %e, user_id, "audio pipeline failed");
                BackendReply::PlainText(AUDIO_FAILED.to_string())
            }
        }
    }
}

fn cony_sender() -> Sender {
    Sender {
        name: CONY_NAME.to_string(),
        icon_url: CONY_ICON_URL.to_string(),
    }
}
