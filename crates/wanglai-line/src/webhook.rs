// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook payload.
//!
//! Only the fields the dispatch loop reads are modelled; everything else in
//! the LINE payload is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub webhook_event_id: Option<String>,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub timestamp: i64,
}

impl WebhookEvent {
    /// Sender id when the event came from a one-to-one chat with a user.
    pub fn user_id(&self) -> Option<&str> {
        self.source
            .as_ref()
            .filter(|s| s.kind == "user")
            .and_then(|s| s.user_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text { id: String, text: String },
    Image { id: String },
    Audio { id: String },
    #[serde(other)]
    Other,
}
