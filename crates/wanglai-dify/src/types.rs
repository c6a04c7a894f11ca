// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies of the chat-messages endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub inputs: Map<String, Value>,
    pub query: String,
    pub response_mode: &'static str,
    /// Empty string starts a new conversation.
    pub conversation_id: String,
    pub user: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<RemoteFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoteFile {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub transfer_method: &'static str,
    pub url: String,
}

impl RemoteFile {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: "image",
            transfer_method: "remote_url",
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}
