// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational backend, transcription, and asset-host collaborators.

use async_trait::async_trait;

use crate::error::WanglaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::BackendInput;

/// The conversational AI that turns user input into a reply string.
///
/// Implementations may answer some inputs locally (e.g. a conversation reset)
/// without contacting the remote service.
#[async_trait]
pub trait ConversationBackend: PluginAdapter {
    async fn send(&self, input: BackendInput, user_id: &str) -> Result<String, WanglaiError>;
}

/// Speech-to-text service.
#[async_trait]
pub trait Transcriber: PluginAdapter {
    async fn transcribe(&self, audio: Vec<u8>, user_id: &str) -> Result<String, WanglaiError>;
}

/// Public hosting for uploaded images.
#[async_trait]
pub trait AssetHost: PluginAdapter {
    /// Uploads `bytes` and returns a publicly reachable URL.
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, WanglaiError>;
}
