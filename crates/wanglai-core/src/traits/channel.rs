// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform transport and webhook verification.

use async_trait::async_trait;

use crate::error::WanglaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ReplySegment;

/// Hard per-call limit on segments imposed by the chat platform.
pub const MAX_SEGMENTS_PER_CALL: usize = 5;

/// Outbound side of the chat platform.
///
/// `reply` and `push` accept at most [`MAX_SEGMENTS_PER_CALL`] segments;
/// callers with more must chunk.
#[async_trait]
pub trait ChatTransport: PluginAdapter {
    /// Answers an inbound event using its one-shot reply token.
    async fn reply(&self, reply_token: &str, segments: &[ReplySegment])
    -> Result<(), WanglaiError>;

    /// Sends segments to a user outside of a reply context.
    async fn push(&self, user_id: &str, segments: &[ReplySegment]) -> Result<(), WanglaiError>;

    /// Shows the typing/loading indicator in the user's chat.
    async fn show_loading(&self, user_id: &str) -> Result<(), WanglaiError>;

    /// Downloads the binary content (image, audio) attached to a message.
    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, WanglaiError>;
}

/// Shared-secret check gating webhook entry.
pub trait WebhookVerifier: Send + Sync {
    /// Returns `true` when `signature` authenticates `body`.
    fn verify(&self, body: &[u8], signature: &str) -> bool;
}
