// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat transport that captures everything sent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use wanglai_core::{
    AdapterType, ChatTransport, HealthStatus, MAX_SEGMENTS_PER_CALL, PluginAdapter, ReplySegment,
    WanglaiError,
};

/// One captured outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reply {
        reply_token: String,
        segments: Vec<ReplySegment>,
    },
    Push {
        user_id: String,
        segments: Vec<ReplySegment>,
    },
}

impl Sent {
    pub fn segments(&self) -> &[ReplySegment] {
        match self {
            Self::Reply { segments, .. } | Self::Push { segments, .. } => segments,
        }
    }
}

#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<Sent>>,
    loading: Mutex<Vec<String>>,
    content: Mutex<HashMap<String, Vec<u8>>>,
    fail_replies: AtomicBool,
    fail_pushes: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `reply` call fail, as with an expired token.
    pub fn fail_replies(&self) {
        self.fail_replies.store(true, Ordering::SeqCst);
    }

    pub fn fail_pushes(&self) {
        self.fail_pushes.store(true, Ordering::SeqCst);
    }

    /// Registers downloadable content for `message_id`.
    pub async fn add_content(&self, message_id: &str, bytes: Vec<u8>) {
        self.content
            .lock()
            .await
            .insert(message_id.to_string(), bytes);
    }

    /// Successful calls, in order.
    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    /// All segments delivered, flattened across calls.
    pub async fn delivered(&self) -> Vec<ReplySegment> {
        self.sent
            .lock()
            .await
            .iter()
            .flat_map(|s| s.segments().to_vec())
            .collect()
    }

    /// Text of every delivered text segment.
    pub async fn delivered_texts(&self) -> Vec<String> {
        self.delivered()
            .await
            .iter()
            .filter_map(|s| s.as_text().map(str::to_string))
            .collect()
    }

    pub async fn loading_calls(&self) -> Vec<String> {
        self.loading.lock().await.clone()
    }
}

fn check_batch(segments: &[ReplySegment]) -> Result<(), WanglaiError> {
    if segments.is_empty() || segments.len() > MAX_SEGMENTS_PER_CALL {
        return Err(WanglaiError::channel(format!(
            "batch of {} segments",
            segments.len()
        )));
    }
    Ok(())
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WanglaiError> {
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn reply(&self, reply_token: &str, segments: &[ReplySegment]) -> Result<(), WanglaiError> {
        check_batch(segments)?;
        if self.fail_replies.load(Ordering::SeqCst) {
            return Err(WanglaiError::channel("Invalid reply token"));
        }
        self.sent.lock().await.push(Sent::Reply {
            reply_token: reply_token.to_string(),
            segments: segments.to_vec(),
        });
        Ok(())
    }

    async fn push(&self, user_id: &str, segments: &[ReplySegment]) -> Result<(), WanglaiError> {
        check_batch(segments)?;
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(WanglaiError::channel("push rejected"));
        }
        self.sent.lock().await.push(Sent::Push {
            user_id: user_id.to_string(),
            segments: segments.to_vec(),
        });
        Ok(())
    }

    async fn show_loading(&self, user_id: &str) -> Result<(), WanglaiError> {
        self.loading.lock().await.push(user_id.to_string());
        Ok(())
    }

    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, WanglaiError> {
        self.content
            .lock()
            .await
            .get(message_id)
            .cloned()
            .ok_or_else(|| WanglaiError::channel(format!("no content for {message_id}")))
    }
}
