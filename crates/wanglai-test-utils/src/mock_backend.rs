// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators for the backend, transcription, and image hosting.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use wanglai_core::{
    AdapterType, AssetHost, BackendInput, ConversationBackend, HealthStatus, PluginAdapter,
    Transcriber, WanglaiError,
};

macro_rules! mock_adapter {
    ($ty:ty, $name:literal, $kind:expr) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $kind
            }

            async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), WanglaiError> {
                Ok(())
            }
        }
    };
}

/// Backend that answers from a queue of canned replies.
///
/// Once the queue is drained the last reply repeats; a backend built with
/// [`MockBackend::failing`] errors on every call.
pub struct MockBackend {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    failing: bool,
    calls: Arc<Mutex<Vec<(BackendInput, String)>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_replies(vec![reply.into()])
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(String::new()),
            failing: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Every `(input, user_id)` the backend was asked.
    pub async fn calls(&self) -> Vec<(BackendInput, String)> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

mock_adapter!(MockBackend, "mock-backend", AdapterType::Backend);

#[async_trait]
impl ConversationBackend for MockBackend {
    async fn send(&self, input: BackendInput, user_id: &str) -> Result<String, WanglaiError> {
        self.calls.lock().await.push((input, user_id.to_string()));
        if self.failing {
            return Err(WanglaiError::backend("mock backend failure"));
        }
        let mut last = self.last.lock().await;
        if let Some(next) = self.replies.lock().await.pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }
}

/// Transcriber returning a fixed transcript.
pub struct MockTranscriber {
    result: Result<String, String>,
}

impl MockTranscriber {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err("mock transcription failure".into()),
        }
    }
}

mock_adapter!(MockTranscriber, "mock-transcriber", AdapterType::Transcriber);

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _user_id: &str) -> Result<String, WanglaiError> {
        self.result.clone().map_err(WanglaiError::media)
    }
}

/// Asset host returning a fixed URL and counting uploads.
pub struct MockAssetHost {
    result: Result<String, String>,
    uploads: Mutex<usize>,
}

impl MockAssetHost {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            result: Ok(url.into()),
            uploads: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err("mock upload failure".into()),
            uploads: Mutex::new(0),
        }
    }

    pub async fn upload_count(&self) -> usize {
        *self.uploads.lock().await
    }
}

mock_adapter!(MockAssetHost, "mock-asset-host", AdapterType::AssetHost);

#[async_trait]
impl AssetHost for MockAssetHost {
    async fn upload(&self, _bytes: Vec<u8>, _content_type: &str) -> Result<String, WanglaiError> {
        *self.uploads.lock().await += 1;
        self.result.clone().map_err(WanglaiError::media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn backend_repeats_last_reply_and_records_calls() {
        let backend = MockBackend::with_replies(vec!["a".into(), "b".into()]);
        assert_eq!(backend.send(BackendInput::Text("1".into()), "U").await.unwrap(), "a");
        assert_eq!(backend.send(BackendInput::Text("2".into()), "U").await.unwrap(), "b");
        assert_eq!(backend.send(BackendInput::Text("3".into()), "U").await.unwrap(), "b");
        assert_eq!(backend.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn failing_mocks_error() {
        assert!(MockBackend::failing().send(BackendInput::Text("x".into()), "U").await.is_err());
        assert!(MockTranscriber::failing().transcribe(vec![], "U").await.is_err());
        let host = MockAssetHost::failing();
        assert!(host.upload(vec![], "image/jpeg").await.is_err());
        assert_eq!(host.upload_count().await, 1);
    }
}
