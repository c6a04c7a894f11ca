// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the LINE Messaging API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;
use tracing::debug;

use wanglai_config::model::LineConfig;
use wanglai_core::{
    AdapterType, ChatTransport, HealthStatus, MAX_SEGMENTS_PER_CALL, PluginAdapter, ReplySegment,
    WanglaiError,
};

use crate::message::to_messages;

/// Messaging API transport.
///
/// Reply, push, and loading calls go to `api_base`; content downloads go to
/// `data_api_base`.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: reqwest::Client,
    api_base: String,
    data_api_base: String,
    loading_seconds: u32,
}

impl LineClient {
    pub fn new(config: &LineConfig) -> Result<Self, WanglaiError> {
        let token = config
            .channel_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| WanglaiError::Config("line.channel_access_token is not set".into()))?;

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            WanglaiError::Config(format!("invalid channel access token header value: {e}"))
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WanglaiError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            data_api_base: config.data_api_base.trim_end_matches('/').to_string(),
            loading_seconds: config.loading_seconds,
        })
    }

    /// Points both API hosts at `url` (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.data_api_base = url.clone();
        self.api_base = url;
        self
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), WanglaiError> {
        let response = self
            .client
            .post(format!("{}{path}", self.api_base))
            .json(&body)
            .send()
            .await
            .map_err(|e| WanglaiError::Channel {
                message: format!("HTTP request to {path} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, path, "messaging API response");
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(WanglaiError::channel(format!("{path} returned {status}: {body}")))
    }
}

fn check_batch(segments: &[ReplySegment]) -> Result<(), WanglaiError> {
    if segments.is_empty() || segments.len() > MAX_SEGMENTS_PER_CALL {
        return Err(WanglaiError::channel(format!(
            "a call carries 1 to {MAX_SEGMENTS_PER_CALL} messages, got {}",
            segments.len()
        )));
    }
    Ok(())
}

#[async_trait]
impl PluginAdapter for LineClient {
    fn name(&self) -> &str {
        "line"
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
impl ChatTransport for LineClient {
    async fn reply(&self, reply_token: &str, segments: &[ReplySegment]) -> Result<(), WanglaiError> {
        check_batch(segments)?;
        let body = json!({
            "replyToken": reply_token,
            "messages": to_messages(segments),
        });
        self.post_json("/v2/bot/message/reply", body).await
    }

    async fn push(&self, user_id: &str, segments: &[ReplySegment]) -> Result<(), WanglaiError> {
        check_batch(segments)?;
        let body = json!({
            "to": user_id,
            "messages": to_messages(segments),
        });
        self.post_json("/v2/bot/message/push", body).await
    }

    async fn show_loading(&self, user_id: &str) -> Result<(), WanglaiError> {
        let body = json!({
            "chatId": user_id,
            "loadingSeconds": self.loading_seconds,
        });
        self.post_json("/v2/bot/chat/loading/start", body).await
    }

    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, WanglaiError> {
        let url = format!("{}/v2/bot/message/{message_id}/content", self.data_api_base);
        let response = self.client.get(&url).send().await.map_err(|e| WanglaiError::Channel {
            message: format!("content download failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WanglaiError::channel(format!(
                "content download for {message_id} returned {status}"
            )));
        }
        let bytes = response.bytes().await.map_err(|e| WanglaiError::Channel {
            message: format!("failed to read content body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(message_id, len = bytes.len(), "content downloaded");
        Ok(bytes.to_vec())
    }
}
