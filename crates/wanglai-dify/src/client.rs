// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking-mode client for the chat-messages API.
//!
//! Each user's conversation id lives in a [`KeyValueStore`] so the dialogue
//! continues across messages until the user sends `delete`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Map;
use tracing::{debug, info, warn};

use wanglai_config::model::BackendConfig;
use wanglai_core::{
    AdapterType, BackendInput, ConversationBackend, HealthStatus, KeyValueStore, PluginAdapter,
    WanglaiError,
};

use crate::types::{ChatRequest, ChatResponse, RemoteFile};

pub const RESET_REPLY: &str = "對話已重置，讓我們開始新的對話吧！";
pub const IMAGE_UNREACHABLE_REPLY: &str = "抱歉，無法處理您的圖片，請稍後再試。";

const RESET_COMMAND: &str = "delete";
const IMAGE_QUERY: &str = "請分析這張圖片";

fn conversation_key(user_id: &str) -> String {
    format!("conversation:{user_id}")
}

pub struct DifyClient {
    client: reqwest::Client,
    endpoint: Url,
    image_probe_timeout: Duration,
    conversations: Arc<dyn KeyValueStore>,
}

impl DifyClient {
    pub fn new(
        config: &BackendConfig,
        conversations: Arc<dyn KeyValueStore>,
    ) -> Result<Self, WanglaiError> {
        let api_url = config
            .api_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| WanglaiError::Config("backend.api_url is not set".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WanglaiError::Config("backend.api_key is not set".into()))?;

        let mut endpoint = Url::parse(api_url)
            .map_err(|e| WanglaiError::Config(format!("invalid backend.api_url: {e}")))?;
        if let Some(app_id) = config.app_id.as_deref().filter(|id| !id.is_empty()) {
            endpoint.query_pairs_mut().append_pair("app_id", app_id);
        }

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| WanglaiError::Config(format!("invalid API key header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WanglaiError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            image_probe_timeout: Duration::from_secs(config.image_probe_timeout_secs),
            conversations,
        })
    }

    /// HEAD probe; anything but a 2xx within the probe timeout counts as
    /// unreachable.
    async fn is_reachable(&self, url: &str) -> bool {
        match self
            .client
            .head(url)
            .timeout(self.image_probe_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, url, "image URL probe failed");
                false
            }
        }
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse, WanglaiError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| WanglaiError::Backend {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, user = %request.user, "backend response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WanglaiError::backend(format!("API returned {status}: {body}")));
        }

        response.json().await.map_err(|e| WanglaiError::Backend {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl PluginAdapter for DifyClient {
    fn name(&self) -> &str {
        "dify"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WanglaiError> {
        Ok(())
    }
}

#[async_trait]
impl ConversationBackend for DifyClient {
    async fn send(&self, input: BackendInput, user_id: &str) -> Result<String, WanglaiError> {
        let key = conversation_key(user_id);

        let (query, files) = match input {
            BackendInput::Text(text) => {
                if text.trim().eq_ignore_ascii_case(RESET_COMMAND) {
                    self.conversations.delete(&key).await?;
                    info!(user_id, "conversation reset");
                    return Ok(RESET_REPLY.to_string());
                }
                (format!("{text} user_id: {user_id}"), Vec::new())
            }
            BackendInput::ImageUrl(url) => {
                if !self.is_reachable(&url).await {
                    return Ok(IMAGE_UNREACHABLE_REPLY.to_string());
                }
                (
                    format!("{IMAGE_QUERY} user_id: {user_id}"),
                    vec![RemoteFile::image(url)],
                )
            }
        };

        let known = self.conversations.get(&key).await?;
        let request = ChatRequest {
            inputs: Map::new(),
            query,
            response_mode: "blocking",
            conversation_id: known.clone().unwrap_or_default(),
            user: user_id.to_string(),
            files,
        };

        let response = self.post(&request).await?;

        if known.is_none() {
            if let Some(id) = response.conversation_id.filter(|id| !id.is_empty()) {
                self.conversations.set(&key, id.clone(), None).await?;
                info!(user_id, conversation_id = %id, "new conversation created");
            }
        }

        response
            .answer
            .ok_or_else(|| WanglaiError::backend("response carried no answer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wanglai_core::MemoryStore;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> BackendConfig {
        BackendConfig {
            api_url: Some(format!("{}/v1/chat-messages", server.uri())),
            api_key: Some("app-key".into()),
            app_id: Some("app-1".into()),
            ..Default::default()
        }
    }

    fn client(server: &MockServer) -> (DifyClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = DifyClient::new(&config(server), store.clone()).unwrap();
        (client, store)
    }

    #[tokio::test]
    async fn text_query_stores_new_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat-messages"))
            .and(query_param("app_id", "app-1"))
            .and(header("authorization", "Bearer app-key"))
            .and(body_partial_json(json!({
                "query": "午餐 120 user_id: U1",
                "response_mode": "blocking",
                "conversation_id": "",
                "user": "U1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "已記錄",
                "conversation_id": "conv-9"
            })))
            .mount(&server)
            .await;

        let (client, store) = client(&server);
        let answer = client
            .send(BackendInput::Text("午餐 120".into()), "U1")
            .await
            .unwrap();
        assert_eq!(answer, "已記錄");
        assert_eq!(
            store.get("conversation:U1").await.unwrap().as_deref(),
            Some("conv-9")
        );
    }

    #[tokio::test]
    async fn known_conversation_is_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"conversation_id": "conv-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "好的",
                "conversation_id": "conv-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = client(&server);
        store.set("conversation:U1", "conv-1".into(), None).await.unwrap();
        client.send(BackendInput::Text("hi".into()), "U1").await.unwrap();
    }

    #[tokio::test]
    async fn delete_resets_without_calling_api() {
        let server = MockServer::start().await;
        let (client, store) = client(&server);
        store.set("conversation:U1", "conv-1".into(), None).await.unwrap();

        let answer = client
            .send(BackendInput::Text("  DELETE ".into()), "U1")
            .await
            .unwrap();
        assert_eq!(answer, RESET_REPLY);
        assert_eq!(store.get("conversation:U1").await.unwrap(), None);
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn unreachable_image_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let answer = client
            .send(BackendInput::ImageUrl(format!("{}/img.jpg", server.uri())), "U1")
            .await
            .unwrap();
        assert_eq!(answer, IMAGE_UNREACHABLE_REPLY);
    }

    #[tokio::test]
    async fn reachable_image_sent_as_remote_file() {
        let server = MockServer::start().await;
        let image_url = format!("{}/img.jpg", server.uri());
        Mock::given(method("HEAD"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat-messages"))
            .and(body_partial_json(json!({
                "query": "請分析這張圖片 user_id: U1",
                "files": [{"type": "image", "transfer_method": "remote_url", "url": image_url}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "收據"})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let answer = client
            .send(BackendInput::ImageUrl(image_url.clone()), "U1")
            .await
            .unwrap();
        assert_eq!(answer, "收據");
    }

    #[tokio::test]
    async fn server_error_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (client, _) = client(&server);
        let err = client
            .send(BackendInput::Text("hi".into()), "U1")
            .await
            .unwrap_err();
        assert!(matches!(err, WanglaiError::Backend { .. }));
    }

    #[test]
    fn missing_url_is_config_error() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        assert!(matches!(
            DifyClient::new(&BackendConfig::default(), store),
            Err(WanglaiError::Config(_))
        ));
    }
}
