// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed Cloudinary uploads.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::multipart::Form;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::info;

use wanglai_config::model::AssetConfig;
use wanglai_core::{AdapterType, AssetHost, HealthStatus, PluginAdapter, WanglaiError};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

impl CloudinaryHost {
    pub fn new(config: &AssetConfig) -> Result<Self, WanglaiError> {
        let required = |value: &Option<String>, field: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| WanglaiError::Config(format!("asset.{field} is not set")))
        };
        let cloud_name = required(&config.cloud_name, "cloud_name")?;
        let api_key = required(&config.api_key, "api_key")?;
        let api_secret = required(&config.api_secret, "api_secret")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| WanglaiError::Media {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            upload_url: format!(
                "{}/{cloud_name}/image/upload",
                config.api_base.trim_end_matches('/')
            ),
            api_key,
            api_secret,
            folder: config.folder.clone(),
        })
    }
}

/// Upload signature: parameters sorted by name, `&`-joined, secret appended,
/// SHA-1 hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl PluginAdapter for CloudinaryHost {
    fn name(&self) -> &str {
        "cloudinary"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AssetHost
    }

    async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WanglaiError> {
        Ok(())
    }
}

#[async_trait]
impl AssetHost for CloudinaryHost {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> Result<String, WanglaiError> {
        let now = chrono::Utc::now();
        let public_id = format!("line_image_{}", now.timestamp_millis());
        let timestamp = now.timestamp().to_string();
        let signature = sign(
            &[
                ("folder", self.folder.as_str()),
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.api_secret,
        );
        let data_uri = format!("data:{content_type};base64,{}", STANDARD.encode(&bytes));

        let form = Form::new()
            .text("file", data_uri)
            .text("folder", self.folder.clone())
            .text("public_id", public_id.clone())
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WanglaiError::Media {
                message: format!("upload request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WanglaiError::media(format!("upload returned {status}: {body}")));
        }
        let uploaded: UploadResponse = response.json().await.map_err(|e| WanglaiError::Media {
            message: format!("failed to parse upload response: {e}"),
            source: Some(Box::new(e)),
        })?;
        info!(%public_id, url = %uploaded.secure_url, "image uploaded");
        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn signature_matches_known_digest() {
        // sha1("folder=f&public_id=p&timestamp=1s")
        let sig = sign(&[("timestamp", "1"), ("folder", "f"), ("public_id", "p")], "s");
        let mut hasher = Sha1::new();
        hasher.update(b"folder=f&public_id=p&timestamp=1s");
        assert_eq!(sig, hex::encode(hasher.finalize()));
        assert_eq!(sig.len(), 40);
    }

    #[test]
    fn missing_credentials_rejected() {
        assert!(matches!(
            CloudinaryHost::new(&AssetConfig::default()),
            Err(WanglaiError::Config(_))
        ));
    }

    #[tokio::test]
    async fn upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://res.cloudinary.com/demo/image/upload/line_image_1.jpg"
            })))
            .mount(&server)
            .await;

        let host = CloudinaryHost::new(&AssetConfig {
            cloud_name: Some("demo".into()),
            api_key: Some("key".into()),
            api_secret: Some("secret".into()),
            api_base: server.uri(),
            ..Default::default()
        })
        .unwrap();
        let url = host.upload(vec![0xFF, 0xD8], "image/jpeg").await.unwrap();
        assert!(url.ends_with("line_image_1.jpg"));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("data:image/jpeg;base64,/9g="));
        assert!(body.contains("line-bot-uploads"));
        assert!(body.contains("name=\"signature\""));
    }
}
