// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible `audio/transcriptions` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use wanglai_config::model::TranscriptionConfig;
use wanglai_core::{AdapterType, HealthStatus, PluginAdapter, Transcriber, WanglaiError};

/// LINE delivers voice messages as m4a.
const AUDIO_FILE_NAME: &str = "audio.m4a";
const AUDIO_MIME: &str = "audio/m4a";

#[derive(Debug, Clone)]
pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    language: String,
}

impl OpenAiTranscriber {
    pub fn new(config: &TranscriptionConfig) -> Result<Self, WanglaiError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WanglaiError::Config("transcription.api_key is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| WanglaiError::Media {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for OpenAiTranscriber {
    fn name(&self) -> &str {
        "openai-transcription"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcriber
    }

    async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WanglaiError> {
        Ok(())
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, user_id: &str) -> Result<String, WanglaiError> {
        let len = audio.len();
        let file = Part::bytes(audio)
            .file_name(AUDIO_FILE_NAME)
            .mime_str(AUDIO_MIME)
            .map_err(|e| WanglaiError::Media {
                message: format!("invalid audio part: {e}"),
                source: Some(Box::new(e)),
            })?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("response_format", "text");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WanglaiError::Media {
                message: format!("transcription request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| WanglaiError::Media {
            message: format!("failed to read transcription body: {e}"),
            source: Some(Box::new(e)),
        })?;
        if !status.is_success() {
            return Err(WanglaiError::media(format!(
                "transcription API returned {status}: {body}"
            )));
        }

        let text = body.trim().to_string();
        debug!(user_id, audio_len = len, text_len = text.len(), "audio transcribed");
        Ok(text)
    }
}
