// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Wanglai bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use wanglai_core::QuickAction;

/// Top-level Wanglai configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. Every section is optional and defaults to sensible values, but
/// `serve` additionally requires the platform and backend secrets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WanglaiConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE Messaging API credentials and endpoints.
    #[serde(default)]
    pub line: LineConfig,

    /// Conversational backend (Dify) settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Speech-to-text settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Image hosting (Cloudinary) settings.
    #[serde(default)]
    pub asset: AssetConfig,

    /// Ledger database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reply assembly settings.
    #[serde(default)]
    pub reply: ReplyConfig,

    /// Admin push-mode settings.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Webhook event dedup settings.
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Summary calendar settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Recurring-transaction scheduler settings.
    #[serde(default)]
    pub recurring: RecurringConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Path the chat platform posts webhook events to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

/// LINE Messaging API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    /// Channel secret used for webhook signature verification.
    #[serde(default)]
    pub channel_secret: Option<String>,

    /// Long-lived channel access token.
    #[serde(default)]
    pub channel_access_token: Option<String>,

    #[serde(default = "default_line_api_base")]
    pub api_base: String,

    /// Host serving message content downloads.
    #[serde(default = "default_line_data_api_base")]
    pub data_api_base: String,

    /// Seconds the loading indicator stays visible.
    #[serde(default = "default_loading_seconds")]
    pub loading_seconds: u32,

    #[serde(default = "default_line_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            channel_access_token: None,
            api_base: default_line_api_base(),
            data_api_base: default_line_data_api_base(),
            loading_seconds: default_loading_seconds(),
            timeout_secs: default_line_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field(
                "channel_secret",
                &self.channel_secret.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "channel_access_token",
                &self.channel_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("api_base", &self.api_base)
            .field("data_api_base", &self.data_api_base)
            .field("loading_seconds", &self.loading_seconds)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

fn default_line_data_api_base() -> String {
    "https://api-data.line.me".to_string()
}

fn default_loading_seconds() -> u32 {
    30
}

fn default_line_timeout_secs() -> u64 {
    30
}

/// Conversational backend configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Full URL of the chat-messages endpoint.
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Appended as `?app_id=` when set.
    #[serde(default)]
    pub app_id: Option<String>,

    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for the HEAD probe run on image URLs before forwarding them.
    #[serde(default = "default_image_probe_timeout_secs")]
    pub image_probe_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            app_id: None,
            timeout_secs: default_backend_timeout_secs(),
            image_probe_timeout_secs: default_image_probe_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("app_id", &self.app_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("image_probe_timeout_secs", &self.image_probe_timeout_secs)
            .finish()
    }
}

fn default_backend_timeout_secs() -> u64 {
    60
}

fn default_image_probe_timeout_secs() -> u64 {
    5
}

/// Speech-to-text configuration (OpenAI-compatible API).
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    #[serde(default = "default_transcription_api_base")]
    pub api_base: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_transcription_model")]
    pub model: String,

    /// ISO-639-1 language hint.
    #[serde(default = "default_transcription_language")]
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_base: default_transcription_api_base(),
            api_key: None,
            model: default_transcription_model(),
            language: default_transcription_language(),
        }
    }
}

impl std::fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

fn default_transcription_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_transcription_model() -> String {
    "gpt-4o-transcribe".to_string()
}

fn default_transcription_language() -> String {
    "zh".to_string()
}

/// Image hosting configuration (Cloudinary signed uploads).
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub api_secret: Option<String>,

    #[serde(default = "default_asset_folder")]
    pub folder: String,

    #[serde(default = "default_asset_api_base")]
    pub api_base: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            folder: default_asset_folder(),
            api_base: default_asset_api_base(),
        }
    }
}

impl std::fmt::Debug for AssetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[redacted]"))
            .field("folder", &self.folder)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_asset_folder() -> String {
    "line-bot-uploads".to_string()
}

fn default_asset_api_base() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

/// Ledger database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("wanglai").join("wanglai.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("wanglai.db"))
        .to_string_lossy()
        .into_owned()
}

/// Reply assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyConfig {
    /// LIFF app id used by the edit-record link on record cards.
    #[serde(default)]
    pub liff_id: String,

    /// Upper bound on segments in one reply (the platform allows 5).
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,

    /// Quick-action buttons attached to the last segment.
    #[serde(default = "default_quick_replies")]
    pub quick_replies: Vec<QuickAction>,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            liff_id: String::new(),
            max_segments: default_max_segments(),
            quick_replies: default_quick_replies(),
        }
    }
}

fn default_max_segments() -> usize {
    5
}

/// The detail, analysis, and profile shortcuts.
pub fn default_quick_replies() -> Vec<QuickAction> {
    [
        ("明細", "2007052419-6KyqOAoX", "v1742467030/11_jhqvhe.png"),
        ("分析", "2007052419-Br7KNJxo", "v1742467013/22_fnlufx.png"),
        ("我的", "2007052419-mWakO8RW", "v1742467019/33_s7tz7c.png"),
    ]
    .into_iter()
    .map(|(label, liff, icon)| QuickAction {
        label: label.to_string(),
        uri: format!("https://liff.line.me/{liff}"),
        image_url: format!("https://res.cloudinary.com/dt7pnivs1/image/upload/{icon}"),
    })
    .collect()
}

/// Admin push-mode configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// User allowed to toggle push mode.
    #[serde(default)]
    pub admin_user_id: Option<String>,

    /// User receiving forwarded admin messages.
    #[serde(default)]
    pub target_user_id: Option<String>,
}

/// Webhook event dedup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DedupConfig {
    /// How long a processed event id is remembered.
    #[serde(default = "default_dedup_expiry_secs")]
    pub expiry_secs: u64,

    /// Interval between sweeps of expired ids.
    #[serde(default = "default_dedup_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            expiry_secs: default_dedup_expiry_secs(),
            sweep_interval_secs: default_dedup_sweep_interval_secs(),
        }
    }
}

fn default_dedup_expiry_secs() -> u64 {
    300
}

fn default_dedup_sweep_interval_secs() -> u64 {
    60
}

/// Summary calendar configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryConfig {
    /// Fixed UTC offset for all calendar math (Asia/Taipei is +8).
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_utc_offset_hours() -> i32 {
    8
}

/// Recurring-transaction scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecurringConfig {
    #[serde(default = "default_recurring_enabled")]
    pub enabled: bool,

    /// Cron expression evaluated in the summary timezone.
    #[serde(default = "default_recurring_schedule")]
    pub schedule: String,
}

impl Default for RecurringConfig {
    fn default() -> Self {
        Self {
            enabled: default_recurring_enabled(),
            schedule: default_recurring_schedule(),
        }
    }
}

fn default_recurring_enabled() -> bool {
    true
}

fn default_recurring_schedule() -> String {
    "0 0 * * *".to_string()
}
