// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. Every check
//! runs; errors are collected rather than failing fast.

use std::str::FromStr;

use crate::diagnostic::ConfigError;
use crate::model::WanglaiConfig;

/// Platform limit on messages in one reply call.
const PLATFORM_SEGMENT_LIMIT: usize = 5;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &WanglaiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if config.server.host.trim().is_empty() {
        invalid("server.host must not be empty".to_string());
    }

    if config.server.port == 0 {
        invalid("server.port must be between 1 and 65535".to_string());
    }

    if !config.server.webhook_path.starts_with('/') {
        invalid(format!(
            "server.webhook_path `{}` must start with `/`",
            config.server.webhook_path
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    if !(1..=PLATFORM_SEGMENT_LIMIT).contains(&config.reply.max_segments) {
        invalid(format!(
            "reply.max_segments must be between 1 and {PLATFORM_SEGMENT_LIMIT}, got {}",
            config.reply.max_segments
        ));
    }

    for (i, action) in config.reply.quick_replies.iter().enumerate() {
        if action.label.trim().is_empty() {
            invalid(format!("reply.quick_replies[{i}].label must not be empty"));
        }
        if !action.uri.starts_with("https://") {
            invalid(format!(
                "reply.quick_replies[{i}].uri `{}` must be an https URL",
                action.uri
            ));
        }
    }

    if !(-12..=14).contains(&config.summary.utc_offset_hours) {
        invalid(format!(
            "summary.utc_offset_hours must be between -12 and 14, got {}",
            config.summary.utc_offset_hours
        ));
    }

    if config.dedup.expiry_secs == 0 {
        invalid("dedup.expiry_secs must be positive".to_string());
    }

    if config.dedup.sweep_interval_secs == 0 {
        invalid("dedup.sweep_interval_secs must be positive".to_string());
    }

    if let Err(e) = croner::Cron::from_str(&config.recurring.schedule) {
        invalid(format!(
            "recurring.schedule `{}` is not a valid cron expression: {e}",
            config.recurring.schedule
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that every credential `serve` needs is present and non-blank.
pub fn validate_serving_secrets(config: &WanglaiConfig) -> Result<(), Vec<ConfigError>> {
    let required = [
        ("line.channel_secret", &config.line.channel_secret),
        ("line.channel_access_token", &config.line.channel_access_token),
        ("backend.api_url", &config.backend.api_url),
        ("backend.api_key", &config.backend.api_key),
    ];

    let errors: Vec<ConfigError> = required
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(key, _)| ConfigError::MissingKey {
            key: key.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_validation(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&WanglaiConfig::default()).is_ok());
    }

    #[test]
    fn max_segments_above_platform_limit_fails() {
        let mut config = WanglaiConfig::default();
        config.reply.max_segments = 6;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "max_segments"));
    }

    #[test]
    fn bad_cron_schedule_fails() {
        let mut config = WanglaiConfig::default();
        config.recurring.schedule = "every day".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "recurring.schedule"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = WanglaiConfig::default();
        config.server.port = 0;
        config.summary.utc_offset_hours = 20;
        config.storage.database_path = " ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn serving_requires_all_secrets() {
        let mut config = WanglaiConfig::default();
        config.line.channel_secret = Some("s".into());
        config.backend.api_key = Some("  ".into());
        let errors = validate_serving_secrets(&config).unwrap_err();
        let keys: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::MissingKey { key } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                "line.channel_access_token",
                "backend.api_url",
                "backend.api_key"
            ]
        );
    }
}
