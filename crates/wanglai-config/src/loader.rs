// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./wanglai.toml` > `~/.config/wanglai/wanglai.toml` > `/etc/wanglai/wanglai.toml`
//! with environment variable overrides via `WANGLAI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::WanglaiConfig;

/// Config sections addressable from the environment.
const ENV_SECTIONS: &[&str] = &[
    "server",
    "line",
    "backend",
    "transcription",
    "asset",
    "storage",
    "reply",
    "admin",
    "dedup",
    "summary",
    "recurring",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/wanglai/wanglai.toml` (system-wide)
/// 3. `~/.config/wanglai/wanglai.toml` (user XDG config)
/// 4. `./wanglai.toml` (local directory)
/// 5. `WANGLAI_*` environment variables
pub fn load_config() -> Result<WanglaiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<WanglaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WanglaiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WanglaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WanglaiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(WanglaiConfig::default()))
        .merge(Toml::file("/etc/wanglai/wanglai.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("wanglai/wanglai.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("wanglai.toml"))
        .merge(env_provider())
}

/// Map a prefix-stripped, lowercased env key onto its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `line_channel_access_token` maps to `line.channel_access_token`.
pub fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: key names contain
/// underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("WANGLAI_").map(|key| env_key_to_path(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_first_underscore_only() {
        assert_eq!(
            env_key_to_path("line_channel_access_token"),
            "line.channel_access_token"
        );
        assert_eq!(env_key_to_path("admin_admin_user_id"), "admin.admin_user_id");
        assert_eq!(env_key_to_path("server_port"), "server.port");
        assert_eq!(env_key_to_path("unknown_key"), "unknown_key");
    }
}
