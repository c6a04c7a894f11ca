// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Wanglai bot.

use thiserror::Error;

/// The primary error type used across collaborator traits and I/O wrappers.
///
/// The reply pipeline itself never surfaces these to users; callers convert
/// them into apology strings at the dispatch boundary.
#[derive(Debug, Error)]
pub enum WanglaiError {
    /// Configuration errors (invalid TOML, missing secrets, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Data store errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (reply/push rejected, content download failed).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Conversational backend errors (HTTP failure, malformed answer).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transcription or asset-host errors.
    #[error("media error: {message}")]
    Media {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Webhook signature missing or invalid.
    #[error("signature error: {0}")]
    Signature(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WanglaiError {
    /// Shorthand for a channel error without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a backend error without an underlying source.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a media error without an underlying source.
    pub fn media(message: impl Into<String>) -> Self {
        Self::Media {
            message: message.into(),
            source: None,
        }
    }
}
