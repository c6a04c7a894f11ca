// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod backend;
pub mod channel;
pub mod storage;

pub use adapter::PluginAdapter;
pub use backend::{AssetHost, ConversationBackend, Transcriber};
pub use channel::{ChatTransport, MAX_SEGMENTS_PER_CALL, WebhookVerifier};
pub use storage::{KeyValueStore, TransactionStore};
