// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wanglai bookkeeping bot.
//!
//! This crate provides the collaborator trait definitions, the error type,
//! and the domain types shared by the reply pipeline, the dispatch loop, and
//! every I/O adapter.

pub mod error;
pub mod kv;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WanglaiError;
pub use kv::MemoryStore;
pub use types::{
    AdapterType, AnalysisItem, BackendInput, BackendReply, CategoryLists, DateRange,
    HealthStatus, QuickAction, RecordId, ReplySegment, SegmentBody, Sender, SummaryDataset,
    TransactionRecord, TransactionType,
};

pub use traits::{
    AssetHost, ChatTransport, ConversationBackend, KeyValueStore, MAX_SEGMENTS_PER_CALL,
    PluginAdapter, Transcriber, TransactionStore, WebhookVerifier,
};
