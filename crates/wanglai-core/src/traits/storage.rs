// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data store and key-value store traits.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::WanglaiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CategoryLists, DateRange, TransactionRecord};

/// Read access to a user's ledger.
#[async_trait]
pub trait TransactionStore: PluginAdapter {
    /// All of the user's transactions dated within `range` (inclusive).
    async fn query_transactions(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<TransactionRecord>, WanglaiError>;

    /// Category names visible to the user, split by type.
    async fn query_categories(&self, user_id: &str) -> Result<CategoryLists, WanglaiError>;
}

/// Process-lifetime cache keyed by user or event identifier.
///
/// Backs the event dedup set, the user-to-conversation map, and admin flags.
/// A shared external store can replace the in-process one for multi-instance
/// deployments.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, WanglaiError>;

    /// Stores `value`, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>)
    -> Result<(), WanglaiError>;

    /// Removes `key`, returning whether it was present.
    async fn delete(&self, key: &str) -> Result<bool, WanglaiError>;

    /// Purges expired entries, returning how many were removed.
    async fn sweep(&self) -> Result<usize, WanglaiError>;
}
