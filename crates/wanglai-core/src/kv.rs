// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process [`KeyValueStore`] backed by a concurrent map with TTL eviction.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::error::WanglaiError;
use crate::traits::KeyValueStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Single-process key-value store.
///
/// Expired entries are invisible to `get` immediately and physically removed
/// by `sweep`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, WanglaiError> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), WanglaiError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, WanglaiError> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn sweep(&self) -> Result<usize, WanglaiError> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before.saturating_sub(self.entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryStore::new();
        store.set("conv:u1", "c-123".into(), None).await.unwrap();
        assert_eq!(store.get("conv:u1").await.unwrap().as_deref(), Some("c-123"));
        assert!(store.delete("conv:u1").await.unwrap());
        assert!(!store.delete("conv:u1").await.unwrap());
        assert_eq!(store.get("conv:u1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_hidden_then_swept() {
        let store = MemoryStore::new();
        store
            .set("event:a", "1".into(), Some(Duration::from_secs(300)))
            .await
            .unwrap();
        store.set("keep", "1".into(), None).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(store.get("event:a").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get("event:a").await.unwrap().is_none());
        assert_eq!(store.len(), 2);

        assert_eq!(store.sweep().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("keep").await.unwrap().is_some());
    }
}
