// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory ledger with canned rows.

use async_trait::async_trait;
use chrono::NaiveDate;

use wanglai_core::{
    AdapterType, CategoryLists, DateRange, HealthStatus, PluginAdapter, TransactionRecord,
    TransactionStore, WanglaiError,
};

/// A [`TransactionStore`] over a fixed set of rows.
///
/// Range queries honour the record's `YYYY-MM-DD` date and ignore the user,
/// so tests can pick any user id.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    records: Vec<TransactionRecord>,
    categories: CategoryLists,
    failing: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every query fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_records(mut self, records: Vec<TransactionRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_categories(mut self, categories: CategoryLists) -> Self {
        self.categories = categories;
        self
    }

    fn check(&self) -> Result<(), WanglaiError> {
        if self.failing {
            return Err(WanglaiError::Storage {
                source: "mock store is offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WanglaiError> {
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MockStore {
    async fn query_transactions(
        &self,
        _user_id: &str,
        range: DateRange,
    ) -> Result<Vec<TransactionRecord>, WanglaiError> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .filter(|r| {
                r.datetime
                    .get(..10)
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                    .is_some_and(|d| range.contains(d))
            })
            .cloned()
            .collect())
    }

    async fn query_categories(&self, _user_id: &str) -> Result<CategoryLists, WanglaiError> {
        self.check()?;
        Ok(self.categories.clone())
    }
}
