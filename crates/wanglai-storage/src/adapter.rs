// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TransactionStore trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use wanglai_config::model::StorageConfig;
use wanglai_core::{
    AdapterType, CategoryLists, DateRange, HealthStatus, PluginAdapter, TransactionRecord,
    TransactionStore, TransactionType, WanglaiError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed ledger.
///
/// The database is opened by [`SqliteStorage::initialize`]; every other call
/// fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, WanglaiError> {
        self.db.get().ok_or_else(|| WanglaiError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    pub async fn initialize(&self) -> Result<(), WanglaiError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| WanglaiError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    pub async fn insert_transaction(
        &self,
        user_id: &str,
        record: &TransactionRecord,
    ) -> Result<i64, WanglaiError> {
        queries::transactions::insert_transaction(self.db()?, user_id, record).await
    }

    pub async fn insert_category(
        &self,
        user_id: Option<&str>,
        name: &str,
        kind: TransactionType,
    ) -> Result<(), WanglaiError> {
        queries::categories::insert_category(self.db()?, user_id, name, kind).await
    }

    pub async fn hide_system_category(&self, user_id: &str, name: &str) -> Result<(), WanglaiError> {
        queries::categories::hide_system_category(self.db()?, user_id, name).await
    }

    /// Materializes the day's recurring entries, returning how many were added.
    pub async fn generate_daily_recurring(&self, date: NaiveDate) -> Result<usize, WanglaiError> {
        let inserted = queries::transactions::generate_daily_recurring(self.db()?, date).await?;
        info!(%date, inserted, "recurring transactions generated");
        Ok(inserted)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, WanglaiError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), WanglaiError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for SqliteStorage {
    async fn query_transactions(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<TransactionRecord>, WanglaiError> {
        queries::transactions::query_transactions(self.db()?, user_id, range).await
    }

    async fn query_categories(&self, user_id: &str) -> Result<CategoryLists, WanglaiError> {
        queries::categories::query_categories(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    #[tokio::test]
    async fn reports_identity() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn calls_fail_before_initialize() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert!(storage.health_check().await.is_err());
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(
            storage
                .query_transactions("U1", DateRange::new(today, today))
                .await
                .is_err()
        );
        // Shutdown of a never-opened store is a no-op.
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn ledger_round_trip_through_trait_object() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("ledger.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let salary = TransactionRecord {
            category: "薪資".into(),
            amount: Some(10000.0),
            memo: "五月".into(),
            datetime: "2024-05-02".into(),
            transaction_type: TransactionType::Income,
            ..Default::default()
        };
        storage.insert_transaction("U1", &salary).await.unwrap();
        storage
            .insert_category(Some("U1"), "副業", TransactionType::Income)
            .await
            .unwrap();

        let store: &dyn TransactionStore = &storage;
        let may = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        );
        let records = store.query_transactions("U1", may).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].memo, "五月");

        let categories = store.query_categories("U1").await.unwrap();
        assert!(categories.income.contains(&"副業".to_string()));

        storage.shutdown().await.unwrap();
    }
}
