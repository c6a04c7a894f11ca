// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recurring-transaction scheduler.
//!
//! Fires on `recurring.schedule`, evaluated in the summary timezone, and
//! copies every fixed transaction forward to the fire date.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use croner::Cron;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use wanglai_config::model::{RecurringConfig, WanglaiConfig};
use wanglai_core::{PluginAdapter, WanglaiError};
use wanglai_storage::SqliteStorage;

pub fn local_offset(utc_offset_hours: i32) -> Result<FixedOffset, WanglaiError> {
    FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
        WanglaiError::Config(format!(
            "summary.utc_offset_hours {utc_offset_hours} is out of range"
        ))
    })
}

fn parse_schedule(schedule: &str) -> Result<Cron, WanglaiError> {
    Cron::from_str(schedule).map_err(|e| {
        WanglaiError::Config(format!(
            "recurring.schedule `{schedule}` is not a valid cron expression: {e}"
        ))
    })
}

/// The first fire time strictly after `now`.
fn next_fire(cron: &Cron, now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    cron.find_next_occurrence(now, false).ok()
}

/// Spawns the scheduler loop; it exits when `cancel` fires.
pub fn spawn_scheduler(
    storage: Arc<SqliteStorage>,
    recurring: &RecurringConfig,
    utc_offset_hours: i32,
    cancel: CancellationToken,
) -> Result<JoinHandle<()>, WanglaiError> {
    let cron = parse_schedule(&recurring.schedule)?;
    let offset = local_offset(utc_offset_hours)?;
    let schedule = recurring.schedule.clone();

    info!(%schedule, utc_offset_hours, "recurring scheduler started");

    Ok(tokio::spawn(async move {
        loop {
            let now = Utc::now().with_timezone(&offset);
            let Some(fire_at) = next_fire(&cron, &now) else {
                error!(%schedule, "recurring schedule has no upcoming occurrence, stopping");
                break;
            };
            let wait = (fire_at - now).to_std().unwrap_or_default();
            debug!(next = %fire_at, wait_secs = wait.as_secs(), "next recurring run scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = cancel.cancelled() => {
                    info!("recurring scheduler shutting down");
                    break;
                }
            }

            if let Err(e) = storage.generate_daily_recurring(fire_at.date_naive()).await {
                warn!(error = %e, date = %fire_at.date_naive(), "recurring generation failed");
            }
        }
    }))
}

/// One-shot generation for `wanglai generate-recurring`.
pub async fn generate_once(
    config: &WanglaiConfig,
    date: Option<NaiveDate>,
) -> Result<usize, WanglaiError> {
    let date = match date {
        Some(date) => date,
        None => {
            let offset = local_offset(config.summary.utc_offset_hours)?;
            Utc::now().with_timezone(&offset).date_naive()
        }
    };

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let result = storage.generate_daily_recurring(date).await;
    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use wanglai_config::model::StorageConfig;
    use wanglai_core::{TransactionRecord, TransactionType};

    fn taipei() -> FixedOffset {
        local_offset(8).unwrap()
    }

    #[test]
    fn offset_bounds() {
        assert_eq!(local_offset(8).unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(local_offset(-5).unwrap().local_minus_utc(), -5 * 3600);
        assert!(local_offset(30).is_err());
    }

    #[test]
    fn midnight_schedule_fires_next_local_midnight() {
        let cron = parse_schedule("0 0 * * *").unwrap();
        let now = taipei().with_ymd_and_hms(2026, 3, 14, 21, 30, 0).unwrap();
        let next = next_fire(&cron, &now).unwrap();
        assert_eq!(next, taipei().with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
    }

    #[test]
    fn fire_time_is_strictly_after_now() {
        let cron = parse_schedule("0 0 * * *").unwrap();
        let now = taipei().with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
        let next = next_fire(&cron, &now).unwrap();
        assert_eq!(next, taipei().with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn invalid_schedule_is_config_error() {
        let err = parse_schedule("every day").unwrap_err();
        assert!(matches!(err, WanglaiError::Config(_)));
    }

    #[tokio::test]
    async fn generate_once_copies_fixed_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WanglaiConfig::default();
        config.storage = StorageConfig {
            database_path: dir.path().join("ledger.db").display().to_string(),
        };

        {
            let storage = SqliteStorage::new(config.storage.clone());
            storage.initialize().await.unwrap();
            let rent = TransactionRecord {
                category: "居家".to_string(),
                amount: Some(15000.0),
                memo: "房租".to_string(),
                datetime: "2026-03-01".to_string(),
                transaction_type: TransactionType::Expense,
                is_fixed: true,
                ..Default::default()
            };
            storage.insert_transaction("U1", &rent).await.unwrap();
            storage.shutdown().await.unwrap();
        }

        let date = NaiveDate::from_ymd_opt(2026, 3, 2);
        assert_eq!(generate_once(&config, date).await.unwrap(), 1);
        assert_eq!(generate_once(&config, date).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scheduler_stops_on_cancel() {
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: ":memory:".to_string(),
        }));
        let cancel = CancellationToken::new();
        let handle =
            spawn_scheduler(storage, &RecurringConfig::default(), 8, cancel.clone()).unwrap();
        cancel.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
