// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary Aggregator for the Wanglai bot.
//!
//! Builds a [`SummaryDataset`] for a summary or balance keyword. Figures are
//! mined from the message text first; when the text carries neither an
//! income nor an expense figure, the user's ledger is queried for the
//! requested period instead. Aggregation never fails: a store error leaves
//! the figures empty and the card renders zero values.

pub mod figures;
pub mod format;
pub mod keyword;
pub mod ledger;
pub mod period;

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use tracing::{debug, warn};
use wanglai_core::{SummaryDataset, TransactionStore};

pub use format::format_currency;
pub use keyword::{Period, SummaryRequest};

pub struct SummaryAggregator {
    store: Arc<dyn TransactionStore>,
    offset: FixedOffset,
}

impl SummaryAggregator {
    pub fn new(store: Arc<dyn TransactionStore>, utc_offset_hours: i32) -> Self {
        Self {
            store,
            offset: period::offset_from_hours(utc_offset_hours),
        }
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        period::local_date(self.offset, Utc::now())
    }

    pub async fn aggregate(&self, user_id: &str, keyword: &str, text: &str) -> SummaryDataset {
        self.aggregate_on(user_id, keyword, text, self.today()).await
    }

    /// [`aggregate`](Self::aggregate) with an explicit "today".
    pub async fn aggregate_on(
        &self,
        user_id: &str,
        keyword: &str,
        text: &str,
        today: NaiveDate,
    ) -> SummaryDataset {
        let request = SummaryRequest::parse(keyword);
        let mined = figures::mine(text);
        let from_text = mined.has_totals();

        let mut dataset = SummaryDataset {
            title: request.title(),
            income: mined.income,
            expense: mined.expense,
            balance: mined.balance,
            analysis_title: request.analysis_title(),
            analysis_items: mined.categories,
        };
        if from_text {
            return dataset;
        }

        let range = period::resolve(request.period, today);
        let records = match self.store.query_transactions(user_id, range).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, user_id, "summary store query failed");
                return dataset;
            }
        };
        let Some(totals) = ledger::tally(&records) else {
            debug!(user_id, ?range, "no transactions in summary period");
            return dataset;
        };

        dataset.income = Some(format_currency(totals.income));
        dataset.expense = Some(format_currency(totals.expense));
        dataset.balance = Some(format_currency(totals.balance()));
        let items = totals.items(request.kind);
        if !items.is_empty() {
            dataset.analysis_items = items.to_vec();
        }
        dataset
    }

    /// The date-range caption for `keyword`, e.g. `以下是本月 2024/01/01 - 2024/01/15的分析`.
    pub fn caption(&self, keyword: &str) -> Option<String> {
        let period = Period::from_keyword(keyword);
        period::caption(period, period::resolve(period, self.today()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use wanglai_core::{
        AdapterType, CategoryLists, DateRange, HealthStatus, PluginAdapter, TransactionRecord,
        TransactionType, WanglaiError,
    };

    struct FixedLedger {
        records: Vec<TransactionRecord>,
        fail: bool,
    }

    #[async_trait]
    impl PluginAdapter for FixedLedger {
        fn name(&self) -> &str {
            "fixed"
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
    impl TransactionStore for FixedLedger {
        async fn query_transactions(
            &self,
            _user_id: &str,
            range: DateRange,
        ) -> Result<Vec<TransactionRecord>, WanglaiError> {
            if self.fail {
                return Err(WanglaiError::Internal("ledger offline".into()));
            }
            Ok(self
                .records
                .iter()
                .filter(|r| {
                    NaiveDate::parse_from_str(&r.datetime, "%Y-%m-%d")
                        .is_ok_and(|d| range.contains(d))
                })
                .cloned()
                .collect())
        }

        async fn query_categories(&self, _user_id: &str) -> Result<CategoryLists, WanglaiError> {
            Ok(CategoryLists::default())
        }
    }

    fn rec(kind: TransactionType, category: &str, amount: f64, date: &str) -> TransactionRecord {
        TransactionRecord {
            category: category.to_string(),
            amount: Some(amount),
            datetime: date.to_string(),
            transaction_type: kind,
            ..TransactionRecord::default()
        }
    }

    fn aggregator(records: Vec<TransactionRecord>, fail: bool) -> SummaryAggregator {
        SummaryAggregator::new(Arc::new(FixedLedger { records, fail }), 8)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn monthly_balance_falls_back_to_ledger() {
        let agg = aggregator(
            vec![
                rec(TransactionType::Income, "薪資", 10000.0, "2024-01-05"),
                rec(TransactionType::Expense, "房租", 4000.0, "2024-01-10"),
                rec(TransactionType::Expense, "餐飲", 999.0, "2023-12-31"),
            ],
            false,
        );
        let dataset = agg.aggregate_on("u1", "月結餘", "月結餘", today()).await;
        assert_eq!(dataset.title, "月結餘");
        assert_eq!(dataset.income.as_deref(), Some("$ 10,000"));
        assert_eq!(dataset.expense.as_deref(), Some("$ 4,000"));
        assert_eq!(dataset.balance.as_deref(), Some("$ 6,000"));
        assert_eq!(dataset.analysis_items.len(), 1);
        assert_eq!(dataset.analysis_items[0].category, "房租");
    }

    #[tokio::test]
    async fn income_summary_shows_income_items() {
        let agg = aggregator(
            vec![
                rec(TransactionType::Income, "薪資", 3000.0, "2024-01-15"),
                rec(TransactionType::Income, "獎金", 1000.0, "2024-01-15"),
                rec(TransactionType::Expense, "餐飲", 100.0, "2024-01-15"),
            ],
            false,
        );
        let dataset = agg.aggregate_on("u1", "日收入總結", "日收入總結", today()).await;
        assert_eq!(dataset.analysis_title, "日收入分析");
        let categories: Vec<_> = dataset.analysis_items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["薪資", "獎金"]);
        assert_eq!(dataset.analysis_items[0].percentage, "75%");
    }

    #[tokio::test]
    async fn text_figures_skip_the_ledger() {
        let agg = aggregator(vec![rec(TransactionType::Income, "x", 1.0, "2024-01-15")], true);
        let dataset = agg
            .aggregate_on("u1", "月支出總結", "收入：$ 500\n支出：$ 200", today())
            .await;
        assert_eq!(dataset.income.as_deref(), Some("$ 500"));
        assert_eq!(dataset.balance.as_deref(), Some("$ 300"));
    }

    #[tokio::test]
    async fn empty_or_failing_ledger_leaves_figures_absent() {
        let empty = aggregator(Vec::new(), false)
            .aggregate_on("u1", "週支出總結", "週支出總結", today())
            .await;
        assert_eq!(empty.income, None);
        assert_eq!(empty.balance, None);
        assert_eq!(empty.title, "週支出總結");

        let failed = aggregator(Vec::new(), true)
            .aggregate_on("u1", "月結餘", "月結餘", today())
            .await;
        assert_eq!(failed.expense, None);
    }
}
