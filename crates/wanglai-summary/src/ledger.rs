// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Totals computed from stored transactions.

use wanglai_core::{AnalysisItem, TransactionRecord, TransactionType};

use crate::format::format_currency;

const UNNAMED_CATEGORY: &str = "其他";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerTotals {
    pub income: f64,
    pub expense: f64,
    pub income_items: Vec<AnalysisItem>,
    pub expense_items: Vec<AnalysisItem>,
}

impl LedgerTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    pub fn items(&self, kind: TransactionType) -> &[AnalysisItem] {
        match kind {
            TransactionType::Income => &self.income_items,
            TransactionType::Expense => &self.expense_items,
        }
    }
}

/// Sums `records` by type and category. `None` when there is nothing to sum.
pub fn tally(records: &[TransactionRecord]) -> Option<LedgerTotals> {
    let mut income: Vec<(String, f64)> = Vec::new();
    let mut expense: Vec<(String, f64)> = Vec::new();
    let mut counted = 0usize;

    for record in records {
        let Some(amount) = record.amount.filter(|a| *a != 0.0) else {
            continue;
        };
        let category = match record.category.trim() {
            "" => UNNAMED_CATEGORY,
            name => name,
        };
        let bucket = match record.transaction_type {
            TransactionType::Income => &mut income,
            TransactionType::Expense => &mut expense,
        };
        match bucket.iter_mut().find(|(name, _)| name == category) {
            Some((_, sum)) => *sum += amount,
            None => bucket.push((category.to_string(), amount)),
        }
        counted += 1;
    }

    if counted == 0 {
        return None;
    }
    let income_total = income.iter().map(|(_, a)| a).sum();
    let expense_total = expense.iter().map(|(_, a)| a).sum();
    Some(LedgerTotals {
        income: income_total,
        expense: expense_total,
        income_items: analysis(income, income_total),
        expense_items: analysis(expense, expense_total),
    })
}

fn analysis(mut sums: Vec<(String, f64)>, total: f64) -> Vec<AnalysisItem> {
    if total <= 0.0 {
        return Vec::new();
    }
    sums.sort_by(|a, b| b.1.total_cmp(&a.1));
    sums.into_iter()
        .map(|(category, amount)| AnalysisItem {
            category,
            amount: format_currency(amount),
            percentage: format!("{}%", (amount / total * 100.0).round()),
        })
        .collect()
}
