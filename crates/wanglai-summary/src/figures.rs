// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Labeled figures embedded in free text, e.g. `收入：$ 5,000`.

use std::sync::LazyLock;

use regex::Regex;
use wanglai_core::AnalysisItem;

use crate::format::{format_currency, parse_currency, with_glyph};

static INCOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"收入[：:]\s*([$¥￥]?\s*[0-9,]+(?:\.[0-9]{1,2})?)").unwrap());

static EXPENSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"支出[：:]\s*([$¥￥]?\s*[0-9,]+(?:\.[0-9]{1,2})?)").unwrap());

static BALANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:結餘|餘額)[：:]\s*([$¥￥]?\s*[0-9,]+(?:\.[0-9]{1,2})?)").unwrap()
});

/// `食物：$1,200 (37.5%)`, percentage optional.
static CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([\x{4e00}-\x{9fa5}a-zA-Z]+)[：:]\s*([$¥￥]?\s*[0-9,]+(?:\.[0-9]{1,2})?)\s*(?:\(([0-9.]+%)\))?",
    )
    .unwrap()
});

/// Labels that look like categories but are report totals.
const NOT_CATEGORIES: &[&str] = &[
    "收入",
    "支出",
    "結餘",
    "餘額",
    "凈收入",
    "淨收入",
    "主要支出類別",
    "主要",
    "支出類別",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFigures {
    pub income: Option<String>,
    pub expense: Option<String>,
    pub balance: Option<String>,
    pub categories: Vec<AnalysisItem>,
}

impl TextFigures {
    pub fn has_totals(&self) -> bool {
        self.income.is_some() || self.expense.is_some()
    }
}

pub fn mine(text: &str) -> TextFigures {
    let text = text.trim();
    let labeled = |re: &Regex| re.captures(text).map(|caps| with_glyph(&caps[1]));
    let mut figures = TextFigures {
        income: labeled(&INCOME),
        expense: labeled(&EXPENSE),
        balance: labeled(&BALANCE),
        categories: categories(text),
    };
    if figures.balance.is_none() {
        if let (Some(income), Some(expense)) = (&figures.income, &figures.expense) {
            figures.balance = derive_balance(income, expense);
        }
    }
    figures
}

/// `income - expense`, formatted like every other figure.
pub fn derive_balance(income: &str, expense: &str) -> Option<String> {
    Some(format_currency(parse_currency(income)? - parse_currency(expense)?))
}

fn categories(text: &str) -> Vec<AnalysisItem> {
    CATEGORY
        .captures_iter(text)
        .filter_map(|caps| {
            let label = caps[1].trim();
            let is_total = NOT_CATEGORIES
                .iter()
                .any(|skip| label == *skip || label.ends_with(skip));
            (!is_total).then(|| AnalysisItem {
                category: label.to_string(),
                amount: with_glyph(&caps[2]),
                percentage: caps
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| "0%".to_string()),
            })
        })
        .collect()
}
