// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary keyword parsing.

use wanglai_core::TransactionType;

/// Calendar period named by a summary keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    /// The keyword named no period; the whole ledger is summarized.
    AllTime,
}

impl Period {
    /// The first `日`, `週`/`周`, or `月` in the keyword decides the period.
    pub fn from_keyword(keyword: &str) -> Self {
        keyword
            .chars()
            .find_map(|c| match c {
                '日' => Some(Period::Day),
                '週' | '周' => Some(Period::Week),
                '月' => Some(Period::Month),
                _ => None,
            })
            .unwrap_or(Period::AllTime)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Period::Day => "日",
            Period::Week => "週",
            Period::Month => "月",
            Period::AllTime => "",
        }
    }
}

/// What a summary keyword asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    pub period: Period,
    /// Selects which analysis list the report shows.
    pub kind: TransactionType,
    /// `結餘` keywords report the balance rather than one side of the ledger.
    pub balance: bool,
}

impl SummaryRequest {
    pub fn parse(keyword: &str) -> Self {
        let balance = keyword.contains("結餘");
        let kind = if balance {
            TransactionType::Expense
        } else {
            match (keyword.find("支出"), keyword.find("收入")) {
                (Some(e), Some(i)) if i < e => TransactionType::Income,
                (None, Some(_)) => TransactionType::Income,
                _ => TransactionType::Expense,
            }
        };
        Self {
            period: Period::from_keyword(keyword),
            kind,
            balance,
        }
    }

    pub fn title(&self) -> String {
        if self.balance {
            format!("{}結餘", self.period.glyph())
        } else {
            format!("{}{}總結", self.period.glyph(), self.kind.label())
        }
    }

    pub fn analysis_title(&self) -> String {
        format!("{}{}分析", self.period.glyph(), self.kind.label())
    }
}
