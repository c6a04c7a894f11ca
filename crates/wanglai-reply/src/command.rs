// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of a backend reply into a command or a transaction reply.

pub const TUTORIAL_TRIGGERS: &[&str] = &["教學文檔", "旺來怎麼用", "說明"];

pub const SUMMARY_KEYWORDS: &[&str] = &[
    "日支出總結",
    "日收入總結",
    "週支出總結",
    "週收入總結",
    "月支出總結",
    "月收入總結",
];

pub const CATEGORY_TRIGGERS: &[&str] = &["分類", "分類列表"];

/// Keyword the balance card aggregates with.
pub const BALANCE_KEYWORD: &str = "月結餘";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tutorial,
    /// `exact` is false when `餘額` merely appears in a longer reply, in
    /// which case the cleaned reply text follows the card.
    Balance { exact: bool },
    Empty,
    Summary(&'static str),
    Categories,
    Transaction,
}

pub fn classify(text: &str) -> Command {
    let trimmed = text.trim();
    if TUTORIAL_TRIGGERS.contains(&trimmed) {
        return Command::Tutorial;
    }
    if trimmed == "餘額" {
        return Command::Balance { exact: true };
    }
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if text.contains("餘額") && !text.contains("總結") {
        return Command::Balance { exact: false };
    }
    let normalized = trimmed.replace('周', "週");
    if let Some(keyword) = SUMMARY_KEYWORDS.iter().find(|k| **k == normalized) {
        return Command::Summary(keyword);
    }
    if CATEGORY_TRIGGERS.contains(&trimmed) {
        return Command::Categories;
    }
    Command::Transaction
}
