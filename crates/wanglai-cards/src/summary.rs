// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary and balance cards.
//!
//! A summary bubble's body is laid out as `[top, separator, analysis title,
//! analysis]`; the balance bubble keeps only the top section.

use serde_json::Value;
use wanglai_core::{AnalysisItem, SummaryDataset};

use crate::flex::{Bubble, FlexBox, Separator, Text, spacer_cell};

/// Bar and legend colors, assigned in rank order and reused cyclically.
pub const PALETTE: [&str; 11] = [
    "#FF6B6B", "#4ECDC4", "#FFB347", "#5B8DEF", "#9B59B6", "#2ECC71", "#F06292", "#00ACC1",
    "#FFD54F", "#8D6E63", "#90A4AE",
];

/// Shown for income, expense, or balance when the dataset has no figure.
pub const ZERO_AMOUNT: &str = "$ 0";

pub const NO_ANALYSIS_CAPTION: &str = "暫無分析數據";

const LEGEND_COLUMNS: usize = 3;
const INCOME_COLOR: &str = "#2D9CDB";
const EXPENSE_COLOR: &str = "#EB5757";
const MUTED: &str = "#888888";

pub fn render_summary(dataset: &SummaryDataset) -> Result<Value, serde_json::Error> {
    let body = FlexBox::vertical()
        .padding_all("16px")
        .push(top_section(dataset))
        .push(Separator::new().margin("lg"))
        .push(
            FlexBox::vertical()
                .margin("lg")
                .push(Text::new(&dataset.analysis_title).size("md").bold()),
        )
        .push(analysis_section(&dataset.analysis_items));
    Bubble::new(body).to_value()
}

pub fn render_balance_summary(dataset: &SummaryDataset) -> Result<Value, serde_json::Error> {
    let body = FlexBox::vertical()
        .padding_all("16px")
        .push(top_section(dataset));
    Bubble::new(body).to_value()
}

/// The `日`, `週`, or `月` prefix named by a summary title.
pub fn period_prefix(title: &str) -> &'static str {
    title
        .chars()
        .find_map(|c| match c {
            '日' => Some("日"),
            '週' | '周' => Some("週"),
            '月' => Some("月"),
            _ => None,
        })
        .unwrap_or("")
}

fn top_section(dataset: &SummaryDataset) -> FlexBox {
    let prefix = period_prefix(&dataset.title);
    let balance = FlexBox::baseline()
        .margin("md")
        .spacing("sm")
        .push(Text::new("結餘").size("sm").color(MUTED).flex(0))
        .push(
            Text::new(figure(&dataset.balance))
                .size("xxl")
                .bold()
                .align("end")
                .flex(1)
                .shrink_to_fit(),
        );
    let split = FlexBox::horizontal()
        .margin("md")
        .spacing("md")
        .push(figure_column(
            format!("{prefix}收入"),
            figure(&dataset.income),
            INCOME_COLOR,
        ))
        .push(figure_column(
            format!("{prefix}支出"),
            figure(&dataset.expense),
            EXPENSE_COLOR,
        ));
    FlexBox::vertical()
        .push(Text::new(&dataset.title).size("lg").bold().color("#333333"))
        .push(balance)
        .push(split)
}

fn figure(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => ZERO_AMOUNT,
    }
}

fn figure_column(caption: String, amount: &str, color: &str) -> FlexBox {
    FlexBox::vertical()
        .flex(1)
        .push(Text::new(caption).size("xs").color(MUTED))
        .push(Text::new(amount).size("lg").bold().color(color).shrink_to_fit())
}

/// Analysis items that survive ranking: whole-number percentages above
/// zero, highest first.
pub fn ranked_items(items: &[AnalysisItem]) -> Vec<(&AnalysisItem, u32)> {
    let mut ranked: Vec<_> = items
        .iter()
        .map(|item| (item, parse_percentage(&item.percentage)))
        .filter(|(_, pct)| *pct > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn parse_percentage(raw: &str) -> u32 {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|p| p.round() as u32)
        .unwrap_or(0)
}

/// Bar segment widths normalized against the sum of `percentages`.
///
/// Every width but the last is rounded on its own; the last is
/// `100 - sum(previous)`, so the bar always sums to 100. Should the rounded
/// widths overshoot, the last segment is empty and the excess comes off the
/// widest ones.
pub fn bar_widths(percentages: &[u32]) -> Vec<u32> {
    let total: u64 = percentages.iter().map(|&p| u64::from(p)).sum();
    let Some((_, leading)) = percentages.split_last() else {
        return Vec::new();
    };
    if total == 0 {
        return Vec::new();
    }

    let mut widths: Vec<u32> = leading
        .iter()
        .map(|&p| ((u64::from(p) * 200 + total) / (total * 2)) as u32)
        .collect();
    let placed: u32 = widths.iter().sum();
    widths.push(100u32.saturating_sub(placed));

    let mut excess = placed.saturating_sub(100);
    while excess > 0 {
        let Some(widest) = widths.iter_mut().max() else {
            break;
        };
        let cut = excess.min(*widest);
        *widest -= cut;
        excess -= cut;
    }
    widths
}

fn analysis_section(items: &[AnalysisItem]) -> FlexBox {
    let container = FlexBox::vertical().margin("md").spacing("md");
    let ranked = ranked_items(items);
    if ranked.is_empty() {
        return container
            .push(
                FlexBox::horizontal()
                    .height("12px")
                    .corner_radius("6px")
                    .push(
                        FlexBox::vertical()
                            .width("100%")
                            .background("#E0E0E0"),
                    ),
            )
            .push(
                Text::new(NO_ANALYSIS_CAPTION)
                    .size("xs")
                    .color("#AAAAAA")
                    .align("center"),
            );
    }

    let percentages: Vec<u32> = ranked.iter().map(|(_, pct)| *pct).collect();
    let bar = FlexBox::horizontal()
        .height("12px")
        .corner_radius("6px")
        .extend(
            bar_widths(&percentages)
                .into_iter()
                .enumerate()
                .map(|(i, width)| {
                    FlexBox::vertical()
                        .width(format!("{width}%"))
                        .background(PALETTE[i % PALETTE.len()])
                }),
        );

    let cells: Vec<FlexBox> = ranked
        .iter()
        .enumerate()
        .map(|(i, (item, pct))| legend_cell(item, *pct, PALETTE[i % PALETTE.len()]))
        .collect();
    let rows = cells.chunks(LEGEND_COLUMNS).map(|row| {
        let padding = LEGEND_COLUMNS - row.len();
        FlexBox::horizontal()
            .spacing("sm")
            .extend(row.iter().cloned())
            .extend((0..padding).map(|_| spacer_cell(None)))
    });

    container.push(bar).extend(rows)
}

fn legend_cell(item: &AnalysisItem, pct: u32, color: &str) -> FlexBox {
    FlexBox::horizontal()
        .flex(1)
        .spacing("xs")
        .align_items("center")
        .push(
            FlexBox::vertical()
                .width("10px")
                .height("10px")
                .corner_radius("2px")
                .background(color),
        )
        .push(Text::new(&item.category).size("xs").color("#555555").flex(1))
        .push(Text::new(format!("{pct}%")).size("xs").color(MUTED).flex(0))
}
