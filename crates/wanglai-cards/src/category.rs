// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category list carousel.

use serde_json::Value;
use wanglai_core::CategoryLists;

use crate::flex::{Bubble, Carousel, FlexBox, Separator, Text, spacer_cell};

pub const CATEGORY_ALT_TEXT: &str = "📂 分類列表";

const COLUMNS: usize = 3;
const TRANSPARENT: &str = "#FFFFFF00";

/// One bubble per non-empty type, expense first. `None` when the user has
/// no categories at all.
pub fn render_category_list(lists: &CategoryLists) -> Result<Option<Value>, serde_json::Error> {
    let bubbles: Vec<Bubble> = [
        ("支出分類", "#EB5757", &lists.expense),
        ("收入分類", "#2D9CDB", &lists.income),
    ]
    .into_iter()
    .filter(|(_, _, names)| !names.is_empty())
    .map(|(title, color, names)| category_bubble(title, color, names))
    .collect();

    if bubbles.is_empty() {
        return Ok(None);
    }
    Carousel::new(bubbles).to_value().map(Some)
}

fn category_bubble(title: &str, color: &str, names: &[String]) -> Bubble {
    let rows = names.chunks(COLUMNS).map(|row| {
        FlexBox::horizontal()
            .spacing("sm")
            .extend(row.iter().map(|name| pill(name, color)))
            .extend((row.len()..COLUMNS).map(|_| spacer_cell(Some(TRANSPARENT))))
    });
    let body = FlexBox::vertical()
        .spacing("md")
        .padding_all("16px")
        .push(Text::new(title).size("lg").bold().color(color))
        .push(Separator::new())
        .extend(rows);
    Bubble::new(body).size("kilo")
}

fn pill(name: &str, color: &str) -> FlexBox {
    FlexBox::vertical()
        .flex(1)
        .background("#F5F5F5")
        .corner_radius("8px")
        .padding_all("6px")
        .push(Text::new(name).size("sm").color(color).align("center").wrap())
}
