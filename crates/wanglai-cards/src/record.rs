// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record cards: one bubble per saved transaction.

use serde_json::{Value, json};
use tracing::warn;
use wanglai_core::{TransactionRecord, TransactionType};

use crate::flex::{Bubble, Button, FlexBox, Separator, Text, UriAction};

/// Presentation style selected by a record's type and fixed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub label: &'static str,
    pub color: &'static str,
    /// Horizontal padding inside the label pill.
    pub padding: &'static str,
    /// Share of the header row taken by the pill.
    pub pill_flex: u32,
}

pub fn variant(kind: TransactionType, is_fixed: bool) -> Variant {
    match (kind, is_fixed) {
        (TransactionType::Expense, false) => Variant {
            label: "支出",
            color: "#1DB446",
            padding: "0px",
            pill_flex: 2,
        },
        (TransactionType::Expense, true) => Variant {
            label: "固定支出",
            color: "#EB5757",
            padding: "8px",
            pill_flex: 3,
        },
        (TransactionType::Income, false) => Variant {
            label: "收入",
            color: "#2D9CDB",
            padding: "0px",
            pill_flex: 2,
        },
        (TransactionType::Income, true) => Variant {
            label: "固定收入",
            color: "#4A90E2",
            padding: "8px",
            pill_flex: 3,
        },
    }
}

/// Formats a record amount for display; a missing amount shows as `0`.
pub fn display_amount(amount: Option<f64>) -> String {
    match amount {
        Some(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(value) => format!("{value}"),
        None => "0".to_string(),
    }
}

/// Deep link into the edit-record app.
pub fn edit_link(record: &TransactionRecord, liff_id: &str) -> String {
    format!(
        "https://liff.line.me/{liff_id}?recordId={}&type={}",
        urlencoding::encode(&record.record_id.to_string()),
        record.transaction_type
    )
}

/// Renders one record. Never fails: a tree that cannot be serialized is
/// replaced by a plain fallback bubble.
pub fn render_record(record: &TransactionRecord, liff_id: &str) -> Value {
    let style = variant(record.transaction_type, record.is_fixed);
    match build(record, liff_id, style).to_value() {
        Ok(tree) => tree,
        Err(e) => {
            warn!(error = %e, "record card serialization failed, using fallback");
            fallback_card(record, style)
        }
    }
}

fn build(record: &TransactionRecord, liff_id: &str, style: Variant) -> Bubble {
    let pill = FlexBox::vertical()
        .flex(style.pill_flex)
        .background(style.color)
        .corner_radius("12px")
        .padding_y("4px")
        .padding_x(style.padding)
        .justify_content("center")
        .push(Text::new(style.label).size("xs").color("#FFFFFF").bold().align("center"));

    let header = FlexBox::horizontal()
        .align_items("center")
        .spacing("md")
        .push(Text::new(&record.category).size("lg").bold().wrap().flex(5))
        .push(pill);

    let date_row = FlexBox::horizontal()
        .margin("md")
        .push(Text::new("日期").size("xs").color("#AAAAAA").flex(1))
        .push(
            Text::new(&record.datetime)
                .size("xs")
                .color("#555555")
                .align("end")
                .flex(3),
        );

    let body = FlexBox::vertical()
        .spacing("sm")
        .padding_all("16px")
        .push(header)
        .push(
            Text::new(format!("$ {}", display_amount(record.amount)))
                .size("xxl")
                .bold()
                .color(style.color)
                .margin("md")
                .shrink_to_fit(),
        )
        .push(Text::new(&record.memo).size("sm").color("#555555").wrap())
        .push(Separator::new().margin("md"))
        .push(date_row);

    let bubble = Bubble::new(body).size("kilo");
    if liff_id.is_empty() {
        return bubble;
    }
    bubble.footer(
        FlexBox::vertical().push(
            Button::new(UriAction::new("編輯紀錄", edit_link(record, liff_id)))
                .style("link")
                .height("sm")
                .color(style.color),
        ),
    )
}

pub(crate) fn fallback_card(record: &TransactionRecord, style: Variant) -> Value {
    json!({
        "type": "bubble",
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                {"type": "text", "text": record.category, "weight": "bold", "color": style.color, "size": "sm"},
                {"type": "text", "text": format!("$ {}", display_amount(record.amount)), "size": "xl", "weight": "bold", "margin": "md"},
                {"type": "text", "text": record.memo, "size": "sm", "color": "#555555", "margin": "md", "wrap": true},
                {"type": "text", "text": record.datetime, "size": "xs", "color": "#AAAAAA", "margin": "md", "wrap": true}
            ]
        }
    })
}

/// The variant label embedded in a rendered record card, if the card has
/// the standard layout.
pub fn record_label(card: &Value) -> Option<&str> {
    card.pointer("/body/contents/0/contents/1/contents/0/text")
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wanglai_core::RecordId;

    fn record() -> TransactionRecord {
        TransactionRecord {
            category: "餐飲".to_string(),
            amount: Some(120.0),
            memo: "午餐".to_string(),
            datetime: "2024-01-01".to_string(),
            record_id: RecordId::Number(42),
            ..TransactionRecord::default()
        }
    }

    #[test]
    fn variants_cover_type_and_fixed_flag() {
        assert_eq!(variant(TransactionType::Expense, false).color, "#1DB446");
        assert_eq!(variant(TransactionType::Expense, true).label, "固定支出");
        assert_eq!(variant(TransactionType::Income, false).padding, "0px");
        let fixed_income = variant(TransactionType::Income, true);
        assert_eq!(fixed_income.color, "#4A90E2");
        assert_eq!(fixed_income.pill_flex, 3);
    }

    #[test]
    fn renders_fields_and_label() {
        let card = render_record(&record(), "2007052419-abc");
        assert_eq!(card["type"], "bubble");
        assert_eq!(record_label(&card), Some("支出"));
        assert_eq!(card["body"]["contents"][0]["contents"][0]["text"], "餐飲");
        assert_eq!(card["body"]["contents"][1]["text"], "$ 120");
        assert_eq!(card["body"]["contents"][2]["text"], "午餐");
        assert_eq!(card["body"]["contents"][4]["contents"][1]["text"], "2024-01-01");
        assert_eq!(
            card["footer"]["contents"][0]["action"]["uri"],
            "https://liff.line.me/2007052419-abc?recordId=42&type=expense"
        );
    }

    #[test]
    fn edit_link_encodes_text_ids() {
        let mut rec = record();
        rec.record_id = RecordId::Text("a b/c".to_string());
        rec.transaction_type = TransactionType::Income;
        assert_eq!(
            edit_link(&rec, "app"),
            "https://liff.line.me/app?recordId=a%20b%2Fc&type=income"
        );
    }

    #[test]
    fn missing_fields_render_defaults() {
        let bare = defaulted_record();
        let card = render_record(&bare, "");
        assert_eq!(card["body"]["contents"][1]["text"], "$ 0");
        assert_eq!(card["body"]["contents"][0]["contents"][0]["text"], "未分類");
        assert_eq!(card["body"]["contents"][2]["text"], "無備註");
        assert!(card.get("footer").is_none());
    }

    fn defaulted_record() -> TransactionRecord {
        TransactionRecord {
            category: "未分類".to_string(),
            memo: "無備註".to_string(),
            datetime: "2024-01-01".to_string(),
            ..TransactionRecord::default()
        }
    }

    #[test]
    fn fallback_card_is_plain_text_nodes() {
        let rec = record();
        let card = fallback_card(&rec, variant(rec.transaction_type, rec.is_fixed));
        let texts: Vec<&str> = card["body"]["contents"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["text"].as_str())
            .collect();
        assert_eq!(texts, vec!["餐飲", "$ 120", "午餐", "2024-01-01"]);
        assert_eq!(record_label(&card), None);
    }

    #[test]
    fn fractional_amounts_keep_decimals() {
        assert_eq!(display_amount(Some(12.5)), "12.5");
        assert_eq!(display_amount(Some(3000.0)), "3000");
        assert_eq!(display_amount(None), "0");
    }
}
