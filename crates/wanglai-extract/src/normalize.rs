// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defaulting of partially-filled record bodies.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use wanglai_core::{RecordId, TransactionRecord, TransactionType};

pub const DEFAULT_CATEGORY: &str = "未分類";
pub const DEFAULT_MEMO: &str = "無備註";

/// Keys lifted into typed fields; everything else passes through in `extra`.
const KNOWN_KEYS: &[&str] = &[
    "category",
    "amount",
    "memo",
    "datetime",
    "type",
    "is_fixed",
    "user_id",
    "record_id",
];

/// Fill in defaults for a record body.
///
/// * `is_fixed` is `false` only when missing or null; an explicit value is kept.
/// * A record's own `type` wins over `fallback_type`.
/// * Blank `category`/`memo`/`datetime` take their defaults, the date being
///   `today`.
pub fn normalize(
    mut fields: Map<String, Value>,
    record_id: RecordId,
    fallback_type: TransactionType,
    today: NaiveDate,
) -> TransactionRecord {
    let category = non_blank(fields.get("category")).unwrap_or_else(|| DEFAULT_CATEGORY.into());
    let memo = non_blank(fields.get("memo")).unwrap_or_else(|| DEFAULT_MEMO.into());
    let datetime = non_blank(fields.get("datetime"))
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let amount = fields.get("amount").and_then(amount_of);
    let transaction_type = fields
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| TransactionType::from_str(t).ok())
        .unwrap_or(fallback_type);
    let is_fixed = fields.get("is_fixed").is_some_and(truthy);
    let user_id = non_blank(fields.get("user_id"));

    fields.retain(|key, _| !KNOWN_KEYS.contains(&key.as_str()));

    TransactionRecord {
        category,
        amount,
        memo,
        datetime,
        transaction_type,
        is_fixed,
        record_id,
        user_id,
        extra: fields,
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers pass through; numeric strings such as `"1,200"` are parsed.
fn amount_of(value: &Value) -> Option<f64> {
    let amount: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    };
    amount.filter(|n| n.is_finite())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
