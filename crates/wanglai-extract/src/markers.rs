// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record-id and transaction-type markers trailing a backend reply.
//!
//! The backend appends `[{"id":106}, {"id":107}]` for stored rows and
//! `[{"type": "expense"}]` for the direction of the whole reply.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;
use wanglai_core::{RecordId, TransactionType};

static ID_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[(\{"id":\d+\}(?:,\s*\{"id":\d+\})*)\](?:,\s*)?"#).unwrap()
});

static TYPE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[\{"type":\s*"([^"]+)"\}\]"#).unwrap());

static INLINE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""type":\s*"(income|expense)""#).unwrap());

/// Identifiers from the first id marker, in order. Empty when absent.
pub fn record_ids(raw: &str) -> Vec<RecordId> {
    let Some(caps) = ID_MARKER.captures(raw) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Value>>(&format!("[{}]", &caps[1])) {
        Ok(items) => items
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_i64))
            .map(RecordId::Number)
            .collect(),
        Err(e) => {
            debug!(error = %e, "unparsable record id marker");
            Vec::new()
        }
    }
}

/// Direction of the reply.
///
/// An explicit `[{"type": ...}]` marker wins; otherwise any inline
/// `"type": "income"|"expense"` field; otherwise expense.
pub fn transaction_type(raw: &str) -> TransactionType {
    if let Some(caps) = TYPE_MARKER.captures(raw) {
        return TransactionType::from_str(&caps[1]).unwrap_or_else(|_| {
            debug!(marker = &caps[1], "unknown type marker, assuming expense");
            TransactionType::Expense
        });
    }

    INLINE_TYPE
        .captures(raw)
        .and_then(|caps| TransactionType::from_str(&caps[1]).ok())
        .unwrap_or_default()
}

/// Byte ranges of every type marker, for callers that must keep them intact.
pub(crate) fn type_marker_spans(raw: &str) -> Vec<std::ops::Range<usize>> {
    TYPE_MARKER.find_iter(raw).map(|m| m.range()).collect()
}
