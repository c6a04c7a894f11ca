// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduces a backend reply to the prose a user should see.

use std::sync::LazyLock;

use regex::Regex;

use crate::markers;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\}|\[[\s\S]*?\])\s*```").unwrap()
});

static ANY_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[\s\S]*?\}").unwrap());

static ID_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[\s*\{\s*"id"\s*:\s*\d+\s*\}(?:\s*,\s*\{\s*"id"\s*:\s*\d+\s*\})*\s*\](?:\s*,\s*)?"#,
    )
    .unwrap()
});

static ID_BEFORE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[\s*\{\s*"id"\s*:\s*\d+\s*\}\s*\]\s*,"#).unwrap());

static EMPTY_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*\]\s*(?:,\s*\[\s*\])?").unwrap());

static COMMA_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*(?:,\s*)*\]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static DANGLING_LEAD_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"以下是您本次的紀錄：\s*$").unwrap());

/// Private-use delimiters for shielding type markers from the object pass.
const SHIELD_OPEN: char = '\u{E000}';
const SHIELD_CLOSE: char = '\u{E001}';

/// Strip JSON payloads and id markers, collapse whitespace.
///
/// Type markers such as `[{"type": "expense"}]` stay visible. A lead-in
/// phrase left with nothing after it is dropped.
pub fn clean_message_text(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }

    let (shielded, markers) = shield_type_markers(message);

    // Id markers go before the generic object pass, which would otherwise
    // hollow them out and strand their trailing comma.
    let mut text = FENCED_JSON.replace_all(&shielded, "").into_owned();
    text = ID_LIST.replace_all(&text, "").into_owned();
    text = ID_BEFORE_TYPE.replace_all(&text, "").into_owned();
    text = ANY_OBJECT.replace_all(&text, "").into_owned();
    text = EMPTY_BRACKETS.replace_all(&text, "").into_owned();
    text = COMMA_BRACKETS.replace_all(&text, "").into_owned();
    text = WHITESPACE.replace_all(&text, " ").trim().to_string();
    text = DANGLING_LEAD_IN.replace(&text, "").into_owned();

    unshield(&text, &markers)
}

/// Replace each type marker with an opaque token the later passes ignore.
fn shield_type_markers(message: &str) -> (String, Vec<&str>) {
    let spans = markers::type_marker_spans(message);
    if spans.is_empty() {
        return (message.to_string(), Vec::new());
    }

    let mut shielded = String::with_capacity(message.len());
    let mut kept = Vec::with_capacity(spans.len());
    let mut cursor = 0;
    for (i, span) in spans.into_iter().enumerate() {
        shielded.push_str(&message[cursor..span.start]);
        shielded.push(SHIELD_OPEN);
        shielded.push_str(&i.to_string());
        shielded.push(SHIELD_CLOSE);
        kept.push(&message[span.clone()]);
        cursor = span.end;
    }
    shielded.push_str(&message[cursor..]);
    (shielded, kept)
}

fn unshield(text: &str, markers: &[&str]) -> String {
    markers
        .iter()
        .enumerate()
        .fold(text.to_string(), |acc, (i, marker)| {
            acc.replace(&format!("{SHIELD_OPEN}{i}{SHIELD_CLOSE}"), marker)
        })
}
