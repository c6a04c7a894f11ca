// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record-body parsers, tried in priority order.
//!
//! Each attempt is a pure function over the raw reply. The first attempt that
//! yields at least one record wins; attempts are never combined.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").unwrap());

static BARE_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[\s*\{\s*"category"[\s\S]*?\}\s*\]"#).unwrap());

static BARE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\s*"(?:user_id|category)"[\s\S]*?\}"#).unwrap());

static LEGACY_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"以下是您本次的紀錄：\s*\n\{\s*\n"#,
        r#"\s*"category":\s*"([^"]+)",\s*\n"#,
        r#"\s*"amount":\s*(\d+),\s*\n"#,
        r#"\s*"memo":\s*"([^"]*)",\s*\n"#,
        r#"\s*"is_fixed":\s*(true|false),\s*\n"#,
        r#"\s*"user_id":\s*"([^"]*)",\s*\n"#,
        r#"\s*"datetime":\s*"([^"]+)"\s*\n\s*\}"#,
    ))
    .unwrap()
});

/// Which record id a candidate should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSlot {
    /// Element `n` of a parsed array.
    Index(usize),
    /// A lone object: always the first id.
    First,
}

/// One record body recovered from the text, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub fields: Map<String, Value>,
    pub slot: IdSlot,
}

/// Successful output of an attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptMatch {
    pub candidates: Vec<Candidate>,
    /// Byte ranges of the fragments consumed from the raw text.
    pub consumed: Vec<Range<usize>>,
}

/// A named parsing strategy.
pub struct Attempt {
    pub name: &'static str,
    pub run: fn(&str) -> Option<AttemptMatch>,
}

/// All strategies, most reliable first.
pub const ATTEMPTS: &[Attempt] = &[
    Attempt {
        name: "fenced_block",
        run: fenced_block,
    },
    Attempt {
        name: "bare_array",
        run: bare_array,
    },
    Attempt {
        name: "bare_object",
        run: bare_object,
    },
    Attempt {
        name: "legacy_template",
        run: legacy_template,
    },
];

/// Run [`ATTEMPTS`] in order and return the first match with its name.
pub fn first_match(raw: &str) -> Option<(&'static str, AttemptMatch)> {
    ATTEMPTS
        .iter()
        .find_map(|attempt| (attempt.run)(raw).map(|found| (attempt.name, found)))
}

/// Every fenced block whose body is a JSON array or object.
///
/// Blocks that fail to parse are skipped; records from all good blocks are
/// concatenated.
pub fn fenced_block(raw: &str) -> Option<AttemptMatch> {
    let mut found = AttemptMatch::default();

    for caps in FENCED_BLOCK.captures_iter(raw) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body = body.as_str().trim();

        let parsed = if body.starts_with('[') && body.ends_with(']') {
            parse_array(body)
        } else if body.starts_with('{') && body.ends_with('}') {
            parse_object(body).map(|fields| {
                vec![Candidate {
                    fields,
                    slot: IdSlot::First,
                }]
            })
        } else {
            None
        };

        if let Some(mut candidates) = parsed {
            found.candidates.append(&mut candidates);
            found.consumed.push(whole.range());
        }
    }

    non_empty(found)
}

/// The first parseable `[{"category": ...}, ...]` array in the text.
pub fn bare_array(raw: &str) -> Option<AttemptMatch> {
    BARE_ARRAY.find_iter(raw).find_map(|m| {
        non_empty(AttemptMatch {
            candidates: parse_array(m.as_str())?,
            consumed: vec![m.range()],
        })
    })
}

/// The first parseable `{"category": ...}` or `{"user_id": ...}` object.
pub fn bare_object(raw: &str) -> Option<AttemptMatch> {
    BARE_OBJECT.find_iter(raw).find_map(|m| {
        Some(AttemptMatch {
            candidates: vec![Candidate {
                fields: parse_object(m.as_str())?,
                slot: IdSlot::First,
            }],
            consumed: vec![m.range()],
        })
    })
}

/// The rigid "以下是您本次的紀錄：" layout older prompts produced.
///
/// Not valid JSON in general, so fields are captured positionally.
pub fn legacy_template(raw: &str) -> Option<AttemptMatch> {
    let caps = LEGACY_TEMPLATE.captures(raw)?;
    let whole = caps.get(0)?;

    let amount: i64 = caps[2].parse().ok()?;
    let mut fields = Map::new();
    fields.insert("category".into(), Value::from(&caps[1]));
    fields.insert("amount".into(), Value::from(amount));
    fields.insert("memo".into(), Value::from(&caps[3]));
    fields.insert("is_fixed".into(), Value::from(&caps[4] == "true"));
    fields.insert("user_id".into(), Value::from(&caps[5]));
    fields.insert("datetime".into(), Value::from(&caps[6]));

    Some(AttemptMatch {
        candidates: vec![Candidate {
            fields,
            slot: IdSlot::First,
        }],
        consumed: vec![whole.range()],
    })
}

fn parse_array(text: &str) -> Option<Vec<Candidate>> {
    let items: Vec<Value> = match serde_json::from_str(text) {
        Ok(items) => items,
        Err(e) => {
            debug!(error = %e, "record array is not valid JSON");
            return None;
        }
    };

    let candidates = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::Object(fields) => Some(Candidate {
                fields,
                slot: IdSlot::Index(index),
            }),
            other => {
                debug!(index, value = %other, "skipping non-object array element");
                None
            }
        })
        .collect();
    Some(candidates)
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(text) {
        Ok(fields) => Some(fields),
        Err(e) => {
            debug!(error = %e, "record object is not valid JSON");
            None
        }
    }
}

fn non_empty(found: AttemptMatch) -> Option<AttemptMatch> {
    (!found.candidates.is_empty()).then_some(found)
}
