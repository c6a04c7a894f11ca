// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text mining for backend replies.
//!
//! A reply may embed zero or more transaction records in several encodings,
//! plus trailing id and type markers. [`extract`] recovers normalized
//! records; [`clean_message_text`] produces the prose remainder. Neither
//! ever fails: unrecognized input is simply plain text.

pub mod attempts;
pub mod clean;
pub mod markers;
pub mod normalize;

use chrono::NaiveDate;
use tracing::debug;
use wanglai_core::{RecordId, TransactionRecord, TransactionType};

use crate::attempts::IdSlot;

pub use clean::clean_message_text;
pub use normalize::{DEFAULT_CATEGORY, DEFAULT_MEMO, normalize};

/// Result of mining one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub records: Vec<TransactionRecord>,
    pub record_ids: Vec<RecordId>,
    /// Direction detected for the reply as a whole.
    pub transaction_type: TransactionType,
    /// The reply minus consumed record fragments; the untouched input when
    /// nothing matched.
    pub remaining_text: String,
}

/// Recover records from `raw`, defaulting missing dates to `today`.
pub fn extract(raw: &str, today: NaiveDate) -> Extraction {
    let record_ids = markers::record_ids(raw);
    let transaction_type = markers::transaction_type(raw);

    let Some((strategy, found)) = attempts::first_match(raw) else {
        debug!("no record payload found, treating reply as plain text");
        return Extraction {
            records: Vec::new(),
            record_ids,
            transaction_type,
            remaining_text: raw.to_string(),
        };
    };

    let records: Vec<TransactionRecord> = found
        .candidates
        .into_iter()
        .map(|candidate| {
            let id = assign_id(&record_ids, candidate.slot);
            normalize(candidate.fields, id, transaction_type, today)
        })
        .collect();

    debug!(
        strategy,
        records = records.len(),
        ids = record_ids.len(),
        "extracted records from reply"
    );

    Extraction {
        records,
        record_ids,
        transaction_type,
        remaining_text: remove_ranges(raw, found.consumed),
    }
}

/// Pick the id for a candidate.
///
/// A single id is broadcast to every array element; otherwise ids map by
/// position and missing positions get an empty id.
fn assign_id(ids: &[RecordId], slot: IdSlot) -> RecordId {
    match (slot, ids) {
        (_, []) => RecordId::Empty,
        (IdSlot::First, [first, ..]) | (IdSlot::Index(_), [first]) => first.clone(),
        (IdSlot::Index(i), _) => ids.get(i).cloned().unwrap_or_default(),
    }
}

fn remove_ranges(raw: &str, mut ranges: Vec<std::ops::Range<usize>>) -> String {
    ranges.sort_by_key(|r| r.start);
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start >= cursor {
            out.push_str(&raw[cursor..range.start]);
            cursor = range.end;
        }
    }
    out.push_str(&raw[cursor..]);
    out.trim().to_string()
}
