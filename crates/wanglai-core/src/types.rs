// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the reply pipeline and its collaborators.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays for the dispatch loop.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Backend,
    Transcriber,
    AssetHost,
    Storage,
}

/// Direction of money flow for a transaction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    /// The Chinese label used in captions and summary keywords.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "收入",
            Self::Expense => "支出",
        }
    }
}

/// Opaque identifier of a stored record, used to build the edit-record link.
///
/// Backends emit integers, but strings and "no id" must survive the trip to
/// the card renderer unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
    #[default]
    Empty,
}

impl RecordId {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// One financial entry recovered from a backend reply or read from the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub category: String,
    /// Absent when the source fragment carried no usable number.
    pub amount: Option<f64>,
    pub memo: String,
    /// Calendar date, `YYYY-MM-DD` once normalized.
    pub datetime: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Recurring entry.
    pub is_fixed: bool,
    #[serde(default)]
    pub record_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Fields the pipeline does not interpret, kept for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inclusive calendar range used for store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Category names visible to one user, split by transaction type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLists {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl CategoryLists {
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expense.is_empty()
    }
}

/// One row of a summary's category breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisItem {
    pub category: String,
    /// Formatted currency string, e.g. `$ 1,200`.
    pub amount: String,
    /// Whole-number percentage with a trailing `%`, e.g. `42%`.
    pub percentage: String,
}

/// Aggregated reporting view consumed by the summary and balance cards.
///
/// `None` figures mean "no data"; the renderer shows a zero value instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDataset {
    pub title: String,
    pub income: Option<String>,
    pub expense: Option<String>,
    pub balance: Option<String>,
    pub analysis_title: String,
    pub analysis_items: Vec<AnalysisItem>,
}

/// What the dispatch loop hands to the conversational backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendInput {
    Text(String),
    ImageUrl(String),
}

/// A reply from the conversational backend.
///
/// Audio messages produce a structured reply carrying the transcript so the
/// assembler can echo it back ahead of the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    PlainText(String),
    Structured {
        text: String,
        transcript: Option<String>,
    },
}

impl BackendReply {
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) | Self::Structured { text, .. } => text,
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::PlainText(_) => None,
            Self::Structured { transcript, .. } => transcript.as_deref(),
        }
    }
}

impl From<String> for BackendReply {
    fn from(text: String) -> Self {
        Self::PlainText(text)
    }
}

/// A quick-action button shown under the last reply segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub uri: String,
    pub image_url: String,
}

/// Display name and icon shown in place of the bot's own on a text segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    pub icon_url: String,
}

/// Payload of one outbound reply segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentBody {
    Text(String),
    /// A rich card with its fallback description for clients that cannot render it.
    Card { alt_text: String, contents: Value },
    /// Echo of a speech-to-text transcript, rendered as a card.
    Transcription {
        transcript: String,
        alt_text: String,
        contents: Value,
    },
}

/// One unit of outbound content.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplySegment {
    pub body: SegmentBody,
    /// Empty on every segment but the last one of a reply.
    pub quick_reply: Vec<QuickAction>,
    /// Only honoured on text segments.
    pub sender: Option<Sender>,
}

impl ReplySegment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            body: SegmentBody::Text(text.into()),
            quick_reply: Vec::new(),
            sender: None,
        }
    }

    pub fn card(alt_text: impl Into<String>, contents: Value) -> Self {
        Self {
            body: SegmentBody::Card {
                alt_text: alt_text.into(),
                contents,
            },
            quick_reply: Vec::new(),
            sender: None,
        }
    }

    pub fn transcription(
        transcript: impl Into<String>,
        alt_text: impl Into<String>,
        contents: Value,
    ) -> Self {
        Self {
            body: SegmentBody::Transcription {
                transcript: transcript.into(),
                alt_text: alt_text.into(),
                contents,
            },
            quick_reply: Vec::new(),
            sender: None,
        }
    }

    /// Card payload for card and transcription segments.
    pub fn contents(&self) -> Option<&Value> {
        match &self.body {
            SegmentBody::Text(_) => None,
            SegmentBody::Card { contents, .. } | SegmentBody::Transcription { contents, .. } => {
                Some(contents)
            }
        }
    }

    pub fn alt_text(&self) -> Option<&str> {
        match &self.body {
            SegmentBody::Text(_) => None,
            SegmentBody::Card { alt_text, .. } | SegmentBody::Transcription { alt_text, .. } => {
                Some(alt_text)
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.body {
            SegmentBody::Text(text) => Some(text),
            _ => None,
        }
    }
}
