// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply Assembler for the Wanglai bot.
//!
//! Turns one backend reply into the ordered list of segments sent back to
//! the user: an optional transcription echo, then cards, then the cleaned
//! remainder text. The list is capped at the configured segment limit and
//! only its last segment carries the quick-reply shortcuts. Assembly never
//! fails; collaborator errors become apology text.

pub mod command;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use wanglai_cards as cards;
use wanglai_config::model::ReplyConfig;
use wanglai_core::{
    BackendReply, MAX_SEGMENTS_PER_CALL, QuickAction, ReplySegment, TransactionStore,
    TransactionType,
};
use wanglai_summary::SummaryAggregator;

pub use command::{Command, classify};

pub const TUTORIAL_FAILED: &str = "無法顯示教學文檔。請重新嘗試或聯繫客服。";
pub const SUMMARY_FAILED: &str = "抱歉，無法生成摘要報告。";
pub const NO_CATEGORIES: &str = "目前還沒有分類數據，請先創建一些分類。";
pub const CATEGORIES_FAILED: &str = "抱歉，無法取得分類列表，請稍後再試。";
/// Sent when a reply produced no cards and no text.
pub const NOTHING_TO_SHOW: &str = "處理完成";

pub const BALANCE_ALT_TEXT: &str = "💰 餘額";
pub const SUMMARY_ALT_TEXT: &str = "📊 收支總結";
pub const RECORD_ALT_TEXT: &str = "已為您記帳！";
pub const INCOME_ALT_TEXT: &str = "已為您記錄收入！";
pub const EXPENSE_ALT_TEXT: &str = "已為您記錄支出！";

/// Alt-text for a record card.
///
/// A readable label decides on its own, keeping the generic text when it
/// names neither side. The reply-wide type is used only when the card has
/// no label to read.
pub fn record_alt_text(card: &Value, fallback: Option<TransactionType>) -> &'static str {
    match cards::record_label(card) {
        Some(label) if label.contains("收入") => INCOME_ALT_TEXT,
        Some(label) if label.contains("支出") => EXPENSE_ALT_TEXT,
        Some(_) => RECORD_ALT_TEXT,
        None => match fallback {
            Some(TransactionType::Income) => INCOME_ALT_TEXT,
            Some(TransactionType::Expense) => EXPENSE_ALT_TEXT,
            None => RECORD_ALT_TEXT,
        },
    }
}

/// Cards and text produced for one reply, before ordering and capping.
#[derive(Debug, Default)]
struct Content {
    cards: Vec<ReplySegment>,
    text: Option<String>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            cards: Vec::new(),
            text: Some(text.into()),
        }
    }
}

pub struct ReplyAssembler {
    summary: SummaryAggregator,
    store: Arc<dyn TransactionStore>,
    liff_id: String,
    max_segments: usize,
    quick_replies: Vec<QuickAction>,
}

impl ReplyAssembler {
    pub fn new(config: &ReplyConfig, store: Arc<dyn TransactionStore>, utc_offset_hours: i32) -> Self {
        Self {
            summary: SummaryAggregator::new(store.clone(), utc_offset_hours),
            store,
            liff_id: config.liff_id.clone(),
            max_segments: config.max_segments.clamp(1, MAX_SEGMENTS_PER_CALL),
            quick_replies: config.quick_replies.clone(),
        }
    }

    /// Builds the outbound segments for `reply`, sent on behalf of `user_id`.
    ///
    /// An empty reply with no transcript yields no segments at all.
    pub async fn assemble(&self, reply: &BackendReply, user_id: &str) -> Vec<ReplySegment> {
        let text = reply.text();
        let command = classify(text);
        let transcript = reply.transcript().map(str::trim).filter(|t| !t.is_empty());
        if command == Command::Empty && transcript.is_none() {
            debug!(user_id, "empty backend reply, nothing to send");
            return Vec::new();
        }

        let content = self.content(command, text, user_id).await;

        let mut segments = Vec::with_capacity(content.cards.len() + 2);
        if let Some(transcript) = transcript {
            match cards::render_transcription(transcript) {
                Ok(card) => segments.push(ReplySegment::transcription(
                    transcript,
                    cards::TRANSCRIPTION_ALT_TEXT,
                    card,
                )),
                Err(e) => warn!(error = %e, "transcription card failed to render"),
            }
        }
        segments.extend(content.cards);
        if let Some(text) = content.text.filter(|t| !t.trim().is_empty()) {
            segments.push(ReplySegment::text(text));
        }
        if segments.is_empty() {
            segments.push(ReplySegment::text(NOTHING_TO_SHOW));
        }

        self.finish(segments)
    }

    async fn content(&self, command: Command, text: &str, user_id: &str) -> Content {
        match command {
            Command::Tutorial => tutorial(),
            Command::Balance { exact } => match self.balance(user_id).await {
                Some(card) => Content {
                    cards: vec![card],
                    text: (!exact).then(|| wanglai_extract::clean_message_text(text)),
                },
                None => self.transaction(text),
            },
            Command::Empty => Content::default(),
            Command::Summary(keyword) => self.summary(keyword, user_id).await,
            Command::Categories => self.categories(user_id).await,
            Command::Transaction => self.transaction(text),
        }
    }

    async fn balance(&self, user_id: &str) -> Option<ReplySegment> {
        let keyword = command::BALANCE_KEYWORD;
        let dataset = self.summary.aggregate(user_id, keyword, keyword).await;
        match cards::render_balance_summary(&dataset) {
            Ok(card) => Some(ReplySegment::card(BALANCE_ALT_TEXT, card)),
            Err(e) => {
                warn!(error = %e, "balance card failed to render, treating reply as a transaction");
                None
            }
        }
    }

    async fn summary(&self, keyword: &str, user_id: &str) -> Content {
        if let Some(caption) = self.summary.caption(keyword) {
            debug!(%caption, "summary period resolved");
        }
        let dataset = self.summary.aggregate(user_id, keyword, keyword).await;
        match cards::render_summary(&dataset) {
            Ok(card) => Content {
                cards: vec![ReplySegment::card(SUMMARY_ALT_TEXT, card)],
                text: None,
            },
            Err(e) => {
                warn!(error = %e, keyword, "summary card failed to render");
                Content::text(SUMMARY_FAILED)
            }
        }
    }

    async fn categories(&self, user_id: &str) -> Content {
        let lists = match self.store.query_categories(user_id).await {
            Ok(lists) => lists,
            Err(e) => {
                warn!(error = %e, user_id, "category query failed");
                return Content::text(CATEGORIES_FAILED);
            }
        };
        match cards::render_category_list(&lists) {
            Ok(Some(card)) => Content {
                cards: vec![ReplySegment::card(cards::CATEGORY_ALT_TEXT, card)],
                text: None,
            },
            Ok(None) => Content::text(NO_CATEGORIES),
            Err(e) => {
                warn!(error = %e, "category card failed to render");
                Content::text(CATEGORIES_FAILED)
            }
        }
    }

    fn transaction(&self, text: &str) -> Content {
        let extraction = wanglai_extract::extract(text, self.summary.today());
        let cards = extraction
            .records
            .iter()
            .map(|record| {
                let card = cards::render_record(record, &self.liff_id);
                let alt = record_alt_text(&card, Some(extraction.transaction_type));
                ReplySegment::card(alt, card)
            })
            .collect();
        Content {
            cards,
            text: Some(wanglai_extract::clean_message_text(text)),
        }
    }

    fn finish(&self, mut segments: Vec<ReplySegment>) -> Vec<ReplySegment> {
        if segments.len() > self.max_segments {
            debug!(
                produced = segments.len(),
                limit = self.max_segments,
                "truncating reply segments"
            );
            segments.truncate(self.max_segments);
        }
        if let Some(last) = segments.last_mut() {
            last.quick_reply = self.quick_replies.clone();
        }
        for (index, segment) in segments.iter().enumerate() {
            if let Some(contents) = segment.contents() {
                if !cards::is_well_formed(contents) {
                    warn!(index, "card segment payload is not well-formed");
                }
            }
        }
        segments
    }
}

fn tutorial() -> Content {
    match cards::tutorial_cards() {
        Ok(parts) => Content {
            cards: parts
                .into_iter()
                .map(|(alt, card)| ReplySegment::card(alt, card))
                .collect(),
            text: None,
        },
        Err(e) => {
            warn!(error = %e, "tutorial cards failed to render");
            Content::text(TUTORIAL_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alt_text_prefers_card_label() {
        let card = json!({"body": {"contents": [{"contents": [{}, {"contents": [{"text": "固定收入"}]}]}]}});
        assert_eq!(
            record_alt_text(&card, Some(TransactionType::Expense)),
            INCOME_ALT_TEXT
        );
    }

    #[test]
    fn alt_text_falls_back_to_reply_type() {
        let card = json!({"type": "bubble"});
        assert_eq!(
            record_alt_text(&card, Some(TransactionType::Income)),
            INCOME_ALT_TEXT
        );
        assert_eq!(record_alt_text(&card, None), RECORD_ALT_TEXT);
    }

    #[test]
    fn alt_text_keeps_default_for_neutral_label() {
        let card = json!({"body": {"contents": [{"contents": [{}, {"contents": [{"text": "轉帳"}]}]}]}});
        assert_eq!(
            record_alt_text(&card, Some(TransactionType::Income)),
            RECORD_ALT_TEXT
        );
        assert_eq!(
            record_alt_text(&card, Some(TransactionType::Expense)),
            RECORD_ALT_TEXT
        );
    }

    #[test]
    fn alt_text_treats_non_string_label_as_missing() {
        let card = json!({"body": {"contents": [{"contents": [{}, {"contents": [{"text": 7}]}]}]}});
        assert_eq!(
            record_alt_text(&card, Some(TransactionType::Expense)),
            EXPENSE_ALT_TEXT
        );
    }
}
