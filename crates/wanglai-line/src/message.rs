// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message objects in the Messaging API's JSON shape.

use serde::Serialize;
use serde_json::Value;
use wanglai_core::{QuickAction, ReplySegment, SegmentBody, Sender};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineMessage {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<MessageSender>,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: Value,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    name: String,
    icon_url: String,
}

impl From<&Sender> for MessageSender {
    fn from(sender: &Sender) -> Self {
        Self {
            name: sender.name.clone(),
            icon_url: sender.icon_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    kind: &'static str,
    image_url: String,
    action: UriAction,
}

#[derive(Debug, Clone, Serialize)]
struct UriAction {
    #[serde(rename = "type")]
    kind: &'static str,
    label: String,
    uri: String,
}

impl From<&QuickAction> for QuickReplyItem {
    fn from(action: &QuickAction) -> Self {
        Self {
            kind: "action",
            image_url: action.image_url.clone(),
            action: UriAction {
                kind: "uri",
                label: action.label.clone(),
                uri: action.uri.clone(),
            },
        }
    }
}

impl From<&ReplySegment> for LineMessage {
    fn from(segment: &ReplySegment) -> Self {
        let quick_reply = (!segment.quick_reply.is_empty()).then(|| QuickReply {
            items: segment.quick_reply.iter().map(QuickReplyItem::from).collect(),
        });
        match &segment.body {
            SegmentBody::Text(text) => Self::Text {
                text: text.clone(),
                sender: segment.sender.as_ref().map(MessageSender::from),
                quick_reply,
            },
            SegmentBody::Card { alt_text, contents }
            | SegmentBody::Transcription {
                alt_text, contents, ..
            } => Self::Flex {
                alt_text: alt_text.clone(),
                contents: contents.clone(),
                quick_reply,
            },
        }
    }
}

pub fn to_messages(segments: &[ReplySegment]) -> Vec<LineMessage> {
    segments.iter().map(LineMessage::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_segment_without_quick_reply() {
        let msg = LineMessage::from(&ReplySegment::text("處理完成"));
        assert_eq!(
            serde_json::to_value(msg).unwrap(),
            json!({"type": "text", "text": "處理完成"})
        );
    }

    #[test]
    fn text_segment_with_sender_override() {
        let mut segment = ReplySegment::text("嗨");
        segment.sender = Some(Sender {
            name: "Cony".into(),
            icon_url: "https://example.com/cony.png".into(),
        });
        assert_eq!(
            serde_json::to_value(LineMessage::from(&segment)).unwrap(),
            json!({
                "type": "text",
                "text": "嗨",
                "sender": {"name": "Cony", "iconUrl": "https://example.com/cony.png"}
            })
        );
    }

    #[test]
    fn sender_is_dropped_on_cards() {
        let mut segment = ReplySegment::card("已為您記帳！", json!({"type": "bubble"}));
        segment.sender = Some(Sender {
            name: "Cony".into(),
            icon_url: "https://example.com/cony.png".into(),
        });
        let value = serde_json::to_value(LineMessage::from(&segment)).unwrap();
        assert!(value.get("sender").is_none());
    }

    #[test]
    fn card_segment_carries_quick_reply_items() {
        let mut segment = ReplySegment::card("已為您記帳！", json!({"type": "bubble"}));
        segment.quick_reply = vec![QuickAction {
            label: "明細".into(),
            uri: "https://liff.line.me/abc".into(),
            image_url: "https://example.com/icon.png".into(),
        }];
        let value = serde_json::to_value(LineMessage::from(&segment)).unwrap();
        assert_eq!(value["type"], "flex");
        assert_eq!(value["altText"], "已為您記帳！");
        assert_eq!(value["contents"]["type"], "bubble");
        let item = &value["quickReply"]["items"][0];
        assert_eq!(item["type"], "action");
        assert_eq!(item["imageUrl"], "https://example.com/icon.png");
        assert_eq!(item["action"], json!({"type": "uri", "label": "明細", "uri": "https://liff.line.me/abc"}));
    }

    #[test]
    fn transcription_becomes_flex() {
        let segment = ReplySegment::transcription("午餐", "語音訊息內容", json!({"type": "bubble"}));
        let value = serde_json::to_value(LineMessage::from(&segment)).unwrap();
        assert_eq!(value["type"], "flex");
        assert_eq!(value["altText"], "語音訊息內容");
    }
}
