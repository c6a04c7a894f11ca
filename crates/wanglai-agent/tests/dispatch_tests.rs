// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch loop behaviour over mock collaborators.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wanglai_agent::admin::{
    DISABLED_REPLY, ENABLED_REPLY, FORWARDED_REPLY, STATUS_OFF_REPLY, STATUS_ON_REPLY,
};
use wanglai_agent::{
    AUDIO_FAILED, AUDIO_UNRECOGNIZED, BACKEND_UNAVAILABLE, CONY_ICON_URL, CONY_NAME, IMAGE_FAILED,
};
use wanglai_core::{BackendInput, SegmentBody};
use wanglai_line::{EventMessage, WebhookEvent, WebhookPayload};
use wanglai_test_utils::{MockAssetHost, MockBackend, MockTranscriber, Sent, TestHarness};

const RECORD_REPLY: &str = "以下是您本次的紀錄：\n```json\n{\"category\":\"餐飲\",\"amount\":120,\"memo\":\"午餐\",\"datetime\":\"2024-01-01\"}\n```\n[{\"id\":42}],[{\"type\": \"expense\"}]";

#[tokio::test]
async fn text_message_is_answered_through_reply_token() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec![RECORD_REPLY.to_string()])
        .build();
    harness.send_text("e1", "U1", "午餐 120").await;

    assert_eq!(harness.transport.loading_calls().await, vec!["U1".to_string()]);
    let calls = harness.backend.calls().await;
    assert_eq!(calls, vec![(BackendInput::Text("午餐 120".into()), "U1".into())]);

    let sent = harness.transport.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Reply { reply_token, segments } => {
            assert_eq!(reply_token, "rt-e1");
            assert_eq!(segments.len(), 2);
            assert!(matches!(segments[0].body, SegmentBody::Card { .. }));
            assert!(!segments[1].quick_reply.is_empty());
        }
        other => panic!("expected a reply, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_event_is_processed_once() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["好的".to_string()])
        .build();
    harness.send_text("dup", "U1", "hi").await;
    harness.send_text("dup", "U1", "hi").await;

    assert_eq!(harness.backend.calls().await.len(), 1);
    assert_eq!(harness.transport.sent().await.len(), 1);
}

#[tokio::test]
async fn failed_reply_falls_back_to_push() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["好的".to_string()])
        .build();
    harness.transport.fail_replies();
    harness.send_text("e1", "U1", "hi").await;

    let sent = harness.transport.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], Sent::Push { user_id, .. } if user_id == "U1"));
}

#[tokio::test]
async fn backend_failure_sends_apology() {
    let harness = TestHarness::builder()
        .with_backend(MockBackend::failing())
        .build();
    harness.send_text("e1", "U1", "hi").await;
    assert_eq!(
        harness.transport.delivered_texts().await,
        vec![BACKEND_UNAVAILABLE.to_string()]
    );
}

#[tokio::test]
async fn empty_backend_answer_sends_nothing() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["   ".to_string()])
        .build();
    harness.send_text("e1", "U1", "hi").await;
    assert!(harness.transport.sent().await.is_empty());
}

#[tokio::test]
async fn non_message_and_group_events_are_ignored() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["好的".to_string()])
        .build();
    let mut payload = TestHarness::message_payload(
        "e1",
        "U1",
        EventMessage::Text {
            id: "m1".into(),
            text: "hi".into(),
        },
    );
    payload.events[0].kind = "follow".to_string();
    let mut group: WebhookEvent = payload.events[0].clone();
    group.kind = "message".to_string();
    group.webhook_event_id = Some("e2".to_string());
    if let Some(source) = group.source.as_mut() {
        source.kind = "group".to_string();
    }
    payload.events.push(group);

    harness.dispatcher.handle_payload(payload).await;
    assert!(harness.backend.calls().await.is_empty());
    assert!(harness.transport.loading_calls().await.is_empty());
}

#[tokio::test]
async fn image_is_hosted_and_forwarded_by_url() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["這是一張收據".to_string()])
        .with_asset_host(MockAssetHost::with_url("https://cdn.example/receipt.jpg"))
        .build();
    harness.send_image("e1", "U1", vec![0xFF, 0xD8]).await;

    let calls = harness.backend.calls().await;
    assert_eq!(
        calls[0].0,
        BackendInput::ImageUrl("https://cdn.example/receipt.jpg".into())
    );
    assert_eq!(
        harness.transport.delivered_texts().await,
        vec!["這是一張收據".to_string()]
    );
}

#[tokio::test]
async fn image_upload_failure_sends_apology() {
    let harness = TestHarness::builder()
        .with_asset_host(MockAssetHost::failing())
        .build();
    harness.send_image("e1", "U1", vec![1]).await;
    assert!(harness.backend.calls().await.is_empty());
    assert_eq!(
        harness.transport.delivered_texts().await,
        vec![IMAGE_FAILED.to_string()]
    );
}

#[tokio::test]
async fn audio_transcript_leads_the_reply() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["已記錄午餐".to_string()])
        .with_transcriber(MockTranscriber::with_text("午餐一百二"))
        .build();
    harness.send_audio("e1", "U1", vec![0; 8]).await;

    let delivered = harness.transport.delivered().await;
    assert_eq!(delivered.len(), 2);
    match &delivered[0].body {
        SegmentBody::Transcription { transcript, .. } => assert_eq!(transcript, "午餐一百二"),
        other => panic!("expected transcription, got {other:?}"),
    }
    assert_eq!(delivered[1].as_text(), Some("已記錄午餐"));
}

#[tokio::test]
async fn audio_edge_cases() {
    let silent = TestHarness::builder()
        .with_transcriber(MockTranscriber::with_text("  "))
        .build();
    silent.send_audio("e1", "U1", vec![0]).await;
    assert_eq!(
        silent.transport.delivered_texts().await,
        vec![AUDIO_UNRECOGNIZED.to_string()]
    );

    let broken = TestHarness::builder()
        .with_transcriber(MockTranscriber::failing())
        .build();
    broken.send_audio("e1", "U1", vec![0]).await;
    assert_eq!(
        broken.transport.delivered_texts().await,
        vec![AUDIO_FAILED.to_string()]
    );
}

#[tokio::test]
async fn admin_push_mode_relays_messages() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["backend".to_string()])
        .with_admin("Uadmin", "Utarget")
        .build();

    harness.send_text("e1", "Uadmin", "Push狀態").await;
    harness.send_text("e2", "Uadmin", "開啟Push模式").await;
    harness.send_text("e3", "Uadmin", "Push狀態").await;
    harness.send_text("e4", "Uadmin", "明天放假").await;
    harness.send_text("e5", "Uadmin", "關閉Push模式").await;
    harness.send_text("e6", "Uadmin", "午餐 100").await;

    let sent = harness.transport.sent().await;
    let forwarded = sent.iter().find_map(|s| match s {
        Sent::Push { user_id, segments } if user_id == "Utarget" => {
            segments[0].as_text().map(str::to_string)
        }
        _ => None,
    });
    assert_eq!(forwarded.as_deref(), Some("管理員消息: 明天放假"));

    let replies: Vec<String> = sent
        .iter()
        .filter(|s| matches!(s, Sent::Reply { .. }))
        .filter_map(|s| s.segments()[0].as_text().map(str::to_string))
        .collect();
    assert_eq!(
        replies,
        vec![
            STATUS_OFF_REPLY.to_string(),
            ENABLED_REPLY.to_string(),
            STATUS_ON_REPLY.to_string(),
            FORWARDED_REPLY.to_string(),
            DISABLED_REPLY.to_string(),
            "backend".to_string(),
        ]
    );
    // Only the last message reached the backend.
    assert_eq!(harness.backend.calls().await.len(), 1);
}

#[tokio::test]
async fn admin_replies_keep_their_exact_wording() {
    let harness = TestHarness::builder()
        .with_admin("Uadmin", "Utarget")
        .build();

    harness.send_text("e1", "Uadmin", "開啟Push模式").await;
    harness.send_text("e2", "Uadmin", "Push狀態").await;
    harness.send_text("e3", "Uadmin", "關閉Push模式").await;
    harness.send_text("e4", "Uadmin", "Push狀態").await;

    assert_eq!(
        harness.transport.delivered_texts().await,
        vec![
            "已開啟 Push 模式。您發送的所有消息將被轉發給目標用戶。".to_string(),
            "Push 模式目前已開啟".to_string(),
            "已關閉 Push 模式。".to_string(),
            "Push 模式目前已關閉".to_string(),
        ]
    );
}

#[tokio::test]
async fn admin_commands_from_other_users_go_to_backend() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["backend".to_string()])
        .with_admin("Uadmin", "Utarget")
        .build();
    harness.send_text("e1", "Ustranger", "開啟Push模式").await;
    assert_eq!(harness.backend.calls().await.len(), 1);
}

#[tokio::test]
async fn cony_mention_switches_text_sender() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec![RECORD_REPLY.to_string(), "好的".to_string()])
        .build();
    harness.send_text("e1", "U1", "Cony 午餐 120").await;
    harness.send_text("e2", "U1", "午餐 120").await;

    let delivered = harness.transport.delivered().await;
    assert_eq!(delivered.len(), 3);

    // The record card keeps the bot's own identity.
    assert!(matches!(delivered[0].body, SegmentBody::Card { .. }));
    assert!(delivered[0].sender.is_none());

    let sender = delivered[1].sender.as_ref().expect("text segment carries the persona");
    assert_eq!(sender.name, CONY_NAME);
    assert_eq!(sender.icon_url, CONY_ICON_URL);

    // Without the mention the next reply goes out as the bot.
    assert_eq!(delivered[2].as_text(), Some("好的"));
    assert!(delivered[2].sender.is_none());
}

#[tokio::test]
async fn cony_mention_is_case_sensitive_and_skips_admin_replies() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["好的".to_string()])
        .with_admin("Uadmin", "Utarget")
        .build();
    harness.send_text("e1", "U1", "cony 在嗎").await;
    harness.send_text("e2", "Uadmin", "開啟Push模式").await;
    harness.send_text("e3", "Uadmin", "Cony 明天見").await;

    let sent = harness.transport.sent().await;
    assert!(
        sent.iter()
            .flat_map(|s| s.segments())
            .all(|segment| segment.sender.is_none())
    );
    assert_eq!(harness.backend.calls().await.len(), 1);
}

#[tokio::test]
async fn worker_drains_queue_and_stops_on_cancel() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["好的".to_string()])
        .build();
    let (tx, rx) = mpsc::channel::<WebhookPayload>(4);
    let cancel = CancellationToken::new();

    let dispatcher = harness.dispatcher.clone();
    let worker_cancel = cancel.clone();
    let worker = tokio::spawn(async move { dispatcher.run(rx, worker_cancel).await });

    let payload = TestHarness::message_payload(
        "e1",
        "U1",
        EventMessage::Text {
            id: "m1".into(),
            text: "hi".into(),
        },
    );
    tx.send(payload).await.unwrap();

    for _ in 0..50 {
        if !harness.transport.sent().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(harness.transport.sent().await.len(), 1);

    cancel.cancel();
    worker.await.unwrap();
}
