// SPDX-FileCopyrightText: 2026 Wanglai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Wanglai pipeline.
//!
//! The first group drives a TestHarness over mock collaborators. The second
//! wires the real gateway router, a temp SQLite ledger, and the dispatch
//! worker together, with only the LINE transport and the backend mocked.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use wanglai_agent::{Collaborators, Dispatcher};
use wanglai_config::model::{StorageConfig, WanglaiConfig};
use wanglai_core::{
    BackendInput, KeyValueStore, MemoryStore, SegmentBody, TransactionRecord, TransactionType,
};
use wanglai_gateway::{GatewayState, SIGNATURE_HEADER, router};
use wanglai_line::{EventMessage, LineSignatureVerifier, WebhookPayload};
use wanglai_storage::SqliteStorage;
use wanglai_test_utils::{MockBackend, MockTransport, Sent, TestHarness};

const SECRET: &str = "e2e-channel-secret";

const RECORD_REPLY: &str = "以下是您本次的紀錄：\n```json\n[{\"category\":\"交通\",\"amount\":35,\"memo\":\"捷運\",\"datetime\":\"2026-03-14\"},{\"category\":\"餐飲\",\"amount\":80,\"memo\":\"早餐\",\"datetime\":\"2026-03-14\"}]\n```\n[{\"id\":7},{\"id\":8}],[{\"type\": \"expense\"}]";

// ---- Harness pipeline ----

#[tokio::test]
async fn test_record_reply_becomes_cards_then_text() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec![RECORD_REPLY.to_string()])
        .build();

    harness.send_text("e1", "U1", "捷運35 早餐80").await;

    let delivered = harness.transport.delivered().await;
    assert_eq!(delivered.len(), 3);
    assert!(matches!(delivered[0].body, SegmentBody::Card { .. }));
    assert!(matches!(delivered[1].body, SegmentBody::Card { .. }));
    let text = delivered[2].as_text().unwrap();
    assert!(text.contains("[{\"type\": \"expense\"}]"));
    assert!(!text.contains("\"id\""));

    // Quick replies ride on the last segment only.
    assert!(delivered[0].quick_reply.is_empty());
    assert!(delivered[1].quick_reply.is_empty());
    assert_eq!(delivered[2].quick_reply.len(), 3);
}

#[tokio::test]
async fn test_conversation_turns_are_answered_in_order() {
    let harness = TestHarness::builder()
        .with_backend_replies(vec!["第一則".to_string(), "第二則".to_string()])
        .build();

    harness.send_text("e1", "U1", "hi").await;
    harness.send_text("e2", "U1", "again").await;

    assert_eq!(
        harness.transport.delivered_texts().await,
        vec!["第一則".to_string(), "第二則".to_string()]
    );
    let calls = harness.backend.calls().await;
    assert_eq!(calls[1], (BackendInput::Text("again".into()), "U1".into()));
}

// ---- Gateway, ledger, and worker wired together ----

struct Stack {
    transport: Arc<MockTransport>,
    backend: Arc<MockBackend>,
    storage: Arc<SqliteStorage>,
    dispatcher: Arc<Dispatcher>,
    _dir: tempfile::TempDir,
}

async fn stack(replies: Vec<String>) -> Stack {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(SqliteStorage::new(StorageConfig {
        database_path: dir.path().join("ledger.db").display().to_string(),
    }));
    storage.initialize().await.unwrap();

    let transport = Arc::new(MockTransport::new());
    let backend = Arc::new(MockBackend::with_replies(replies));
    let state: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut config = WanglaiConfig::default();
    config.reply.liff_id = "e2e-liff".to_string();

    let dispatcher = Arc::new(Dispatcher::new(
        Collaborators {
            transport: transport.clone(),
            backend: backend.clone(),
            store: storage.clone(),
            state,
            transcriber: None,
            assets: None,
        },
        &config,
    ));

    Stack {
        transport,
        backend,
        storage,
        dispatcher,
        _dir: dir,
    }
}

fn signed_request(payload: &WebhookPayload) -> Request<Body> {
    let body = serde_json::to_vec(payload).unwrap();
    let signature = LineSignatureVerifier::new(SECRET).sign(&body);
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap()
}

fn text_payload(event_id: &str, user_id: &str, text: &str) -> WebhookPayload {
    TestHarness::message_payload(
        event_id,
        user_id,
        EventMessage::Text {
            id: format!("m-{event_id}"),
            text: text.to_string(),
        },
    )
}

/// Posts each payload through the router, then lets the worker drain the queue.
async fn deliver(stack: &Stack, payloads: &[WebhookPayload]) -> Vec<StatusCode> {
    let (tx, rx) = mpsc::channel(16);
    let app = router(
        GatewayState {
            inbound_tx: tx,
            verifier: Arc::new(LineSignatureVerifier::new(SECRET)),
        },
        "/webhook",
    );

    let mut statuses = Vec::new();
    for payload in payloads {
        let response = app.clone().oneshot(signed_request(payload)).await.unwrap();
        statuses.push(response.status());
    }
    // Dropping the router closes the queue so the worker exits once drained.
    drop(app);

    stack.dispatcher.run(rx, CancellationToken::new()).await;
    statuses
}

fn local_today() -> String {
    (chrono::Utc::now() + chrono::Duration::hours(8))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_signed_webhook_lists_seeded_categories() {
    let stack = stack(vec!["分類".to_string()]).await;

    let statuses = deliver(&stack, &[text_payload("c1", "U1", "我的分類")]).await;
    assert_eq!(statuses, vec![StatusCode::OK]);

    let sent = stack.transport.sent().await;
    assert_eq!(sent.len(), 1);
    let Sent::Reply { reply_token, segments } = &sent[0] else {
        panic!("expected a reply, got {:?}", sent[0]);
    };
    assert_eq!(reply_token, "rt-c1");
    assert_eq!(segments.len(), 1);
    let card = segments[0].contents().unwrap().to_string();
    assert!(card.contains("餐飲"));
    assert!(card.contains("薪資"));
}

#[tokio::test]
async fn test_monthly_summary_reads_the_ledger() {
    let stack = stack(vec!["月支出總結".to_string()]).await;
    let lunch = TransactionRecord {
        category: "餐飲".to_string(),
        amount: Some(120.0),
        memo: "午餐".to_string(),
        datetime: local_today(),
        transaction_type: TransactionType::Expense,
        ..Default::default()
    };
    stack.storage.insert_transaction("U1", &lunch).await.unwrap();

    deliver(&stack, &[text_payload("s1", "U1", "這個月花了多少")]).await;

    let delivered = stack.transport.delivered().await;
    assert_eq!(delivered.len(), 1);
    let card = delivered[0].contents().unwrap().to_string();
    assert!(card.contains("$ 120"));
    assert!(card.contains("餐飲"));
}

#[tokio::test]
async fn test_redelivered_webhook_is_answered_once() {
    let stack = stack(vec!["好的".to_string()]).await;
    let payload = text_payload("r1", "U1", "hi");

    let statuses = deliver(&stack, &[payload.clone(), payload]).await;
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::OK]);

    assert_eq!(stack.backend.calls().await.len(), 1);
    assert_eq!(stack.transport.delivered_texts().await, vec!["好的".to_string()]);
}

#[tokio::test]
async fn test_forged_webhook_never_reaches_the_backend() {
    let stack = stack(vec!["好的".to_string()]).await;
    let (tx, rx) = mpsc::channel(4);
    let app = router(
        GatewayState {
            inbound_tx: tx,
            verifier: Arc::new(LineSignatureVerifier::new(SECRET)),
        },
        "/webhook",
    );

    let body = serde_json::to_vec(&text_payload("f1", "U1", "hi")).unwrap();
    let forged = LineSignatureVerifier::new("someone-else").sign(&body);
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(SIGNATURE_HEADER, forged)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    stack.dispatcher.run(rx, CancellationToken::new()).await;
    assert!(stack.backend.calls().await.is_empty());
    assert!(stack.transport.sent().await.is_empty());
}
