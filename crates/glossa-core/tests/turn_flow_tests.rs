//! End to end: session + real GeminiClient + history file, against a stub endpoint.

use glossa_core::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::unbounded_channel;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_nihao_example_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-lite:generateContent"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "你好"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let history = dir.path().join("chat_history.json");
    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let mut session = ChatSession::open(
        ConversationStore::new(&history),
        Arc::new(client),
        "instruction",
    );

    let (tx, mut rx) = unbounded_channel();
    session.spawn_turn("你好", tx).unwrap();
    let record = session.finish_turn(rx.recv().await.unwrap()).unwrap();

    assert!(!record.failed);
    assert_eq!(record.user.text(), "你好");
    assert_eq!(record.reply.text(), "Hello");

    let raw = std::fs::read_to_string(&history).unwrap();
    assert!(raw.contains("你好"));
    let saved: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        saved,
        json!([
            {"role": "user", "parts": [{"text": "你好"}]},
            {"role": "model", "parts": [{"text": "Hello"}]}
        ])
    );
}

#[tokio::test]
async fn test_server_error_becomes_inline_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let history = dir.path().join("chat_history.json");
    let client = GeminiClient::new("test-key").with_base_url(server.uri());
    let mut session = ChatSession::open(
        ConversationStore::new(&history),
        Arc::new(client),
        "instruction",
    );

    let record = session.send("hello").await.unwrap();
    assert!(record.failed);
    assert_eq!(record.reply.text(), "Error: API error (500): internal");

    // The error reply is persisted like any other.
    let reloaded = ConversationStore::new(&history).load();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.messages()[1].role(), Role::Model);
}

#[tokio::test]
async fn test_transport_failure_keeps_api_key_out_of_history() {
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let dir = TempDir::new().unwrap();
    let history = dir.path().join("chat_history.json");
    let client = GeminiClient::new("SECRET-KEY-123").with_base_url(uri);
    let mut session = ChatSession::open(
        ConversationStore::new(&history),
        Arc::new(client),
        "instruction",
    );

    let record = session.send("hi").await.unwrap();
    assert!(record.failed);
    assert!(record.reply.text().starts_with("Error: "));
    assert!(!record.reply.text().contains("SECRET-KEY-123"));

    let raw = std::fs::read_to_string(&history).unwrap();
    assert!(!raw.contains("SECRET-KEY-123"));
    assert!(!raw.contains("key="));
}
