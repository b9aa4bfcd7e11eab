use glossa_core::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> ConversationStore {
    ConversationStore::new(dir.path().join("chat_history.json"))
}

fn sample_conversation() -> Conversation {
    let mut conv = Conversation::new();
    conv.push_turn(Message::user("你好"), Message::model("Hello"));
    conv.push_turn(
        Message::user("résumé"),
        Message::model("CV; a summary of one's career"),
    );
    conv
}

// ========================================================================
// Loading
// ========================================================================

#[test]
fn test_load_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(store.load().is_empty());
}

#[test]
fn test_load_corrupt_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "{ not json").unwrap();

    assert!(store.load().is_empty());
}

#[test]
fn test_load_wrong_shape_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), r#"{"role": "user", "parts": [{"text": "x"}]}"#).unwrap();

    assert!(store.load().is_empty());
}

#[test]
fn test_load_file_written_by_hand() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(
        store.path(),
        r#"[
  {"role": "user", "parts": [{"text": "bonjour"}]},
  {"role": "model", "parts": [{"text": "你好"}, {"text": "ignored"}]}
]"#,
    )
    .unwrap();

    let conv = store.load();
    assert_eq!(conv.len(), 2);
    assert_eq!(conv.messages()[0], Message::user("bonjour"));
    assert_eq!(conv.messages()[1], Message::model("你好"));
}

// ========================================================================
// Saving
// ========================================================================

#[test]
fn test_save_then_load_preserves_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let conv = sample_conversation();

    store.save(&conv).unwrap();
    assert_eq!(store.load(), conv);
}

#[test]
fn test_resave_reproduces_same_json() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_conversation()).unwrap();
    let first: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();

    let loaded = store.load();
    store.save(&loaded).unwrap();
    let second: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_save_overwrites_whole_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&sample_conversation()).unwrap();

    let mut short = Conversation::new();
    short.push_turn(Message::user("a"), Message::model("b"));
    store.save(&short).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw.as_array().map(|a| a.len()), Some(2));
}

#[test]
fn test_save_into_unwritable_location_errors() {
    let dir = TempDir::new().unwrap();
    // A regular file where a directory is expected.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let store = ConversationStore::new(blocker.join("chat_history.json"));

    assert!(store.save(&sample_conversation()).is_err());
}
