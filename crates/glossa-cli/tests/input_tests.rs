use glossa_cli::input::{InputBuffer, InputHistory};

// ========================================================================
// InputBuffer
// ========================================================================

#[test]
fn test_insert_and_edit_multibyte() {
    let mut input = InputBuffer::new();
    for c in "你好世界".chars() {
        input.insert_char(c);
    }
    assert_eq!(input.cursor(), 4);

    input.move_left();
    input.move_left();
    input.backspace();
    assert_eq!(input.text(), "你世界");
    assert_eq!(input.cursor(), 1);

    input.delete();
    assert_eq!(input.text(), "你界");

    input.insert_str("们的");
    assert_eq!(input.text(), "你们的界");
    assert_eq!(input.cursor(), 3);
}

#[test]
fn test_backspace_and_delete_at_edges() {
    let mut input = InputBuffer::new();
    input.backspace();
    input.delete();
    assert!(input.is_empty());

    input.set("ab");
    input.delete();
    assert_eq!(input.text(), "ab");
    input.move_right();
    assert_eq!(input.cursor(), 2);
}

#[test]
fn test_newline_and_cursor_position() {
    let mut input = InputBuffer::new();
    input.insert_str("first");
    input.newline();
    input.insert_str("第二");

    assert_eq!(input.text(), "first\n第二");
    assert_eq!(input.line_count(), 2);
    assert_eq!(input.cursor_row_col(), (1, 2));
    assert_eq!(input.text_before_cursor_on_line(), "第二");
}

#[test]
fn test_home_and_end_stay_on_current_line() {
    let mut input = InputBuffer::new();
    input.set("one\ntwo three");

    input.move_home();
    assert_eq!(input.cursor_row_col(), (1, 0));
    assert_eq!(input.cursor(), 4);

    input.move_end();
    assert_eq!(input.cursor(), input.text().chars().count());

    for _ in 0..10 {
        input.move_left();
    }
    assert_eq!(input.cursor_row_col(), (0, 3));
    input.move_home();
    assert_eq!(input.cursor(), 0);
    input.move_end();
    assert_eq!(input.cursor(), 3);
}

#[test]
fn test_clear_resets_cursor() {
    let mut input = InputBuffer::new();
    input.set("hello");

    input.clear();
    assert!(input.is_empty());
    assert_eq!(input.cursor(), 0);
}

// ========================================================================
// InputHistory
// ========================================================================

#[test]
fn test_history_navigation() {
    let mut history = InputHistory::new();
    assert_eq!(history.older(), None);

    history.push("one".into());
    history.push("two".into());
    history.push("three".into());

    assert_eq!(history.older(), Some("three"));
    assert_eq!(history.older(), Some("two"));
    assert_eq!(history.older(), Some("one"));
    assert_eq!(history.older(), Some("one"));

    assert_eq!(history.newer(), Some("two"));
    assert_eq!(history.newer(), Some("three"));
    assert_eq!(history.newer(), Some(""));
    assert_eq!(history.newer(), None);
}

#[test]
fn test_history_skips_consecutive_duplicates() {
    let mut history = InputHistory::new();
    history.push("same".into());
    history.push("same".into());
    history.push("other".into());
    history.push("same".into());

    assert_eq!(history.len(), 3);
}

#[test]
fn test_push_resets_position() {
    let mut history = InputHistory::new();
    history.push("a".into());
    history.push("b".into());
    history.older();
    history.older();

    history.push("c".into());
    assert_eq!(history.older(), Some("c"));
}
