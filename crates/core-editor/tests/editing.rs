//! Edit primitive semantics through the public envelope.

mod common;

use common::editor;

#[test]
fn builds_a_two_line_expression() {
    let mut ed = editor(80, 24, "prompt>");
    ed.update(|e| {
        e.insert_str("puts \"World\"");
        e.insert_new_line(1);
        e.insert_str("puts \"!\"");
    })
    .unwrap();
    assert_eq!(ed.lines(), ["puts \"World\"", "  puts \"!\""]);
    assert_eq!(ed.cursor(), (10, 1));
    assert_eq!(ed.expression(), "puts \"World\"\n  puts \"!\"");
}

#[test]
fn inserts_into_the_previous_line_after_navigation() {
    let mut ed = editor(80, 24, "prompt>");
    ed.update(|e| {
        e.insert_str("puts \"World\"");
        e.insert_new_line(1);
        e.insert_str("puts \"!\"");
    })
    .unwrap();
    assert!(ed.move_cursor_up().unwrap());
    for _ in 0..4 {
        assert!(ed.move_cursor_left().unwrap());
    }
    ed.update(|e| e.insert_str("Hello ")).unwrap();
    assert_eq!(ed.lines()[0], "puts \"Hello World\"");
    assert_eq!(ed.cursor(), (12, 0));
}

#[test]
fn backspace_to_empty() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("abc")).unwrap();
    assert_eq!(ed.cursor(), (3, 0));
    ed.update(|e| {
        e.back();
        e.back();
        e.back();
    })
    .unwrap();
    assert_eq!(ed.lines(), [""]);
    assert_eq!(ed.cursor(), (0, 0));
}

#[test]
fn backspace_across_empty_lines() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| {
        e.insert_new_line(0);
        e.insert_new_line(0);
    })
    .unwrap();
    assert_eq!(ed.lines(), ["", "", ""]);
    assert_eq!(ed.cursor(), (0, 2));
    ed.update(|e| {
        e.back();
        e.back();
    })
    .unwrap();
    assert_eq!(ed.lines(), [""]);
    assert_eq!(ed.cursor(), (0, 0));
}

#[test]
fn back_right_after_insert_restores_everything() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("hello\nworld")).unwrap();
    let lines = ed.lines().to_vec();
    let cursor = ed.cursor();
    ed.update(|e| {
        e.insert_char('q');
        e.back();
    })
    .unwrap();
    assert_eq!(ed.lines(), lines.as_slice());
    assert_eq!(ed.cursor(), cursor);
}

#[test]
fn back_right_after_plain_new_line_restores_everything() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("hello")).unwrap();
    ed.move_cursor_left().unwrap();
    let lines = ed.lines().to_vec();
    let cursor = ed.cursor();
    ed.update(|e| {
        e.insert_new_line(0);
        e.back();
    })
    .unwrap();
    assert_eq!(ed.lines(), lines.as_slice());
    assert_eq!(ed.cursor(), cursor);
}

#[test]
fn indented_new_line_unwinds_with_one_back_per_character() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("ab")).unwrap();
    let lines = ed.lines().to_vec();
    let cursor = ed.cursor();
    ed.update(|e| e.insert_new_line(2)).unwrap();
    assert_eq!(ed.lines(), ["ab", "    "]);
    ed.update(|e| {
        for _ in 0..5 {
            e.back();
        }
    })
    .unwrap();
    assert_eq!(ed.lines(), lines.as_slice());
    assert_eq!(ed.cursor(), cursor);
}

#[test]
fn control_characters_are_dropped() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("a\tb\u{7}c\rd")).unwrap();
    assert_eq!(ed.lines(), ["abcd"]);
}

#[test]
fn line_feed_in_a_string_becomes_a_line_break() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("a\nb")).unwrap();
    assert_eq!(ed.lines(), ["a", "b"]);
    assert_eq!(ed.cursor(), (1, 1));
}

#[test]
fn delete_joins_with_the_next_line() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("ab\ncd")).unwrap();
    ed.move_cursor_to(2, 0).unwrap();
    ed.update(|e| e.delete()).unwrap();
    assert_eq!(ed.lines(), ["abcd"]);
    assert_eq!(ed.cursor(), (2, 0));
}

#[test]
fn replace_and_clear() {
    let mut ed = editor(80, 24, "> ");
    ed.replace(vec!["first".to_string(), "second".to_string()])
        .unwrap();
    assert_eq!(ed.lines(), ["first", "second"]);
    ed.update(|e| e.clear_expression()).unwrap();
    assert_eq!(ed.lines(), [""]);
    assert_eq!(ed.cursor(), (0, 0));
}

#[test]
fn cursor_clamps_when_the_buffer_shrinks() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("abcdef\nghijkl")).unwrap();
    assert_eq!(ed.cursor(), (6, 1));
    ed.update(|e| e.replace_buffer(vec!["xy".to_string()])).unwrap();
    assert_eq!(ed.cursor(), (2, 0));
}

#[test]
fn expression_before_cursor_cuts_at_the_cursor() {
    let mut ed = editor(80, 24, "> ");
    ed.update(|e| e.insert_str("abc\ndef")).unwrap();
    ed.move_cursor_to(1, 1).unwrap();
    assert_eq!(ed.expression_before_cursor(), "abc\nd");
    assert_eq!(ed.expression_before(2, 0), "ab");
}
