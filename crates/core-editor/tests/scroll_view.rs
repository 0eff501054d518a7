//! Bottom-anchored viewport behavior: clamping, manual scrolling, automatic
//! scroll-into-view, header interplay, and full-view painting.

mod common;

use common::{drain, editor};

#[test]
fn viewport_of_one_row_shows_only_the_continuation_row() {
    let mut ed = editor(10, 1, "prompt>");
    ed.update(|e| e.insert_str("0123456789")).unwrap();
    assert_eq!(ed.expression_height(), 2);
    assert_eq!(ed.scroll_offset(), 0);
    let out = drain(&mut ed);
    assert!(out.contains("3456789"), "continuation row painted: {out:?}");
    assert!(!out.contains("012\r"), "first row stays hidden: {out:?}");
    assert!(!out.contains("prompt>"), "prompt row stays hidden: {out:?}");
}

#[test]
fn scroll_up_reveals_the_first_row_and_clamps() {
    let mut ed = editor(10, 1, "prompt>");
    ed.update(|e| e.insert_str("0123456789")).unwrap();
    drain(&mut ed);
    ed.scroll_up().unwrap();
    assert_eq!(ed.scroll_offset(), 1);
    let out = drain(&mut ed);
    assert!(out.contains("prompt>012"), "first row painted: {out:?}");
    ed.scroll_up().unwrap();
    assert_eq!(ed.scroll_offset(), 1, "offset clamps at the top");
    assert!(drain(&mut ed).is_empty(), "clamped scroll repaints nothing");
    ed.scroll_down().unwrap();
    assert_eq!(ed.scroll_offset(), 0);
    let out = drain(&mut ed);
    assert!(out.contains("3456789"));
}

#[test]
fn tall_expression_keeps_the_cursor_visible() {
    let mut ed = editor(20, 3, "> ");
    ed.update(|e| e.insert_str("l0\nl1\nl2\nl3\nl4\nl5")).unwrap();
    let out = drain(&mut ed);
    assert!(out.contains("l3") && out.contains("l4") && out.contains("l5"));
    assert!(!out.contains("l0"));
    ed.move_cursor_to(0, 0).unwrap();
    assert_eq!(ed.scroll_offset(), 3);
    let out = drain(&mut ed);
    assert!(out.contains("> l0"), "window followed the cursor: {out:?}");
    assert!(out.contains("l2"));
    assert!(!out.contains("l5"));
}

#[test]
fn stepping_up_across_the_window_edge_scrolls_first() {
    let mut ed = editor(20, 2, "> ");
    ed.update(|e| e.insert_str("a0\na1\na2\na3")).unwrap();
    // window shows the last two lines, cursor on the last
    ed.move_cursor_up().unwrap();
    assert_eq!(ed.scroll_offset(), 0, "still inside the window");
    ed.move_cursor_up().unwrap();
    assert_eq!(ed.scroll_offset(), 1, "window slid up one row");
    let out = drain(&mut ed);
    assert!(out.contains("> a1"));
    ed.move_cursor_up().unwrap();
    assert_eq!(ed.scroll_offset(), 2);
    assert_eq!(ed.cursor(), (2, 0));
}

#[test]
fn offset_stays_within_bounds_as_the_expression_shrinks() {
    let mut ed = editor(20, 2, "> ");
    ed.update(|e| e.insert_str("b0\nb1\nb2\nb3")).unwrap();
    ed.scroll_up().unwrap();
    ed.scroll_up().unwrap();
    assert_eq!(ed.scroll_offset(), 2);
    ed.replace(vec!["b0".to_string()]).unwrap();
    assert!(ed.scroll_offset() <= ed.expression_height());
    assert_eq!(ed.scroll_offset(), 0);
}

#[test]
fn header_rows_shrink_the_viewport() {
    let mut ed = editor(20, 3, "> ");
    ed.set_header(Box::new(|buf, _| {
        buf.push_str("completions: none\r\n");
        1
    }));
    ed.update(|e| e.insert_str("h0\nh1\nh2")).unwrap();
    assert_eq!(ed.header_height(), 1);
    let out = drain(&mut ed);
    assert!(out.contains("completions: none"));
    // two viewport rows remain for three expression rows
    assert!(out.contains("h1") && out.contains("h2"));
    assert!(!out.contains("h0"));
}

#[test]
fn end_editing_paints_the_full_expression() {
    let mut ed = editor(10, 1, "prompt>");
    ed.update(|e| e.insert_str("0123456789")).unwrap();
    drain(&mut ed);
    ed.end_editing(None).unwrap();
    let out = drain(&mut ed);
    assert!(out.contains("prompt>012"), "full view includes the first row");
    assert!(out.contains("3456789"));
    assert!(out.ends_with("\r\n"), "a final feed detaches the prompt");
}

#[test]
fn end_editing_can_substitute_the_buffer() {
    let mut ed = editor(40, 6, "> ");
    ed.update(|e| e.insert_str("draft")).unwrap();
    drain(&mut ed);
    ed.end_editing(Some(vec!["final".to_string(), "form".to_string()]))
        .unwrap();
    assert_eq!(ed.lines(), ["final", "form"]);
    assert_eq!(ed.cursor(), (4, 1));
    let out = drain(&mut ed);
    assert!(out.contains("> final"));
    assert!(out.contains("> form"));
}

#[test]
fn prompt_next_resets_the_session() {
    let mut ed = editor(20, 2, "> ");
    ed.update(|e| e.insert_str("x0\nx1\nx2")).unwrap();
    ed.scroll_up().unwrap();
    ed.end_editing(None).unwrap();
    drain(&mut ed);
    ed.prompt_next().unwrap();
    assert_eq!(ed.lines(), [""]);
    assert_eq!(ed.cursor(), (0, 0));
    assert_eq!(ed.scroll_offset(), 0);
    assert_eq!(ed.header_height(), 0);
    assert_eq!(drain(&mut ed), "> ");
}
