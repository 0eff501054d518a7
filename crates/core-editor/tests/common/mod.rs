#![allow(dead_code)]

use core_editor::Editor;
use core_term::FixedSize;

/// Editor writing into a byte sink with fixed terminal dimensions and a
/// constant prompt, the harness for every integration test.
pub fn editor(width: u16, height: u16, prompt: &'static str) -> Editor<Vec<u8>, FixedSize> {
    Editor::new(
        Vec::new(),
        FixedSize(width, height),
        Box::new(move |_, _| prompt.to_string()),
    )
}

/// Take everything emitted so far as a string.
pub fn drain(ed: &mut Editor<Vec<u8>, FixedSize>) -> String {
    String::from_utf8(std::mem::take(ed.sink_mut())).expect("editor output is utf-8")
}
