//! Quill entrypoint: a minimal read-eval-print shell around the expression
//! editor. "Eval" is just an echo; the point is driving the editor the way a
//! real REPL would, with raw-mode input on a dedicated thread, a
//! continuation rule on Enter, keyword completion in the header, and syntax
//! color on the painted expression.

use anyhow::Result;
use clap::Parser;
use core_editor::Editor;
use core_term::{HostSize, RawModeGuard};
use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::info;

mod config;
mod input;
mod syntax;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Multi-line expression editor demo")]
struct Args {
    /// Optional configuration file path (overrides discovery of `quill.toml`).
    #[arg(long = "config")]
    config: Option<std::path::PathBuf>,
    /// Disable syntax coloring regardless of configuration.
    #[arg(long = "no-color")]
    no_color: bool,
}

type HostEditor = Editor<std::io::Stdout, HostSize>;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn prompt_for(line: usize, colored: bool) -> String {
    let plain = if line == 0 { "quill> " } else { "     > " };
    if colored {
        format!("\x1b[36m{plain}\x1b[0m")
    } else {
        plain.to_string()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // File logging to quill.log (non-blocking; stdout belongs to the editor).
    let log_dir = std::path::Path::new(".");
    let log_path = log_dir.join("quill.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, "quill.log");
    let (nb_writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .init();
    info!(target: "runtime", "startup");

    // Log panics before the raw-mode guard's Drop restores the terminal.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(target: "runtime.panic", ?panic_info, "panic");
        default_panic(panic_info);
    }));

    let args = Args::parse();
    let cfg = config::load_from(args.config.clone())?;

    let _raw = RawModeGuard::enter()?;

    let (tx, mut rx) = mpsc::channel::<TermEvent>(input::EVENT_CHANNEL_CAP);
    let _input_handle = input::spawn_input_thread(tx);

    // Completion hint shared between the key handler and the header callback.
    let hint = Arc::new(Mutex::new(String::new()));
    let header_hint = hint.clone();

    let mut editor: HostEditor = Editor::new(std::io::stdout(), HostSize, Box::new(prompt_for));
    editor.set_color(cfg.color.enabled && !args.no_color);
    editor.set_highlight(Box::new(|src| syntax::colorize(src)));
    editor.set_header(Box::new(move |buf, _| match header_hint.lock() {
        Ok(h) if !h.is_empty() => {
            buf.push_str(&h);
            buf.push_str("\r\n");
            1
        }
        _ => 0,
    }));
    editor.set_width_override(cfg.terminal.width.map(usize::from));
    editor.set_height_override(cfg.terminal.height.map(usize::from));

    editor.prompt_next()?;

    while let Some(event) = rx.recv().await {
        match event {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                if handle_key(&mut editor, &hint, key)? == Flow::Quit {
                    break;
                }
            }
            TermEvent::Resize(_, _) => editor.update(|_| {})?,
            _ => {}
        }
    }
    info!(target: "runtime", "shutdown");
    Ok(())
}

fn handle_key(editor: &mut HostEditor, hint: &Arc<Mutex<String>>, key: KeyEvent) -> Result<Flow> {
    if key.code != KeyCode::Tab
        && let Ok(mut h) = hint.lock()
    {
        h.clear();
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            editor.update(|e| e.clear_expression())?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if editor.expression().is_empty() {
                editor.end_editing(None)?;
                return Ok(Flow::Quit);
            }
            editor.update(|e| e.delete())?;
        }
        KeyCode::Char(c)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            editor.update(|e| e.insert_char(c))?;
        }
        KeyCode::Enter => {
            let expression = editor.expression().to_string();
            if syntax::is_incomplete(&expression) || !editor.cursor_on_last_line() {
                let indent = syntax::open_depth(&editor.expression_before_cursor());
                editor.update(move |e| e.insert_new_line(indent))?;
            } else {
                submit(editor)?;
            }
        }
        KeyCode::Backspace => editor.update(|e| e.back())?,
        KeyCode::Delete => editor.update(|e| e.delete())?,
        KeyCode::Left => {
            editor.move_cursor_left()?;
        }
        KeyCode::Right => {
            editor.move_cursor_right()?;
        }
        KeyCode::Up => {
            editor.move_cursor_up()?;
        }
        KeyCode::Down => {
            editor.move_cursor_down()?;
        }
        KeyCode::Home => editor.move_to_begin()?,
        KeyCode::End => editor.move_to_end()?,
        KeyCode::PageUp => editor.scroll_up()?,
        KeyCode::PageDown => editor.scroll_down()?,
        KeyCode::Tab => {
            let before = editor.expression_before_cursor();
            let word: String = before
                .chars()
                .rev()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let matches = syntax::keyword_completions(&word);
            if !matches.is_empty()
                && let Ok(mut h) = hint.lock()
            {
                *h = format!("tab: {}", matches.join(" "));
            }
            editor.update(|_| {})?;
        }
        _ => {}
    }
    Ok(Flow::Continue)
}

fn submit(editor: &mut HostEditor) -> Result<()> {
    editor.end_editing(None)?;
    let expression = editor.expression().to_string();
    info!(target: "repl", expr = %expression, "submit");
    let out = editor.sink_mut();
    write!(out, "=> {}\r\n", expression.replace('\n', " "))?;
    out.flush()?;
    editor.prompt_next()?;
    Ok(())
}
