//! Blocking input thread bridging crossterm events into the async loop.
//!
//! One producer, one consumer: the reader parks on `blocking_send` when the
//! bounded channel fills rather than dropping events, so no keystroke is
//! ever lost to backpressure.

use crossterm::event::Event as TermEvent;
use tokio::sync::mpsc::Sender;
use tracing::error;

pub const EVENT_CHANNEL_CAP: usize = 1024;

pub fn spawn_input_thread(tx: Sender<TermEvent>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(target: "input", ?e, "event_read_error");
                    break;
                }
            }
        }
    })
}
