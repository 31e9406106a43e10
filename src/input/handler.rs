//! Input event handler for polling and processing keyboard events.

use super::keys::{map_key_event, InputEvent};
use crate::session::QuerySession;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Stdin};
use std::time::Duration;
use termion::event::Event;
use termion::input::{Events, TermRead};

/// Event source for reading terminal events.
///
/// Wraps the events iterator to maintain its state across multiple calls,
/// preventing character loss during rapid input (paste).
enum EventSource {
    /// Reading from stdin
    Stdin(Events<Stdin>),
    /// Reading from /dev/tty (when stdin was piped)
    Tty(Events<File>),
}

/// Polls terminal events and applies them to the query session.
pub struct InputHandler {
    events: EventSource,
}

impl InputHandler {
    /// Creates a new InputHandler that reads from stdin.
    pub fn new() -> Self {
        Self {
            events: EventSource::Stdin(io::stdin().events()),
        }
    }

    /// Creates a new InputHandler that reads from /dev/tty.
    /// Use this when stdin has been consumed for piped data.
    pub fn new_with_tty() -> Result<Self> {
        let tty_file = File::options()
            .read(true)
            .write(true)
            .open("/dev/tty")
            .context("Failed to open /dev/tty for keyboard input")?;

        Ok(Self {
            events: EventSource::Tty(tty_file.events()),
        })
    }

    /// Polls for a terminal event.
    ///
    /// Returns Some(Event) if an event occurred, None otherwise.
    pub fn poll_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        match &mut self.events {
            EventSource::Stdin(events) => {
                if let Some(event_result) = events.next() {
                    return Ok(Some(event_result?));
                }
            }
            EventSource::Tty(events) => {
                if let Some(event_result) = events.next() {
                    return Ok(Some(event_result?));
                }
            }
        }

        Ok(None)
    }

    /// Handles a terminal event and updates the session.
    ///
    /// Returns Ok(true) if the application should quit.
    pub fn handle_event(&mut self, event: Event, session: &mut QuerySession) -> Result<bool> {
        match map_key_event(event) {
            InputEvent::Quit => return Ok(true),
            InputEvent::Submit => session.submit(),
            InputEvent::Complete => session.complete(),
            InputEvent::SelectNext => session.select_next(),
            InputEvent::SelectPrev => session.select_prev(),
            InputEvent::HistoryPrev => session.history_prev(),
            InputEvent::HistoryNext => session.history_next(),
            InputEvent::ClearInput => session.clear_input(),
            InputEvent::Backspace => session.backspace(),
            InputEvent::Char(c) => session.insert_char(c),
            InputEvent::Unknown => {}
        }

        Ok(false)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
