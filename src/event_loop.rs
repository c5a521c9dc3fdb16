//! The single-threaded event loop.
//!
//! One logical thread: draw, poll for an event, process it fully, repeat.
//! Git and filesystem calls run synchronously inside key handling and block
//! the loop for their duration.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{poll, read, Event};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::handlers::keyboard::{handle_key_event, KeyAction};
use crate::ui::draw_ui;

/// How long to wait for input before redrawing (drives toast expiry).
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.toasts.update();

        terminal.draw(|f| draw_ui(f, app))?;

        if poll(POLL_INTERVAL)? {
            match read()? {
                Event::Key(key) => match handle_key_event(app, key) {
                    KeyAction::Continue => {}
                    KeyAction::Quit => return Ok(()),
                },
                // A resize is picked up by the next draw
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
