//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! draw ─► poll input (timeout) ─► update() ─► Scheduler::dispatch
//!   ▲                                                   │
//!   └──── Scheduler::pump ◄── rx.try_recv() ◄───────────┘
//! ```
//!
//! Exactly one input or result message is processed at a time. The loop
//! never awaits a remote call: results arrive as envelopes on `rx`.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: polls every ~80ms so the spinner keeps moving.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::core::action::{Action, init_command, update};
use crate::core::state::App;
use crate::export::Exporter;
use crate::scheduler::{Flow, Scheduler};
use crate::store::ProjectStore;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableBracketedPaste, Hide)?;
        info!("Terminal modes enabled (bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, Show);
    }
}

/// Runs the interactive session until the operator quits.
///
/// Must be called from inside a tokio runtime: the scheduler spawns its
/// tasks on the current runtime handle.
pub fn run(
    store: Arc<dyn ProjectStore>,
    exporter: Arc<dyn Exporter>,
    operation_timeout: Duration,
) -> std::io::Result<()> {
    let mut app = App::new();

    // Channel for result envelopes from background tasks
    let (tx, rx) = mpsc::channel();
    let mut scheduler = Scheduler::new(
        tokio::runtime::Handle::current(),
        store,
        exporter,
        tx,
        operation_timeout,
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut should_quit = scheduler.dispatch(init_command(&mut app)) == Flow::Quit;
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading() { ANIMATION_POLL } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout)?;

        // Process first event + drain ALL pending events before next draw
        let mut next = first_event;
        while let Some(event) = next.take() {
            needs_redraw = true;
            if let TuiEvent::Key(input) = event {
                let cmd = update(&mut app, Action::Input(input));
                if scheduler.dispatch(cmd) == Flow::Quit {
                    should_quit = true;
                    break;
                }
            }
            next = poll_event_immediate()?;
        }

        if should_quit {
            break;
        }

        // Handle background task results
        while let Ok(envelope) = rx.try_recv() {
            needs_redraw = true;
            if scheduler.pump(&mut app, envelope) == Flow::Quit {
                should_quit = true;
                break;
            }
        }
    }

    debug!("Leaving event loop on {:?}", app.screen);
    scheduler.shutdown();
    ratatui::restore();
    Ok(())
}
