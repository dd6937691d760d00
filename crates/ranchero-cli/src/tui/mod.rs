//! Terminal user interface for the ranch dashboard.
//!
//! Single-threaded, event-driven: crossterm events plus a periodic tick
//! drive a [`app::DashboardApp`] until the user quits. Mouse capture is on
//! so the map view gets real hover and click.
//!
//! ## Entry point
//!
//! - [`run_dashboard`] — full-screen dashboard over a loaded store.

pub mod app;
pub mod create_dialog;
pub mod map_view;

use anyhow::{Context, Result};
use app::DashboardApp;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ranchero_core::config::ProjectConfig;
use ranchero_core::store::RanchStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

/// Event poll interval; also the tick cadence for status message expiry.
const TICK_RATE: Duration = Duration::from_millis(200);

/// Restores the terminal even when the event loop errors out.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// Run the dashboard until the user quits.
pub fn run_dashboard(store: RanchStore, config: &ProjectConfig, operator: String) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let _guard = TerminalGuard;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut app = DashboardApp::new(store, config, operator);
    while !app.should_quit() {
        terminal
            .draw(|frame| app.render(frame))
            .context("draw frame")?;

        if event::poll(TICK_RATE).context("poll events")? {
            match event::read().context("read event")? {
                Event::Key(key) if key.kind != event::KeyEventKind::Release => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        app.tick();
    }

    Ok(())
}
