mod actions;
mod app;
mod event;
mod input_handler;
mod theme;
mod ui;
pub mod widgets;

use crate::config::Config;
use crate::error::{ChatbookError, Result};
pub use app::App;

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

/// Frame interval while the list animates or has unflushed reports
const ANIMATION_FRAME: Duration = Duration::from_millis(16);

fn tui_error(e: impl std::fmt::Display) -> ChatbookError {
    ChatbookError::Tui(e.to_string())
}

/// Run the TUI application
pub fn run(config: Config) -> Result<()> {
    // Batch fetches and replies run here; the UI stays on this thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("chatbook-worker")
        .enable_time()
        .build()?;

    // Setup terminal
    enable_raw_mode().map_err(tui_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(tui_error)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(tui_error)?;

    // Create app and run
    let events = event::EventHandler::new(config.tick_rate());
    let mut app = App::new(config, runtime.handle().clone(), events.sender());
    let res = terminal
        .size()
        .map_err(tui_error)
        .and_then(|size| {
            app.on_resize(Rect::new(0, 0, size.width, size.height));
            run_app(&mut terminal, &mut app, &events)
        });

    // Restore terminal
    disable_raw_mode().map_err(tui_error)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(tui_error)?;
    terminal.show_cursor().map_err(tui_error)?;

    // Pending fetches are dropped; their completions report an abort
    runtime.shutdown_background();
    tracing::info!("chatbook exited");

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &event::EventHandler,
) -> Result<()> {
    while app.running {
        app.frame(Instant::now());
        terminal
            .draw(|f| ui::render(f, app))
            .map_err(tui_error)?;

        let Some(event) = events.next_timeout(input_timeout(app, Instant::now()))? else {
            continue;
        };
        app.handle_event(event, Instant::now())?;
        // Coalesce bursts (wheel spins, key repeat) into one frame
        for event in events.drain() {
            app.handle_event(event, Instant::now())?;
        }
    }

    Ok(())
}

/// How long to wait for input before the list needs another frame
fn input_timeout(app: &App, now: Instant) -> Option<Duration> {
    app.list.next_frame_in(now, ANIMATION_FRAME)
}
