//! Terminal UI for Strictly Tafl.

mod app;
mod input;
mod palette;
mod ui;

pub use app::App;
pub use input::{cell_at, move_cursor};
pub use palette::Palette;
pub use ui::{CELL_WIDTH, draw, grid_rect};

use crate::config::TaflConfig;
use crate::games::tafl::BasicEngine;
use crate::session::GameSession;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const FRAME: Duration = Duration::from_millis(50);

/// Runs the board UI until the user quits.
pub async fn run_tui(config: TaflConfig) -> Result<()> {
    // Log to file; stdout belongs to the terminal
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,strictly_tafl=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(variant = %config.variant(), "Starting Strictly Tafl TUI");

    let palette = config.palette().resolve()?;
    let engine = BasicEngine::with_first_player(*config.first_player());
    let session = GameSession::start(engine, config.session_settings(), *config.variant())?;
    let mut app = App::new(session, palette);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

#[instrument(skip_all)]
async fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    let grid = grid_rect(area, app.session().dimension());
                    match cell_at(grid, mouse.column, mouse.row, app.session().dimension()) {
                        Some(coord) => app.handle_click(coord),
                        None => debug!(column = mouse.column, row = mouse.row, "Click outside board"),
                    }
                }
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
        tokio::task::yield_now().await;
    }
}
