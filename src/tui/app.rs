//! Application state and input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::{debug, info, instrument, warn};

use super::input::move_cursor;
use super::palette::Palette;
use crate::engine::{EngineError, RulesEngine};
use crate::games::tafl::{BasicEngine, Coordinate, geometry::center};
use crate::session::{GameSession, SessionError, SessionUpdate};
use crate::view::Transition;

/// Main application state.
#[derive(Debug)]
pub struct App<E = BasicEngine> {
    session: GameSession<E>,
    cursor: Coordinate,
    status_message: String,
    palette: Palette,
    should_quit: bool,
}

impl<E: RulesEngine> App<E> {
    /// Creates the app around a started session. The cursor starts on the
    /// throne.
    pub fn new(session: GameSession<E>, palette: Palette) -> Self {
        let cursor = center(session.dimension());
        let status_message = turn_message(&session);
        Self {
            session,
            cursor,
            status_message,
            palette,
            should_quit: false,
        }
    }

    /// The game session.
    pub fn session(&self) -> &GameSession<E> {
        &self.session
    }

    /// Keyboard cursor.
    pub fn cursor(&self) -> Coordinate {
        self.cursor
    }

    /// Current status line.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Colors in use.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Returns true once the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles a key press.
    #[instrument(skip(self, key), fields(code = ?key.code))]
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') => {
                info!("User quit");
                self.should_quit = true;
            }
            KeyCode::Char('n') => self.new_game(),
            KeyCode::Esc => {
                let transition = self.session.deselect();
                self.report_transition(transition);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(self.cursor),
            code => {
                self.cursor = move_cursor(self.cursor, code, self.session.dimension());
            }
        }
    }

    /// Handles a click on a board cell.
    #[instrument(skip(self))]
    pub fn handle_click(&mut self, coord: Coordinate) {
        self.cursor = coord;
        self.activate(coord);
    }

    fn activate(&mut self, coord: Coordinate) {
        match self.session.activate(coord) {
            Ok(transition) => self.report_transition(transition),
            Err(e) => self.report_error(e),
        }
    }

    fn new_game(&mut self) {
        let variant = self.session.variant();
        match self.session.new_game(variant) {
            Ok(()) => {
                self.cursor = center(self.session.dimension());
                self.status_message = format!("New game. {}", turn_message(&self.session));
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Applies queued engine results. Called once per frame.
    pub fn tick(&mut self) {
        let (updates, error) = match self.session.pump() {
            Ok(updates) => (updates, None),
            Err(e) => {
                let (updates, error) = e.into_parts();
                (updates, Some(error))
            }
        };
        for update in updates {
            self.report_update(update);
        }
        if let Some(error) = error {
            self.report_error(error);
        }
    }

    fn report_transition(&mut self, transition: Transition) {
        debug!(?transition, "Transition");
        self.status_message = match transition {
            Transition::Ignored(reason) => reason.to_string(),
            Transition::Selected {
                origin,
                destinations,
            } => format!("Selected {}: {} legal moves", origin, destinations),
            Transition::Deselected { origin } => {
                format!("Deselected {}. {}", origin, turn_message(&self.session))
            }
            Transition::CommitRequested { origin, dest } => {
                format!("Moving {} to {}...", origin, dest)
            }
        };
    }

    fn report_update(&mut self, update: SessionUpdate) {
        self.status_message = match update {
            SessionUpdate::MoveApplied { mover, captured: 0 } => {
                format!("{} moved. {}", mover, turn_message(&self.session))
            }
            SessionUpdate::MoveApplied { mover, captured } => format!(
                "{} captured {}. {}",
                mover,
                captured,
                turn_message(&self.session)
            ),
            SessionUpdate::GameOver(outcome) => format!(
                "{} wins! King at {}. Press 'n' for a new game or 'q' to quit.",
                outcome.winner, outcome.king
            ),
        };
    }

    fn report_error(&mut self, error: SessionError) {
        warn!(%error, "Session error");
        self.status_message = match &error {
            SessionError::Engine(EngineError::StaleDestination { .. }) => {
                "Move no longer legal, select again".to_string()
            }
            e if e.is_fatal() => format!("{}. Press 'n' to start over.", e),
            e => e.to_string(),
        };
    }
}

fn turn_message<E: RulesEngine>(session: &GameSession<E>) -> String {
    match session.outcome() {
        Some(outcome) => format!("{} won.", outcome.winner),
        None => format!("{} to move.", session.turn()),
    }
}
