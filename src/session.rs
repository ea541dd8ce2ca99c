//! Game session: the single owner of board, selection, captures and turn.
//!
//! Activations and engine results are applied one at a time on the caller's
//! task. Engine callbacks arrive through the [`EngineNotifier`] inbox and are
//! only applied by [`GameSession::pump`] or [`GameSession::settle`], so no
//! activation can interleave with a half-applied update.

use crate::engine::{EngineError, EngineEvent, EngineNotifier, RulesEngine, StampedEvent};
use crate::games::tafl::{
    BoardSnapshot, Coordinate, CoverageError, Dimension, GameOutcome, InvalidDimension, Player,
    Variant,
};
use crate::view::{
    BoardView, CaptureTracker, EndgameMarker, IgnoreReason, SelectionState,
    SelectionStateMachine, Transition, TurnTracker,
};
use derive_more::{Display, Error, From};
use derive_getters::Getters;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Default time allowed for the engine to answer a commit.
pub const DEFAULT_COMMIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Per-session behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct SessionSettings {
    /// How long a commit may wait for the engine.
    commit_timeout: Duration,
    /// Side on turn when a game starts.
    first_player: Player,
}

impl SessionSettings {
    /// Creates settings.
    pub fn new(commit_timeout: Duration, first_player: Player) -> Self {
        Self {
            commit_timeout,
            first_player,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_TIMEOUT, Player::Black)
    }
}

/// Engine-driven change applied to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A move was applied and the turn passed.
    MoveApplied {
        /// Side that moved.
        mover: Player,
        /// Enemy pieces taken by that move.
        captured: u32,
    },
    /// The game ended.
    GameOver(GameOutcome),
}

/// Failure surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// The engine refused a request (including stale destinations).
    #[display("Engine error: {}", _0)]
    Engine(EngineError),

    /// A commit got no answer in time. The selection was cleared.
    #[display("Engine did not answer within {:?}", waited)]
    #[from(ignore)]
    EngineUnresponsive {
        /// Configured timeout.
        waited: Duration,
    },

    /// A snapshot did not cover the board. The session is aborted.
    #[display("Dimension mismatch: {}", _0)]
    DimensionMismatch(CoverageError),

    /// The engine reported an unusable board size. The session is aborted.
    #[display("Engine reported {}", _0)]
    InvalidDimension(InvalidDimension),
}

impl SessionError {
    /// Fatal errors abort the session until a new game starts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::DimensionMismatch(_) | SessionError::InvalidDimension(_)
        )
    }
}

/// A drain of the engine inbox that stopped on an error.
///
/// Events applied before the failure stay applied; they are returned here so
/// the caller can still report them.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Getters)]
#[display("{}", error)]
pub struct PumpError {
    /// Updates applied before the failure.
    applied: Vec<SessionUpdate>,
    /// What stopped the drain.
    #[error(source)]
    error: SessionError,
}

impl PumpError {
    /// Splits into the applied updates and the error.
    pub fn into_parts(self) -> (Vec<SessionUpdate>, SessionError) {
        (self.applied, self.error)
    }

    /// Drops the applied updates and keeps the error.
    pub fn into_error(self) -> SessionError {
        self.error
    }
}

impl From<SessionError> for PumpError {
    fn from(error: SessionError) -> Self {
        Self {
            applied: Vec::new(),
            error,
        }
    }
}

/// One game instance in front of one rules engine.
#[derive(Debug)]
pub struct GameSession<E> {
    engine: E,
    notifier: EngineNotifier,
    inbox: mpsc::UnboundedReceiver<StampedEvent>,
    settings: SessionSettings,
    variant: Variant,
    view: BoardView,
    selection: SelectionStateMachine,
    captures: CaptureTracker,
    turn: TurnTracker,
    endgame: EndgameMarker,
    commit_deadline: Option<Instant>,
    aborted: bool,
}

impl<E: RulesEngine> GameSession<E> {
    /// Attaches to `engine` and starts a game of `variant`.
    #[instrument(skip(engine))]
    pub fn start(
        mut engine: E,
        settings: SessionSettings,
        variant: Variant,
    ) -> Result<Self, SessionError> {
        let (notifier, inbox) = EngineNotifier::channel();
        engine.attach(notifier.clone());
        let (view, _) = Self::open_board(&mut engine, variant)?;
        let mut session = Self {
            engine,
            notifier,
            inbox,
            settings,
            variant,
            view,
            selection: SelectionStateMachine::new(),
            captures: CaptureTracker::new(),
            turn: TurnTracker::new(*settings.first_player()),
            endgame: EndgameMarker::new(),
            commit_deadline: None,
            aborted: false,
        };
        session.discard_stale_events();
        info!(dimension = %session.view.dimension(), "Session started");
        Ok(session)
    }

    fn open_board(engine: &mut E, variant: Variant) -> Result<(BoardView, BoardSnapshot), SessionError> {
        let (snapshot, side) = engine.new_game(variant)?;
        let dimension = Dimension::new(side).inspect_err(|e| {
            error!(error = %e, "Engine reported invalid dimension");
        })?;
        let mut view = BoardView::new(dimension);
        view.apply_snapshot(&snapshot).inspect_err(|e| {
            error!(error = %e, "Initial snapshot does not cover the board");
        })?;
        Ok((view, snapshot))
    }

    /// Starts a fresh game, resetting captures, turn, selection and outcome.
    ///
    /// On failure the previous board stays visible but the session is
    /// aborted. Either way, results still owed for the old game are dropped.
    #[instrument(skip(self))]
    pub fn new_game(&mut self, variant: Variant) -> Result<(), SessionError> {
        self.notifier.advance();
        match Self::open_board(&mut self.engine, variant) {
            Ok((view, _)) => {
                self.view = view;
                self.variant = variant;
                self.selection = SelectionStateMachine::new();
                self.captures.reset();
                self.turn.reset(*self.settings.first_player());
                self.endgame.reset();
                self.commit_deadline = None;
                self.aborted = false;
                self.discard_stale_events();
                info!(dimension = %self.view.dimension(), "New game");
                Ok(())
            }
            Err(e) => {
                if e.is_fatal() {
                    self.abort();
                }
                Err(e)
            }
        }
    }

    fn discard_stale_events(&mut self) {
        let mut dropped = 0;
        while self.inbox.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Discarded events from a previous game");
        }
    }

    fn abort(&mut self) {
        warn!("Aborting session");
        self.selection.reset(&mut self.view);
        self.commit_deadline = None;
        self.aborted = true;
    }

    /// Handles a cell activation.
    #[instrument(skip(self))]
    pub fn activate(&mut self, coord: Coordinate) -> Result<Transition, SessionError> {
        let ignored = if self.aborted {
            Some(IgnoreReason::SessionAborted)
        } else if self.endgame.is_over() {
            Some(IgnoreReason::GameOver)
        } else if !coord.within(self.view.dimension()) {
            Some(IgnoreReason::OutOfBounds)
        } else if self.selection.is_committing() {
            Some(IgnoreReason::CommitPending)
        } else {
            None
        };
        if let Some(reason) = ignored {
            debug!(%reason, "Activation ignored");
            return Ok(Transition::Ignored(reason));
        }

        let transition = self
            .selection
            .activate(coord, &mut self.view, &mut self.engine)?;
        if let Transition::CommitRequested { .. } = transition {
            self.commit_deadline = Some(Instant::now() + *self.settings.commit_timeout());
        }
        Ok(transition)
    }

    /// Drops the current selection, if any, unless a commit is in flight.
    #[instrument(skip(self))]
    pub fn deselect(&mut self) -> Transition {
        match self.selection.state() {
            SelectionState::Selected(selection) if selection.committing().is_none() => {
                let origin = selection.origin();
                self.selection.reset(&mut self.view);
                Transition::Deselected { origin }
            }
            SelectionState::Selected(_) => Transition::Ignored(IgnoreReason::CommitPending),
            SelectionState::Idle => Transition::Ignored(IgnoreReason::NothingSelected),
        }
    }

    /// Applies every engine event already queued, then checks the commit
    /// deadline.
    ///
    /// Stops at the first error; updates applied before it are carried in
    /// the [`PumpError`].
    #[instrument(skip(self))]
    pub fn pump(&mut self) -> Result<Vec<SessionUpdate>, PumpError> {
        let mut applied = Vec::new();
        while let Ok(stamped) = self.inbox.try_recv() {
            match self.apply_event(stamped) {
                Ok(update) => applied.extend(update),
                Err(error) => return Err(PumpError { applied, error }),
            }
        }
        if let Some(deadline) = self.commit_deadline {
            if Instant::now() >= deadline {
                let error = self.time_out();
                return Err(PumpError { applied, error });
            }
        }
        Ok(applied)
    }

    /// Waits for the pending commit's result (bounded by the commit timeout)
    /// and applies it along with anything else queued.
    #[instrument(skip(self))]
    pub async fn settle(&mut self) -> Result<Vec<SessionUpdate>, PumpError> {
        let mut applied = Vec::new();
        while let Some(deadline) = self.commit_deadline {
            let error = match tokio::time::timeout_at(deadline, self.inbox.recv()).await {
                Ok(Some(stamped)) => match self.apply_event(stamped) {
                    Ok(update) => {
                        applied.extend(update);
                        continue;
                    }
                    Err(e) => e,
                },
                Ok(None) => {
                    warn!("Engine notifier dropped with a commit in flight");
                    self.time_out()
                }
                Err(_) => self.time_out(),
            };
            return Err(PumpError { applied, error });
        }
        match self.pump() {
            Ok(more) => {
                applied.extend(more);
                Ok(applied)
            }
            Err(PumpError {
                applied: more,
                error,
            }) => {
                applied.extend(more);
                Err(PumpError { applied, error })
            }
        }
    }

    fn time_out(&mut self) -> SessionError {
        let waited = *self.settings.commit_timeout();
        warn!(?waited, "Engine unresponsive, clearing selection");
        self.commit_deadline = None;
        self.selection.reset(&mut self.view);
        SessionError::EngineUnresponsive { waited }
    }

    fn apply_event(&mut self, stamped: StampedEvent) -> Result<Option<SessionUpdate>, SessionError> {
        let current = self.notifier.generation();
        if stamped.generation != current {
            debug!(
                generation = stamped.generation,
                current, "Dropping engine event from an earlier game"
            );
            return Ok(None);
        }
        if self.aborted {
            debug!("Session aborted, dropping engine event");
            return Ok(None);
        }
        match stamped.event {
            EngineEvent::MoveApplied { .. } if self.endgame.is_over() => {
                debug!("Game is over, dropping engine move");
                Ok(None)
            }
            EngineEvent::MoveApplied {
                snapshot,
                black_captured,
                white_captured,
            } => self
                .apply_move(&snapshot, black_captured, white_captured)
                .map(Some),
            EngineEvent::GameOver(outcome) => Ok(self
                .endgame
                .apply(outcome, &mut self.view)
                .then_some(SessionUpdate::GameOver(outcome))),
        }
    }

    #[instrument(skip(self, snapshot))]
    fn apply_move(
        &mut self,
        snapshot: &BoardSnapshot,
        black_captured: u32,
        white_captured: u32,
    ) -> Result<SessionUpdate, SessionError> {
        if let Err(e) = snapshot.check_coverage(self.view.dimension()) {
            error!(error = %e, "Engine snapshot does not cover the board");
            self.abort();
            return Err(e.into());
        }
        if self.commit_deadline.is_none() {
            debug!("Applying engine move not requested by this session");
        }

        let mover = self.turn.current();
        let captured = self.captures.record(mover, black_captured, white_captured);
        self.view.apply_snapshot(snapshot)?;
        self.selection.reset(&mut self.view);
        self.commit_deadline = None;
        self.turn.toggle();
        info!(?mover, captured, "Move applied");
        Ok(SessionUpdate::MoveApplied { mover, captured })
    }

    /// The rendered board.
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Current selection state.
    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Returns true while a commit waits for the engine.
    pub fn is_commit_pending(&self) -> bool {
        self.selection.is_committing()
    }

    /// Side to move.
    pub fn turn(&self) -> Player {
        self.turn.current()
    }

    /// Capture counters and tallies.
    pub fn captures(&self) -> &CaptureTracker {
        &self.captures
    }

    /// Outcome, once the game has ended.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.endgame.outcome()
    }

    /// Returns true after a fatal error until a new game starts.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Board side length.
    pub fn dimension(&self) -> Dimension {
        self.view.dimension()
    }

    /// Variant being played.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Session settings.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The rules engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the rules engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
