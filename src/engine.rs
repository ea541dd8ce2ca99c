//! Rules engine contract and the callback sink it reports through.
//!
//! The board front-end never decides legality itself. It asks an engine for
//! legal destinations, submits moves, and redraws from whatever the engine
//! pushes back through a [`GameObserver`].

use crate::games::tafl::{BoardSnapshot, Coordinate, GameOutcome, Player, Variant};
use derive_more::{Display, Error};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Callback sink the engine notifies after it applies a move.
pub trait GameObserver {
    /// A committed move was applied; `snapshot` is the full new board.
    ///
    /// `black_captured` and `white_captured` are running totals of black and
    /// white pieces lost this game.
    fn on_move_applied(&mut self, snapshot: BoardSnapshot, black_captured: u32, white_captured: u32);

    /// The game ended.
    fn on_game_over(&mut self, winner: Player, king: Coordinate);
}

/// Rules engine consumed by a game session.
pub trait RulesEngine {
    /// Registers the callback sink. Called once when the session is built.
    fn attach(&mut self, notifier: EngineNotifier);

    /// Starts a new game and returns its initial board and side length.
    fn new_game(&mut self, variant: Variant) -> Result<(BoardSnapshot, usize), EngineError>;

    /// Legal destinations for the piece at `origin`.
    ///
    /// Empty if there is no piece, it is not that side's turn, or the piece
    /// is blocked.
    fn legal_destinations(&self, origin: Coordinate) -> BTreeSet<Coordinate>;

    /// Submits a move. Results arrive through the attached notifier, either
    /// before this returns or later. Late results go through a notifier
    /// pinned with [`EngineNotifier::pinned`] when the move was accepted.
    fn commit_move(&mut self, start: Coordinate, dest: Coordinate) -> Result<(), EngineError>;
}

/// Notification pushed by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A committed move was applied.
    MoveApplied {
        /// Full board after the move.
        snapshot: BoardSnapshot,
        /// Black pieces lost so far.
        black_captured: u32,
        /// White pieces lost so far.
        white_captured: u32,
    },
    /// The game ended.
    GameOver(GameOutcome),
}

/// Engine event tagged with the game generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedEvent {
    /// Generation current when the event was reported (or when the sending
    /// notifier was pinned).
    pub generation: u64,
    /// The event itself.
    pub event: EngineEvent,
}

/// Cloneable observer that forwards engine callbacks into a session's inbox.
///
/// Engines may hold it across threads or tasks and report from there; the
/// session applies the events on its own task. Every event is stamped with a
/// game generation, so results belonging to an earlier game are dropped.
/// An engine that answers a commit later should report through
/// [`EngineNotifier::pinned`], taken when it accepted the move.
#[derive(Debug, Clone)]
pub struct EngineNotifier {
    tx: mpsc::UnboundedSender<StampedEvent>,
    current: Arc<AtomicU64>,
    pinned: Option<u64>,
}

impl EngineNotifier {
    /// Creates a notifier and the receiving end of its inbox.
    #[instrument]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StampedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            tx,
            current: Arc::new(AtomicU64::new(0)),
            pinned: None,
        };
        (notifier, rx)
    }

    /// A copy that stamps every event with the current generation, even
    /// after a new game starts.
    pub fn pinned(&self) -> Self {
        Self {
            pinned: Some(self.generation()),
            ..self.clone()
        }
    }

    /// The current game generation.
    pub fn generation(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Starts a new generation and returns it.
    #[instrument(skip(self))]
    pub fn advance(&self) -> u64 {
        let next = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation = next, "Game generation advanced");
        next
    }

    fn send(&self, event: EngineEvent) {
        let generation = self.pinned.unwrap_or_else(|| self.generation());
        if self.tx.send(StampedEvent { generation, event }).is_err() {
            warn!("Engine event dropped, session is gone");
        }
    }
}

impl GameObserver for EngineNotifier {
    #[instrument(skip(self, snapshot))]
    fn on_move_applied(&mut self, snapshot: BoardSnapshot, black_captured: u32, white_captured: u32) {
        debug!(cells = snapshot.len(), "Forwarding move result");
        self.send(EngineEvent::MoveApplied {
            snapshot,
            black_captured,
            white_captured,
        });
    }

    #[instrument(skip(self))]
    fn on_game_over(&mut self, winner: Player, king: Coordinate) {
        self.send(EngineEvent::GameOver(GameOutcome { winner, king }));
    }
}

/// Failure reported by a rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// The move is not in the engine's current legal set for `start`.
    #[display("Stale destination: {} -> {} is not a legal move", start, dest)]
    StaleDestination {
        /// Requested origin.
        start: Coordinate,
        /// Requested destination.
        dest: Coordinate,
    },

    /// No game has been started.
    #[display("No game in progress")]
    NoGame,

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,

    /// The engine cannot set up the requested board.
    #[display("Engine setup failed: {}", _0)]
    Setup(#[error(not(source))] String),
}
