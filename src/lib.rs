//! Strictly Tafl library - board front-end for Tafl games
//!
//! The crate draws a Tafl board, turns clicks into selections and move
//! commits, and redraws from whatever an external rules engine reports.
//!
//! # Architecture
//!
//! - **Engine**: the [`RulesEngine`] contract and its [`GameObserver`] callbacks
//! - **Games**: Tafl coordinates, geometry, layouts and a reference [`BasicEngine`]
//! - **View**: toolkit-agnostic board, selection, capture, turn and endgame state
//! - **Session**: [`GameSession`], the single owner of all of the above
//! - **TUI**: ratatui front-end
//!
//! # Example
//!
//! ```no_run
//! use strictly_tafl::{BasicEngine, Coordinate, GameSession, SessionSettings, Variant};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut session =
//!     GameSession::start(BasicEngine::new(), SessionSettings::default(), Variant::Tablut)?;
//! session.activate(Coordinate::new(1, 4))?;
//! session.activate(Coordinate::new(2, 4))?;
//! session.settle().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;
mod games;
mod session;
mod view;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ConfigError, PaletteConfig, TaflConfig};

// Crate-level exports - Engine contract
pub use engine::{
    EngineError, EngineEvent, EngineNotifier, GameObserver, RulesEngine, StampedEvent,
};

// Crate-level exports - Session
pub use session::{
    DEFAULT_COMMIT_TIMEOUT, GameSession, PumpError, SessionError, SessionSettings, SessionUpdate,
};

// Crate-level exports - View model
pub use view::{
    BoardView, CaptureCounters, CaptureTracker, CellView, EndgameMarker, Highlight, IgnoreReason,
    Selection, SelectionState, SelectionStateMachine, TallyPanel, Transition, TurnTracker,
};

// Crate-level exports - Tafl domain
pub use games::tafl::{
    BasicEngine, BoardSnapshot, CellRole, Coordinate, CoverageError, Dimension, GameOutcome,
    InvalidDimension, MIN_DIMENSION, ORTHOGONAL, PieceKind, Player, SnapshotParseError, Variant,
    classify, is_special,
};
pub use games::tafl::{geometry, layouts};
