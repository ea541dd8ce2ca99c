//! Board front-end view model: grid, selection, captures, turn and endgame.

mod board;
mod capture;
mod endgame;
mod selection;
mod turn;

pub use board::{BoardView, CellView, Highlight};
pub use capture::{CaptureCounters, CaptureTracker, TallyPanel};
pub use endgame::EndgameMarker;
pub use selection::{IgnoreReason, Selection, SelectionState, SelectionStateMachine, Transition};
pub use turn::TurnTracker;
