//! Selection and move-commit state machine.
//!
//! ```text
//!            occupied, has moves                 dest in destinations
//!   Idle ───────────────────────────► Selected ─────────────────────► Selected (committing)
//!    ▲                                   │                                   │
//!    └──────── anything else ────────────┘◄──────── engine result ───────────┘
//! ```
//!
//! Selection cannot jump from one piece to another: clicking anything that is
//! not a legal destination deselects first.

use super::board::BoardView;
use crate::engine::{EngineError, RulesEngine};
use crate::games::tafl::Coordinate;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// A selected piece and where it may go.
///
/// The destination set is never empty; [`Selection::new`] refuses one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    origin: Coordinate,
    destinations: BTreeSet<Coordinate>,
    committing: Option<Coordinate>,
}

impl Selection {
    /// Builds a selection, or `None` if there is nowhere to go.
    pub fn new(origin: Coordinate, destinations: BTreeSet<Coordinate>) -> Option<Self> {
        (!destinations.is_empty()).then_some(Self {
            origin,
            destinations,
            committing: None,
        })
    }

    /// The selected piece's cell.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Legal destinations of the selected piece.
    pub fn destinations(&self) -> &BTreeSet<Coordinate> {
        &self.destinations
    }

    /// Destination of a commit still waiting for the engine's answer.
    pub fn committing(&self) -> Option<Coordinate> {
        self.committing
    }
}

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A piece is selected.
    Selected(Selection),
}

/// Why an activation changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum IgnoreReason {
    /// No piece on the activated cell.
    #[strum(to_string = "No piece there")]
    EmptyCell,
    /// Deselect was requested with nothing selected.
    #[strum(to_string = "Nothing selected")]
    NothingSelected,
    /// The piece cannot move (or it is not its turn).
    #[strum(to_string = "That piece has no legal moves")]
    NoLegalMoves,
    /// Coordinate off the board.
    #[strum(to_string = "Outside the board")]
    OutOfBounds,
    /// A commit is still waiting for the engine.
    #[strum(to_string = "Waiting for the engine")]
    CommitPending,
    /// The game has ended.
    #[strum(to_string = "Game over")]
    GameOver,
    /// The session hit a fatal engine contract violation.
    #[strum(to_string = "Session aborted, start a new game")]
    SessionAborted,
}

/// What an activation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// A piece was selected.
    Selected {
        /// Selected cell.
        origin: Coordinate,
        /// Number of legal destinations.
        destinations: usize,
    },
    /// The selection was dropped.
    Deselected {
        /// Previously selected cell.
        origin: Coordinate,
    },
    /// A move was sent to the engine.
    CommitRequested {
        /// Moving piece.
        origin: Coordinate,
        /// Target cell.
        dest: Coordinate,
    },
}

/// Owns the [`SelectionState`] and drives its transitions.
#[derive(Debug, Clone, Default)]
pub struct SelectionStateMachine {
    state: SelectionState,
}

impl SelectionStateMachine {
    /// Starts idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Returns true while a commit waits for the engine.
    pub fn is_committing(&self) -> bool {
        matches!(&self.state, SelectionState::Selected(s) if s.committing.is_some())
    }

    /// Handles one cell activation.
    ///
    /// Engine rejection of a commit drops the selection before the error is
    /// returned.
    #[instrument(skip(self, view, engine))]
    pub fn activate<E: RulesEngine>(
        &mut self,
        coord: Coordinate,
        view: &mut BoardView,
        engine: &mut E,
    ) -> Result<Transition, EngineError> {
        let selection = match &mut self.state {
            SelectionState::Selected(selection) if selection.committing.is_some() => {
                debug!("Commit in flight, ignoring activation");
                return Ok(Transition::Ignored(IgnoreReason::CommitPending));
            }
            SelectionState::Selected(selection) => selection,
            SelectionState::Idle => return Ok(self.select(coord, view, engine)),
        };

        let origin = selection.origin;
        if !selection.destinations.contains(&coord) {
            self.reset(view);
            info!(%origin, "Deselected");
            return Ok(Transition::Deselected { origin });
        }

        selection.committing = Some(coord);
        info!(%origin, dest = %coord, "Committing move");
        if let Err(e) = engine.commit_move(origin, coord) {
            warn!(error = %e, "Engine rejected commit");
            self.reset(view);
            return Err(e);
        }
        Ok(Transition::CommitRequested { origin, dest: coord })
    }

    fn select<E: RulesEngine>(
        &mut self,
        coord: Coordinate,
        view: &mut BoardView,
        engine: &E,
    ) -> Transition {
        if !view.occupied(coord) {
            debug!(%coord, "Empty cell, nothing to select");
            return Transition::Ignored(IgnoreReason::EmptyCell);
        }
        let Some(selection) = Selection::new(coord, engine.legal_destinations(coord)) else {
            debug!(%coord, "No legal destinations");
            return Transition::Ignored(IgnoreReason::NoLegalMoves);
        };

        for dest in &selection.destinations {
            view.mark_legal(*dest);
        }
        let destinations = selection.destinations.len();
        info!(origin = %coord, destinations, "Selected");
        self.state = SelectionState::Selected(selection);
        Transition::Selected {
            origin: coord,
            destinations,
        }
    }

    /// Clears destination highlights and returns to idle.
    #[instrument(skip(self, view))]
    pub fn reset(&mut self, view: &mut BoardView) {
        if let SelectionState::Selected(selection) = std::mem::take(&mut self.state) {
            for dest in &selection.destinations {
                view.clear_highlight(*dest);
            }
            debug!(origin = %selection.origin, "Selection cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineNotifier;
    use crate::games::tafl::{BoardSnapshot, Dimension, PieceKind, Variant};
    use crate::view::board::Highlight;

    /// Engine that always offers the same destinations and records commits.
    #[derive(Default)]
    struct FixedEngine {
        destinations: BTreeSet<Coordinate>,
        commits: Vec<(Coordinate, Coordinate)>,
        reject: bool,
    }

    impl RulesEngine for FixedEngine {
        fn attach(&mut self, _notifier: EngineNotifier) {}

        fn new_game(&mut self, _variant: Variant) -> Result<(BoardSnapshot, usize), EngineError> {
            Err(EngineError::NoGame)
        }

        fn legal_destinations(&self, _origin: Coordinate) -> BTreeSet<Coordinate> {
            self.destinations.clone()
        }

        fn commit_move(&mut self, start: Coordinate, dest: Coordinate) -> Result<(), EngineError> {
            if self.reject {
                return Err(EngineError::StaleDestination { start, dest });
            }
            self.commits.push((start, dest));
            Ok(())
        }
    }

    fn board_with_piece_at(coord: Coordinate) -> BoardView {
        let dim = Dimension::new(9).unwrap();
        let mut snapshot = BoardSnapshot::empty(dim);
        snapshot.insert(coord, PieceKind::BlackPawn);
        let mut view = BoardView::new(dim);
        view.apply_snapshot(&snapshot).unwrap();
        view
    }

    fn engine_offering(cells: &[(usize, usize)]) -> FixedEngine {
        FixedEngine {
            destinations: cells.iter().map(|(r, c)| Coordinate::new(*r, *c)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_selection_is_unrepresentable() {
        assert!(Selection::new(Coordinate::new(1, 1), BTreeSet::new()).is_none());
    }

    #[test]
    fn test_empty_cell_is_ignored() {
        let mut view = board_with_piece_at(Coordinate::new(5, 2));
        let mut engine = engine_offering(&[(5, 3)]);
        let mut machine = SelectionStateMachine::new();

        let t = machine
            .activate(Coordinate::new(4, 4), &mut view, &mut engine)
            .unwrap();
        assert_eq!(t, Transition::Ignored(IgnoreReason::EmptyCell));
        assert_eq!(machine.state(), &SelectionState::Idle);
    }

    #[test]
    fn test_piece_without_moves_stays_idle() {
        let mut view = board_with_piece_at(Coordinate::new(5, 2));
        let mut engine = engine_offering(&[]);
        let mut machine = SelectionStateMachine::new();

        let t = machine
            .activate(Coordinate::new(5, 2), &mut view, &mut engine)
            .unwrap();
        assert_eq!(t, Transition::Ignored(IgnoreReason::NoLegalMoves));
        assert_eq!(machine.state(), &SelectionState::Idle);
    }

    #[test]
    fn test_reselecting_origin_deselects() {
        let origin = Coordinate::new(5, 2);
        let mut view = board_with_piece_at(origin);
        let mut engine = engine_offering(&[(5, 3), (5, 4)]);
        let mut machine = SelectionStateMachine::new();

        machine.activate(origin, &mut view, &mut engine).unwrap();
        assert_eq!(view.highlight(Coordinate::new(5, 3)), Some(Highlight::LegalMove));

        let t = machine.activate(origin, &mut view, &mut engine).unwrap();
        assert_eq!(t, Transition::Deselected { origin });
        assert_eq!(view.highlight(Coordinate::new(5, 3)), Some(Highlight::Normal));
        assert!(engine.commits.is_empty());
    }

    #[test]
    fn test_commit_blocks_further_activations() {
        let origin = Coordinate::new(5, 2);
        let mut view = board_with_piece_at(origin);
        let mut engine = engine_offering(&[(5, 3)]);
        let mut machine = SelectionStateMachine::new();

        machine.activate(origin, &mut view, &mut engine).unwrap();
        let t = machine
            .activate(Coordinate::new(5, 3), &mut view, &mut engine)
            .unwrap();
        assert_eq!(
            t,
            Transition::CommitRequested {
                origin,
                dest: Coordinate::new(5, 3)
            }
        );
        assert!(machine.is_committing());

        let t = machine
            .activate(Coordinate::new(1, 2), &mut view, &mut engine)
            .unwrap();
        assert_eq!(t, Transition::Ignored(IgnoreReason::CommitPending));
        assert_eq!(engine.commits.len(), 1);
    }

    #[test]
    fn test_rejected_commit_returns_to_idle() {
        let origin = Coordinate::new(5, 2);
        let mut view = board_with_piece_at(origin);
        let mut engine = engine_offering(&[(5, 3)]);
        engine.reject = true;
        let mut machine = SelectionStateMachine::new();

        machine.activate(origin, &mut view, &mut engine).unwrap();
        let err = machine
            .activate(Coordinate::new(5, 3), &mut view, &mut engine)
            .unwrap_err();
        assert!(matches!(err, EngineError::StaleDestination { .. }));
        assert_eq!(machine.state(), &SelectionState::Idle);
        assert_eq!(view.highlight(Coordinate::new(5, 3)), Some(Highlight::Normal));
    }
}
