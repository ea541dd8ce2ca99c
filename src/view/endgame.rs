//! Terminal game-over marking.

use super::board::BoardView;
use crate::games::tafl::GameOutcome;
use tracing::{info, instrument, warn};

/// Records the outcome once and pins the winner color on the king's cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndgameMarker {
    outcome: Option<GameOutcome>,
}

impl EndgameMarker {
    /// Creates a marker with no outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// The outcome, once the game has ended.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Returns true once an outcome is set.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Applies the outcome. A second outcome in the same game is ignored and
    /// `false` is returned.
    #[instrument(skip(self, view))]
    pub fn apply(&mut self, outcome: GameOutcome, view: &mut BoardView) -> bool {
        if let Some(existing) = self.outcome {
            warn!(?existing, "Outcome already set, ignoring");
            return false;
        }
        view.mark_winner(outcome.king, outcome.winner);
        self.outcome = Some(outcome);
        info!(winner = ?outcome.winner, king = %outcome.king, "Game over");
        true
    }

    /// Forgets the outcome for a new game.
    pub fn reset(&mut self) {
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tafl::{Coordinate, Dimension, Player};
    use crate::view::board::Highlight;

    #[test]
    fn test_outcome_is_set_once() {
        let mut view = BoardView::new(Dimension::new(7).unwrap());
        let mut marker = EndgameMarker::new();
        let first = GameOutcome {
            winner: Player::White,
            king: Coordinate::new(1, 1),
        };
        let second = GameOutcome {
            winner: Player::Black,
            king: Coordinate::new(3, 3),
        };

        assert!(marker.apply(first, &mut view));
        assert!(!marker.apply(second, &mut view));
        assert_eq!(marker.outcome(), Some(first));
        assert_eq!(view.highlight(Coordinate::new(3, 3)), Some(Highlight::Normal));
    }
}
