//! Active-player tracking.

use crate::games::tafl::Player;
use tracing::{debug, instrument};

/// Holds the side to move and flips it after each applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTracker {
    current: Player,
}

impl TurnTracker {
    /// Starts with `first` on turn.
    pub fn new(first: Player) -> Self {
        Self { current: first }
    }

    /// Side to move.
    pub fn current(&self) -> Player {
        self.current
    }

    /// Passes the turn to the other side and returns it.
    #[instrument(skip(self), fields(from = ?self.current))]
    pub fn toggle(&mut self) -> Player {
        self.current = self.current.opponent();
        debug!(to = ?self.current, "Turn passed");
        self.current
    }

    /// Restarts with `first` on turn.
    pub fn reset(&mut self, first: Player) {
        self.current = first;
    }
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self::new(Player::Black)
    }
}
