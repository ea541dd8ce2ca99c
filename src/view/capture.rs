//! Captured-piece counters and their side tallies.

use crate::games::tafl::{PieceKind, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Running totals of pieces lost by each side this game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureCounters {
    /// Black pieces lost.
    pub black_captured: u32,
    /// White pieces lost.
    pub white_captured: u32,
}

impl CaptureCounters {
    /// Pieces of `side` lost so far.
    pub fn lost_by(&self, side: Player) -> u32 {
        match side {
            Player::Black => self.black_captured,
            Player::White => self.white_captured,
        }
    }
}

/// Row of captured-piece markers shown beside the board for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyPanel {
    markers: Vec<PieceKind>,
}

impl TallyPanel {
    /// Markers currently shown.
    pub fn markers(&self) -> &[PieceKind] {
        &self.markers
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true when no marker is shown.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Replaces the panel contents with `count` markers of `piece`.
    fn rerender(&mut self, piece: PieceKind, count: u32) {
        self.markers.clear();
        self.markers.extend(std::iter::repeat_n(piece, count as usize));
    }
}

/// Tracks captures and keeps each side's tally panel in step with them.
///
/// A side's panel shows the enemy pieces that side has taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureTracker {
    counters: CaptureCounters,
    black_panel: TallyPanel,
    white_panel: TallyPanel,
}

impl CaptureTracker {
    /// Creates a tracker with zero captures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn counters(&self) -> CaptureCounters {
        self.counters
    }

    /// Tally panel of the side that did the capturing.
    pub fn panel(&self, captor: Player) -> &TallyPanel {
        match captor {
            Player::Black => &self.black_panel,
            Player::White => &self.white_panel,
        }
    }

    /// Records engine totals after `mover` moved and redraws the mover's panel.
    ///
    /// Totals never go down within a game; a lower value is logged and the
    /// previous one kept. Returns how many enemy pieces the mover took this
    /// turn.
    #[instrument(skip(self))]
    pub fn record(&mut self, mover: Player, black_captured: u32, white_captured: u32) -> u32 {
        let before = self.counters;
        if black_captured < before.black_captured || white_captured < before.white_captured {
            warn!(?before, "Engine reported fewer captures than before, keeping maximum");
        }
        self.counters = CaptureCounters {
            black_captured: black_captured.max(before.black_captured),
            white_captured: white_captured.max(before.white_captured),
        };

        let victim = mover.opponent();
        let taken = self.counters.lost_by(victim) - before.lost_by(victim);
        let (panel, marker) = match mover {
            Player::Black => (&mut self.black_panel, PieceKind::WhitePawn),
            Player::White => (&mut self.white_panel, PieceKind::BlackPawn),
        };
        panel.rerender(marker, self.counters.lost_by(victim));
        debug!(taken, total = panel.len(), "Tally redrawn");
        taken
    }

    /// Clears all counters and panels for a new game.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mover_panel_shows_opponent_losses() {
        let mut tracker = CaptureTracker::new();
        assert_eq!(tracker.record(Player::Black, 0, 2), 2);
        assert_eq!(tracker.panel(Player::Black).len(), 2);
        assert!(tracker
            .panel(Player::Black)
            .markers()
            .iter()
            .all(|m| *m == PieceKind::WhitePawn));
        assert!(tracker.panel(Player::White).is_empty());
    }

    #[test]
    fn test_panel_is_rerendered_not_appended() {
        let mut tracker = CaptureTracker::new();
        tracker.record(Player::White, 1, 0);
        tracker.record(Player::Black, 1, 0);
        assert_eq!(tracker.record(Player::White, 3, 0), 2);
        assert_eq!(tracker.panel(Player::White).len(), 3);
    }

    #[test]
    fn test_counters_never_decrease() {
        let mut tracker = CaptureTracker::new();
        tracker.record(Player::Black, 2, 4);
        assert_eq!(tracker.record(Player::Black, 1, 3), 0);
        assert_eq!(
            tracker.counters(),
            CaptureCounters {
                black_captured: 2,
                white_captured: 4
            }
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tracker = CaptureTracker::new();
        tracker.record(Player::Black, 0, 5);
        tracker.reset();
        assert_eq!(tracker.counters(), CaptureCounters::default());
        assert!(tracker.panel(Player::Black).is_empty());
    }
}
