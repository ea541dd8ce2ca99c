//! Toolkit-agnostic view model of the board grid.
//!
//! Each cell carries the piece currently drawn on it and a highlight. The
//! terminal front-end maps highlights to palette colors; nothing here knows
//! about widgets.

use crate::games::tafl::{
    BoardSnapshot, Coordinate, CoverageError, Dimension, PieceKind, Player, is_special,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Visual state of a cell, in increasing precedence for clearing:
/// `Winner` is never cleared, `Special` is restored instead of `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Highlight {
    /// Plain cell.
    Normal,
    /// Corner or throne.
    Special,
    /// Legal destination of the current selection.
    LegalMove,
    /// The king's cell at game end, colored for the winner.
    Winner(Player),
}

/// One rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Piece drawn on the cell.
    pub piece: PieceKind,
    /// Current highlight.
    pub highlight: Highlight,
}

/// The rendered grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    dimension: Dimension,
    cells: Vec<CellView>,
}

impl BoardView {
    /// Creates an empty grid; corners and throne start highlighted as special.
    #[instrument]
    pub fn new(dimension: Dimension) -> Self {
        let cells = dimension
            .coordinates()
            .map(|coord| CellView {
                piece: PieceKind::Empty,
                highlight: resting_highlight(coord, dimension),
            })
            .collect();
        Self { dimension, cells }
    }

    /// Board side length.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        coord
            .within(self.dimension)
            .then(|| (coord.row() - 1) * self.dimension.get() + (coord.col() - 1))
    }

    /// Returns the cell at `coord`, if on the board.
    pub fn cell(&self, coord: Coordinate) -> Option<&CellView> {
        self.index(coord).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, coord: Coordinate) -> Option<&mut CellView> {
        self.index(coord).map(|i| &mut self.cells[i])
    }

    /// Piece drawn at `coord` (empty when off the board).
    pub fn piece(&self, coord: Coordinate) -> PieceKind {
        self.cell(coord).map(|c| c.piece).unwrap_or_default()
    }

    /// Highlight at `coord`, if on the board.
    pub fn highlight(&self, coord: Coordinate) -> Option<Highlight> {
        self.cell(coord).map(|c| c.highlight)
    }

    /// Returns true if a piece is drawn at `coord`.
    pub fn occupied(&self, coord: Coordinate) -> bool {
        self.piece(coord).is_occupied()
    }

    /// Overwrites every cell's piece from an authoritative snapshot.
    ///
    /// The snapshot must cover the board exactly; otherwise nothing is drawn.
    /// Highlights are left alone.
    #[instrument(skip(self, snapshot), fields(dimension = %self.dimension))]
    pub fn apply_snapshot(&mut self, snapshot: &BoardSnapshot) -> Result<(), CoverageError> {
        snapshot.check_coverage(self.dimension)?;
        for (coord, piece) in snapshot.cells() {
            if let Some(cell) = self.cell_mut(coord) {
                cell.piece = piece;
            }
        }
        debug!("Snapshot applied");
        Ok(())
    }

    /// Marks a legal destination. Special and winner cells keep their color.
    pub fn mark_legal(&mut self, coord: Coordinate) {
        let dimension = self.dimension;
        if let Some(cell) = self.cell_mut(coord) {
            if matches!(cell.highlight, Highlight::Winner(_)) || is_special(coord, dimension) {
                trace!(%coord, "Keeping special color over legal-move mark");
                return;
            }
            cell.highlight = Highlight::LegalMove;
        }
    }

    /// Restores a cell's resting color. Winner cells stay pinned.
    pub fn clear_highlight(&mut self, coord: Coordinate) {
        let dimension = self.dimension;
        if let Some(cell) = self.cell_mut(coord) {
            if matches!(cell.highlight, Highlight::Winner(_)) {
                trace!(%coord, "Winner color is pinned");
                return;
            }
            cell.highlight = resting_highlight(coord, dimension);
        }
    }

    /// Pins a winner color on a cell until the next game.
    #[instrument(skip(self))]
    pub fn mark_winner(&mut self, coord: Coordinate, winner: Player) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.highlight = Highlight::Winner(winner);
        }
    }

    /// The occupancy currently drawn, as a snapshot.
    pub fn occupancy(&self) -> BoardSnapshot {
        self.dimension
            .coordinates()
            .map(|coord| (coord, self.piece(coord)))
            .collect()
    }

    /// Rows of cells, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
        self.cells.chunks(self.dimension.get())
    }
}

fn resting_highlight(coord: Coordinate, dimension: Dimension) -> Highlight {
    if is_special(coord, dimension) {
        Highlight::Special
    } else {
        Highlight::Normal
    }
}
