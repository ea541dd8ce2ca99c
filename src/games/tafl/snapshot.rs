//! Authoritative piece placement as produced by a rules engine.

use super::types::{Coordinate, Dimension, PieceKind};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{instrument, warn};

/// Mapping from every board coordinate to its occupant.
///
/// A well-formed snapshot covers each cell of a `dimension × dimension` board
/// exactly once; [`BoardSnapshot::check_coverage`] verifies that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    cells: BTreeMap<Coordinate, PieceKind>,
}

impl BoardSnapshot {
    /// Creates an empty snapshot (covers nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot with every cell of the board empty.
    pub fn empty(dimension: Dimension) -> Self {
        dimension
            .coordinates()
            .map(|coord| (coord, PieceKind::Empty))
            .collect()
    }

    /// Parses rows of board notation (`.`, `B`, `W`, `K`), top row first.
    ///
    /// Whitespace inside a row is ignored so layouts can be spaced out.
    #[instrument(skip(rows))]
    pub fn from_rows(rows: &[&str]) -> Result<Self, SnapshotParseError> {
        let mut cells = BTreeMap::new();
        for (r, line) in rows.iter().enumerate() {
            let glyphs = line.chars().filter(|c| !c.is_whitespace());
            for (c, glyph) in glyphs.enumerate() {
                let piece = PieceKind::from_notation(glyph).ok_or(SnapshotParseError {
                    glyph,
                    row: r + 1,
                    col: c + 1,
                })?;
                cells.insert(Coordinate::new(r + 1, c + 1), piece);
            }
        }
        Ok(Self { cells })
    }

    /// Returns the occupant of a cell, if the snapshot covers it.
    pub fn get(&self, coord: Coordinate) -> Option<PieceKind> {
        self.cells.get(&coord).copied()
    }

    /// Sets the occupant of a cell. Only engines build snapshots.
    pub fn insert(&mut self, coord: Coordinate, piece: PieceKind) {
        self.cells.insert(coord, piece);
    }

    /// Number of covered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cell is covered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, PieceKind)> + '_ {
        self.cells.iter().map(|(coord, piece)| (*coord, *piece))
    }

    /// Counts cells holding the given piece.
    pub fn count(&self, piece: PieceKind) -> usize {
        self.cells.values().filter(|p| **p == piece).count()
    }

    /// Finds the first cell holding the given piece.
    pub fn find(&self, piece: PieceKind) -> Option<Coordinate> {
        self.cells
            .iter()
            .find_map(|(coord, p)| (*p == piece).then_some(*coord))
    }

    /// Verifies the snapshot covers exactly the cells of the board.
    #[instrument(skip(self), fields(covered = self.cells.len()))]
    pub fn check_coverage(&self, dimension: Dimension) -> Result<(), CoverageError> {
        let out_of_bounds = self
            .cells
            .keys()
            .filter(|coord| !coord.within(dimension))
            .count();
        if out_of_bounds > 0 || self.cells.len() != dimension.cells() {
            warn!(
                expected = dimension.cells(),
                found = self.cells.len(),
                out_of_bounds,
                "Snapshot does not cover the board"
            );
            return Err(CoverageError {
                expected: dimension.cells(),
                found: self.cells.len(),
                out_of_bounds,
            });
        }
        Ok(())
    }

    /// Renders the snapshot as rows of board notation.
    pub fn display(&self, dimension: Dimension) -> String {
        let d = dimension.get();
        (1..=d)
            .map(|row| {
                (1..=d)
                    .map(|col| {
                        self.get(Coordinate::new(row, col))
                            .map(PieceKind::notation)
                            .unwrap_or('?')
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<(Coordinate, PieceKind)> for BoardSnapshot {
    fn from_iter<I: IntoIterator<Item = (Coordinate, PieceKind)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Unknown glyph in board notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Unknown board glyph {:?} at ({}, {})", glyph, row, col)]
pub struct SnapshotParseError {
    /// The offending character.
    pub glyph: char,
    /// Row of the glyph, starting at 1.
    pub row: usize,
    /// Column of the glyph (ignoring whitespace), starting at 1.
    pub col: usize,
}

/// Snapshot coverage does not match the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display(
    "Snapshot covers {} cells ({} out of bounds), board has {}",
    found,
    out_of_bounds,
    expected
)]
pub struct CoverageError {
    /// Cells on the board.
    pub expected: usize,
    /// Cells in the snapshot.
    pub found: usize,
    /// Snapshot cells outside the board.
    pub out_of_bounds: usize,
}
