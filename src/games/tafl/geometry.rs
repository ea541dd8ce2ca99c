//! Special-cell classification.
//!
//! Corners are the king's refuges and the center is the throne. Both are
//! derived from the coordinate and board size on demand, never stored.

use super::types::{Coordinate, Dimension};
use serde::{Deserialize, Serialize};

/// Rule status of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellRole {
    /// Ordinary cell.
    Normal,
    /// One of the four corner refuges.
    Corner,
    /// The throne.
    Center,
}

/// Classifies a coordinate on a board of the given dimension.
pub fn classify(coord: Coordinate, dimension: Dimension) -> CellRole {
    let d = dimension.get();
    let edge = |v: usize| v == 1 || v == d;
    let middle = d / 2 + 1;

    if edge(coord.row()) && edge(coord.col()) {
        CellRole::Corner
    } else if coord.row() == middle && coord.col() == middle {
        CellRole::Center
    } else {
        CellRole::Normal
    }
}

/// Returns true for corner and center cells.
pub fn is_special(coord: Coordinate, dimension: Dimension) -> bool {
    !matches!(classify(coord, dimension), CellRole::Normal)
}

/// The throne of a board of the given dimension.
pub fn center(dimension: Dimension) -> Coordinate {
    let middle = dimension.get() / 2 + 1;
    Coordinate::new(middle, middle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_of_nine() {
        let dim = Dimension::new(9).unwrap();
        for (r, c) in [(1, 1), (1, 9), (9, 1), (9, 9)] {
            assert_eq!(classify(Coordinate::new(r, c), dim), CellRole::Corner);
        }
    }

    #[test]
    fn test_center_of_eleven() {
        let dim = Dimension::new(11).unwrap();
        assert_eq!(classify(Coordinate::new(6, 6), dim), CellRole::Center);
        assert_eq!(center(dim), Coordinate::new(6, 6));
    }

    #[test]
    fn test_edges_are_normal() {
        let dim = Dimension::new(7).unwrap();
        assert_eq!(classify(Coordinate::new(1, 4), dim), CellRole::Normal);
        assert_eq!(classify(Coordinate::new(7, 2), dim), CellRole::Normal);
        assert!(!is_special(Coordinate::new(4, 3), dim));
        assert!(is_special(Coordinate::new(4, 4), dim));
    }
}
