//! Core domain types for Tafl boards.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side in a Tafl game.
///
/// Black plays the attackers, White defends the king.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Player {
    /// Attackers (move first by convention).
    #[default]
    Black,
    /// Defenders and the king.
    White,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// What occupies a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PieceKind {
    /// Nothing on the cell.
    #[default]
    Empty,
    /// Attacking pawn.
    BlackPawn,
    /// Defending pawn.
    WhitePawn,
    /// The king.
    WhiteKing,
}

impl PieceKind {
    /// Returns true if a piece is on the cell.
    pub fn is_occupied(self) -> bool {
        !matches!(self, PieceKind::Empty)
    }

    /// Returns the side owning this piece, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            PieceKind::Empty => None,
            PieceKind::BlackPawn => Some(Player::Black),
            PieceKind::WhitePawn | PieceKind::WhiteKing => Some(Player::White),
        }
    }

    /// One-character board notation (`.`, `B`, `W`, `K`).
    pub fn notation(self) -> char {
        match self {
            PieceKind::Empty => '.',
            PieceKind::BlackPawn => 'B',
            PieceKind::WhitePawn => 'W',
            PieceKind::WhiteKing => 'K',
        }
    }

    /// Parses board notation back into a piece.
    pub fn from_notation(c: char) -> Option<Self> {
        match c {
            '.' => Some(PieceKind::Empty),
            'B' => Some(PieceKind::BlackPawn),
            'W' => Some(PieceKind::WhitePawn),
            'K' => Some(PieceKind::WhiteKing),
            _ => None,
        }
    }
}

/// A 1-indexed (row, col) board coordinate.
///
/// Ordering is row-major, which keeps iteration over coordinate sets
/// deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("({}, {})", row, col)]
pub struct Coordinate {
    row: usize,
    col: usize,
}

impl Coordinate {
    /// Creates a coordinate. Bounds are checked against a [`Dimension`] with
    /// [`Coordinate::within`].
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row, starting at 1.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column, starting at 1.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns true if both components lie in `[1, dimension]`.
    pub fn within(&self, dimension: Dimension) -> bool {
        let d = dimension.get();
        (1..=d).contains(&self.row) && (1..=d).contains(&self.col)
    }

    /// Steps one cell in the given direction, staying on the board.
    pub fn step(&self, (dr, dc): (isize, isize), dimension: Dimension) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let next = Self::new(row, col);
        next.within(dimension).then_some(next)
    }
}

/// The four orthogonal directions as (row, col) deltas.
pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Smallest board side for which corner and center cells are distinct.
pub const MIN_DIMENSION: usize = 7;

/// Side length of a square Tafl board: odd and at least seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{}", _0)]
#[serde(try_from = "usize", into = "usize")]
pub struct Dimension(usize);

impl Dimension {
    /// Validates a board side length.
    #[instrument]
    pub fn new(side: usize) -> Result<Self, InvalidDimension> {
        if side < MIN_DIMENSION || side % 2 == 0 {
            return Err(InvalidDimension { side });
        }
        Ok(Self(side))
    }

    /// The side length.
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of cells on the board.
    pub fn cells(self) -> usize {
        self.0 * self.0
    }

    /// Every coordinate on the board in row-major order.
    pub fn coordinates(self) -> impl Iterator<Item = Coordinate> {
        let d = self.0;
        (1..=d).flat_map(move |row| (1..=d).map(move |col| Coordinate::new(row, col)))
    }
}

impl TryFrom<usize> for Dimension {
    type Error = InvalidDimension;

    fn try_from(side: usize) -> Result<Self, Self::Error> {
        Self::new(side)
    }
}

impl From<Dimension> for usize {
    fn from(dimension: Dimension) -> Self {
        dimension.0
    }
}

/// Board side rejected because it is even or below [`MIN_DIMENSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Invalid board dimension {}: must be odd and at least 7", side)]
pub struct InvalidDimension {
    /// The rejected side length.
    pub side: usize,
}

/// Terminal result of a game, reported once by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// The winning side.
    pub winner: Player,
    /// Where the king stands (or was captured).
    pub king: Coordinate,
}

/// Supported board variants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Variant {
    /// Hnefatafl, 11×11.
    #[default]
    Hnefatafl,
    /// Tawlbwrdd, 11×11.
    Tawlbwrdd,
    /// Tablut, 9×9.
    Tablut,
    /// Brandubh, 7×7.
    Brandubh,
}

impl Variant {
    /// Board side length for this variant.
    pub fn side(self) -> usize {
        match self {
            Variant::Hnefatafl | Variant::Tawlbwrdd => 11,
            Variant::Tablut => 9,
            Variant::Brandubh => 7,
        }
    }

    /// Menu label, e.g. `Tablut (9 x 9)`.
    pub fn label(self) -> String {
        format!("{} ({} x {})", self, self.side(), self.side())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_dimension_rejects_even_and_small() {
        assert!(Dimension::new(7).is_ok());
        assert!(Dimension::new(11).is_ok());
        assert_eq!(Dimension::new(8), Err(InvalidDimension { side: 8 }));
        assert_eq!(Dimension::new(5), Err(InvalidDimension { side: 5 }));
    }

    #[test]
    fn test_step_stays_on_board() {
        let dim = Dimension::new(7).unwrap();
        let corner = Coordinate::new(1, 1);
        assert_eq!(corner.step((-1, 0), dim), None);
        assert_eq!(corner.step((0, 1), dim), Some(Coordinate::new(1, 2)));
        assert_eq!(Coordinate::new(7, 7).step((1, 0), dim), None);
    }

    #[test]
    fn test_piece_notation_roundtrip() {
        for c in ['.', 'B', 'W', 'K'] {
            let piece = PieceKind::from_notation(c).unwrap();
            assert_eq!(piece.notation(), c);
        }
        assert_eq!(PieceKind::from_notation('x'), None);
    }

    #[test]
    fn test_variant_parses_case_insensitively() {
        assert_eq!(Variant::from_str("tablut"), Ok(Variant::Tablut));
        assert_eq!(Variant::from_str("BRANDUBH"), Ok(Variant::Brandubh));
        assert_eq!(Variant::Tablut.label(), "Tablut (9 x 9)");
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(3, 4).to_string(), "(3, 4)");
    }
}
