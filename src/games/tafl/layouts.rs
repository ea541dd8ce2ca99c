//! Starting positions for each supported variant.

use super::snapshot::BoardSnapshot;
use super::types::Variant;
use tracing::instrument;

const HNEFATAFL: [&str; 11] = [
    "...BBBBB...",
    ".....B.....",
    "...........",
    "B....W....B",
    "B...WWW...B",
    "BB.WWKWW.BB",
    "B...WWW...B",
    "B....W....B",
    "...........",
    ".....B.....",
    "...BBBBB...",
];

const TAWLBWRDD: [&str; 11] = [
    "....BBB....",
    "....B.B....",
    ".....B.....",
    ".....W.....",
    "BB..WWW..BB",
    "B.BWWKWWB.B",
    "BB..WWW..BB",
    ".....W.....",
    ".....B.....",
    "....B.B....",
    "....BBB....",
];

const TABLUT: [&str; 9] = [
    "...BBB...",
    "....B....",
    "....W....",
    "B...W...B",
    "BBWWKWWBB",
    "B...W...B",
    "....W....",
    "....B....",
    "...BBB...",
];

const BRANDUBH: [&str; 7] = [
    "...B...",
    "...B...",
    "...W...",
    "BBWKWBB",
    "...W...",
    "...B...",
    "...B...",
];

/// Rows of board notation for the variant's opening position.
pub fn layout_rows(variant: Variant) -> &'static [&'static str] {
    match variant {
        Variant::Hnefatafl => &HNEFATAFL,
        Variant::Tawlbwrdd => &TAWLBWRDD,
        Variant::Tablut => &TABLUT,
        Variant::Brandubh => &BRANDUBH,
    }
}

/// Opening position for a variant.
#[instrument]
pub fn starting_snapshot(variant: Variant) -> BoardSnapshot {
    // Layouts are compile-time constants covered by tests below.
    BoardSnapshot::from_rows(layout_rows(variant)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tafl::{Dimension, PieceKind};
    use strum::IntoEnumIterator;

    #[test]
    fn test_layouts_cover_their_boards() {
        for variant in Variant::iter() {
            let dim = Dimension::new(variant.side()).unwrap();
            let snapshot = BoardSnapshot::from_rows(layout_rows(variant)).unwrap();
            assert!(snapshot.check_coverage(dim).is_ok(), "{variant} layout");
        }
    }

    #[test]
    fn test_piece_counts() {
        let expected = [
            (Variant::Hnefatafl, 24, 12),
            (Variant::Tawlbwrdd, 24, 12),
            (Variant::Tablut, 16, 8),
            (Variant::Brandubh, 8, 4),
        ];
        for (variant, black, white) in expected {
            let snapshot = starting_snapshot(variant);
            assert_eq!(snapshot.count(PieceKind::BlackPawn), black, "{variant}");
            assert_eq!(snapshot.count(PieceKind::WhitePawn), white, "{variant}");
            assert_eq!(snapshot.count(PieceKind::WhiteKing), 1, "{variant}");
        }
    }

    #[test]
    fn test_king_starts_on_throne() {
        for variant in Variant::iter() {
            let dim = Dimension::new(variant.side()).unwrap();
            let king = starting_snapshot(variant).find(PieceKind::WhiteKing);
            assert_eq!(king, Some(crate::games::tafl::geometry::center(dim)));
        }
    }
}
