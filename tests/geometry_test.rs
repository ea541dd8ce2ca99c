//! Property tests for board geometry and snapshot application.

use proptest::prelude::*;
use strictly_tafl::{
    BoardSnapshot, BoardView, CellRole, Coordinate, Dimension, Highlight, PieceKind, classify,
};

fn dimension() -> impl Strategy<Value = Dimension> {
    (3usize..=12).prop_map(|half| Dimension::new(half * 2 + 1).unwrap())
}

fn piece() -> impl Strategy<Value = PieceKind> {
    prop_oneof![
        Just(PieceKind::Empty),
        Just(PieceKind::BlackPawn),
        Just(PieceKind::WhitePawn),
        Just(PieceKind::WhiteKing),
    ]
}

fn board() -> impl Strategy<Value = (Dimension, BoardSnapshot)> {
    dimension().prop_flat_map(|dim| {
        proptest::collection::vec(piece(), dim.cells()).prop_map(move |pieces| {
            let snapshot: BoardSnapshot = dim.coordinates().zip(pieces).collect();
            (dim, snapshot)
        })
    })
}

proptest! {
    #[test]
    fn every_board_has_four_corners_and_one_center(dim in dimension()) {
        let roles: Vec<CellRole> = dim.coordinates().map(|c| classify(c, dim)).collect();
        prop_assert_eq!(roles.iter().filter(|r| **r == CellRole::Corner).count(), 4);
        prop_assert_eq!(roles.iter().filter(|r| **r == CellRole::Center).count(), 1);
        prop_assert_eq!(roles.len(), dim.cells());
    }

    #[test]
    fn center_sits_in_the_middle(dim in dimension()) {
        let middle = dim.get() / 2 + 1;
        prop_assert_eq!(classify(Coordinate::new(middle, middle), dim), CellRole::Center);
    }

    #[test]
    fn applying_a_snapshot_twice_changes_nothing((dim, snapshot) in board()) {
        let mut view = BoardView::new(dim);
        view.apply_snapshot(&snapshot).unwrap();
        let once = view.clone();
        view.apply_snapshot(&snapshot).unwrap();
        prop_assert_eq!(&view, &once);
        prop_assert_eq!(view.occupancy(), snapshot);
    }

    #[test]
    fn snapshots_leave_highlights_alone((dim, snapshot) in board()) {
        let mut view = BoardView::new(dim);
        let before: Vec<Option<Highlight>> = dim.coordinates().map(|c| view.highlight(c)).collect();
        view.apply_snapshot(&snapshot).unwrap();
        let after: Vec<Option<Highlight>> = dim.coordinates().map(|c| view.highlight(c)).collect();
        prop_assert_eq!(before, after);
    }
}
