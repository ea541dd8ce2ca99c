//! Full games through a session backed by the reference engine.

use std::collections::BTreeSet;
use strictly_tafl::{
    BasicEngine, Coordinate, GameSession, IgnoreReason, PieceKind, Player, SelectionState,
    SessionSettings, SessionUpdate, Transition, Variant,
};

fn c(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col)
}

fn brandubh() -> GameSession<BasicEngine> {
    GameSession::start(BasicEngine::new(), SessionSettings::default(), Variant::Brandubh).unwrap()
}

async fn play(
    session: &mut GameSession<BasicEngine>,
    from: Coordinate,
    to: Coordinate,
) -> Vec<SessionUpdate> {
    assert!(
        matches!(session.activate(from).unwrap(), Transition::Selected { .. }),
        "could not select {}",
        from
    );
    assert_eq!(
        session.activate(to).unwrap(),
        Transition::CommitRequested {
            origin: from,
            dest: to
        }
    );
    session.settle().await.unwrap()
}

#[tokio::test]
async fn test_opening_position_is_drawn() {
    let session = brandubh();
    assert_eq!(session.dimension().get(), 7);
    assert_eq!(session.view().piece(c(4, 4)), PieceKind::WhiteKing);
    assert_eq!(session.view().occupancy().count(PieceKind::BlackPawn), 8);
    assert_eq!(session.view().occupancy().count(PieceKind::WhitePawn), 4);
    assert_eq!(session.turn(), Player::Black);
}

#[tokio::test]
async fn test_corner_is_not_offered_to_pawns() {
    let mut session = brandubh();
    session.activate(c(1, 4)).unwrap();
    let SelectionState::Selected(selection) = session.selection().clone() else {
        panic!("expected a selection");
    };
    let expected: BTreeSet<Coordinate> = [c(1, 2), c(1, 3), c(1, 5), c(1, 6)].into_iter().collect();
    assert_eq!(selection.destinations(), &expected);
}

#[tokio::test]
async fn test_defender_cannot_move_on_attacker_turn() {
    let mut session = brandubh();
    assert_eq!(
        session.activate(c(3, 4)).unwrap(),
        Transition::Ignored(IgnoreReason::NoLegalMoves)
    );
}

#[tokio::test]
async fn test_custodial_capture_updates_tally() {
    let mut session = brandubh();
    let moves = [
        (c(2, 4), c(2, 3)),
        (c(5, 4), c(5, 1)),
        (c(2, 3), c(3, 3)),
        (c(5, 1), c(6, 1)),
        (c(4, 6), c(3, 6)),
        (c(6, 1), c(5, 1)),
    ];
    for (from, to) in moves {
        let updates = play(&mut session, from, to).await;
        assert!(matches!(
            updates.as_slice(),
            [SessionUpdate::MoveApplied { captured: 0, .. }]
        ));
    }
    assert_eq!(session.turn(), Player::Black);

    let updates = play(&mut session, c(3, 6), c(3, 5)).await;
    assert_eq!(
        updates,
        vec![SessionUpdate::MoveApplied {
            mover: Player::Black,
            captured: 1
        }]
    );
    assert!(!session.view().occupied(c(3, 4)));
    assert_eq!(session.captures().counters().white_captured, 1);
    assert_eq!(session.captures().panel(Player::Black).len(), 1);
    assert_eq!(session.turn(), Player::White);
    assert_eq!(session.engine().to_move(), Some(Player::White));
    assert_eq!(session.view().occupancy(), *session.engine().board().unwrap());
}

#[tokio::test]
async fn test_white_first_when_configured() {
    let settings = SessionSettings::new(strictly_tafl::DEFAULT_COMMIT_TIMEOUT, Player::White);
    let mut session = GameSession::start(
        BasicEngine::with_first_player(Player::White),
        settings,
        Variant::Brandubh,
    )
    .unwrap();
    assert_eq!(session.turn(), Player::White);

    let updates = play(&mut session, c(3, 4), c(3, 1)).await;
    assert_eq!(updates.len(), 1);
    assert_eq!(session.turn(), Player::Black);
    assert_eq!(session.selection(), &SelectionState::Idle);
}
