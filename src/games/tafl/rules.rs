//! Reference rules engine with simplified common Tafl rules.
//!
//! - Pieces move orthogonally any distance through empty cells.
//! - Only the king may stop on a corner or the throne; others may pass over
//!   the empty throne.
//! - Custodial capture of pawns against a friendly piece or a hostile cell
//!   (corner, or empty throne).
//! - A king away from the edge is captured when surrounded on all four sides.
//! - The king reaching a corner wins for White.
//! - A side with no legal move loses.

use super::geometry::{classify, CellRole};
use super::layouts::starting_snapshot;
use super::snapshot::BoardSnapshot;
use super::types::{Coordinate, Dimension, GameOutcome, PieceKind, Player, Variant, ORTHOGONAL};
use crate::engine::{EngineError, EngineNotifier, GameObserver, RulesEngine};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// State of one game inside the engine.
#[derive(Debug, Clone)]
struct TaflGame {
    dimension: Dimension,
    board: BoardSnapshot,
    to_move: Player,
    black_captured: u32,
    white_captured: u32,
    outcome: Option<GameOutcome>,
}

impl TaflGame {
    fn piece(&self, coord: Coordinate) -> PieceKind {
        self.board.get(coord).unwrap_or_default()
    }

    /// Whether `coord` counts against a piece of `victim` for capture.
    fn hostile_to(&self, coord: Coordinate, victim: Player) -> bool {
        let piece = self.piece(coord);
        match classify(coord, self.dimension) {
            CellRole::Corner => true,
            CellRole::Center if !piece.is_occupied() => true,
            _ => piece.owner() == Some(victim.opponent()),
        }
    }

    fn destinations(&self, origin: Coordinate) -> BTreeSet<Coordinate> {
        let mut out = BTreeSet::new();
        if self.outcome.is_some() {
            return out;
        }
        let piece = self.piece(origin);
        if piece.owner() != Some(self.to_move) {
            return out;
        }
        let is_king = piece == PieceKind::WhiteKing;

        for dir in ORTHOGONAL {
            let mut cursor = origin;
            while let Some(next) = cursor.step(dir, self.dimension) {
                if self.piece(next).is_occupied() {
                    break;
                }
                match classify(next, self.dimension) {
                    CellRole::Normal => {
                        out.insert(next);
                    }
                    _ if is_king => {
                        out.insert(next);
                    }
                    CellRole::Center => {}
                    CellRole::Corner => break,
                }
                cursor = next;
            }
        }
        out
    }

    fn has_any_move(&self) -> bool {
        self.board
            .cells()
            .filter(|(_, piece)| piece.owner() == Some(self.to_move))
            .any(|(coord, _)| !self.destinations(coord).is_empty())
    }

    /// Removes pawns sandwiched by the piece that just landed on `dest`.
    fn resolve_captures(&mut self, dest: Coordinate, mover: Player) -> u32 {
        let victim = mover.opponent();
        let mut taken = 0;
        for dir in ORTHOGONAL {
            let Some(neighbour) = dest.step(dir, self.dimension) else {
                continue;
            };
            let piece = self.piece(neighbour);
            if piece.owner() != Some(victim) || piece == PieceKind::WhiteKing {
                continue;
            }
            let Some(far) = neighbour.step(dir, self.dimension) else {
                continue;
            };
            if self.hostile_to(far, victim) {
                debug!(%neighbour, "Pawn captured");
                self.board.insert(neighbour, PieceKind::Empty);
                taken += 1;
            }
        }
        match victim {
            Player::Black => self.black_captured += taken,
            Player::White => self.white_captured += taken,
        }
        taken
    }

    fn king_surrounded(&self, king: Coordinate) -> bool {
        let sides: Vec<_> = ORTHOGONAL
            .iter()
            .filter_map(|dir| king.step(*dir, self.dimension))
            .collect();
        sides.len() == 4 && sides.iter().all(|side| self.hostile_to(*side, Player::White))
    }

    fn judge(&self, moved: PieceKind, dest: Coordinate) -> Option<GameOutcome> {
        let king = self.board.find(PieceKind::WhiteKing)?;
        if moved == PieceKind::WhiteKing && classify(dest, self.dimension) == CellRole::Corner {
            return Some(GameOutcome { winner: Player::White, king });
        }
        if self.king_surrounded(king) {
            return Some(GameOutcome { winner: Player::Black, king });
        }
        if !self.has_any_move() {
            return Some(GameOutcome {
                winner: self.to_move.opponent(),
                king,
            });
        }
        None
    }
}

/// Synchronous engine: results are delivered before `commit_move` returns.
#[derive(Debug, Default)]
pub struct BasicEngine {
    notifier: Option<EngineNotifier>,
    game: Option<TaflGame>,
    first_player: Player,
}

impl BasicEngine {
    /// Creates an engine with no game and no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose new games open with `first_player` on turn.
    pub fn with_first_player(first_player: Player) -> Self {
        Self {
            first_player,
            ..Self::default()
        }
    }

    /// Side to move in the current game.
    pub fn to_move(&self) -> Option<Player> {
        self.game.as_ref().map(|g| g.to_move)
    }

    /// Current board, if a game is running.
    pub fn board(&self) -> Option<&BoardSnapshot> {
        self.game.as_ref().map(|g| &g.board)
    }

    /// Starts from an arbitrary position with `to_move` on turn.
    #[instrument(skip(self, board))]
    pub fn load_position(
        &mut self,
        board: BoardSnapshot,
        to_move: Player,
    ) -> Result<Dimension, EngineError> {
        let side = board.len().isqrt();
        if side * side != board.len() {
            return Err(EngineError::Setup(format!(
                "{} cells do not form a square board",
                board.len()
            )));
        }
        let dimension =
            Dimension::new(side).map_err(|e| EngineError::Setup(e.to_string()))?;
        board
            .check_coverage(dimension)
            .map_err(|e| EngineError::Setup(e.to_string()))?;
        self.game = Some(TaflGame {
            dimension,
            board,
            to_move,
            black_captured: 0,
            white_captured: 0,
            outcome: None,
        });
        Ok(dimension)
    }
}

impl RulesEngine for BasicEngine {
    #[instrument(skip_all)]
    fn attach(&mut self, notifier: EngineNotifier) {
        if self.notifier.is_some() {
            warn!("Replacing previously attached notifier");
        }
        self.notifier = Some(notifier);
    }

    #[instrument(skip(self))]
    fn new_game(&mut self, variant: Variant) -> Result<(BoardSnapshot, usize), EngineError> {
        let board = starting_snapshot(variant);
        let dimension = self.load_position(board.clone(), self.first_player)?;
        info!(%variant, %dimension, "New game");
        Ok((board, dimension.get()))
    }

    #[instrument(skip(self))]
    fn legal_destinations(&self, origin: Coordinate) -> BTreeSet<Coordinate> {
        let destinations = self
            .game
            .as_ref()
            .map(|g| g.destinations(origin))
            .unwrap_or_default();
        debug!(count = destinations.len(), "Legal destinations");
        destinations
    }

    #[instrument(skip(self))]
    fn commit_move(&mut self, start: Coordinate, dest: Coordinate) -> Result<(), EngineError> {
        let game = self.game.as_mut().ok_or(EngineError::NoGame)?;
        if game.outcome.is_some() {
            return Err(EngineError::GameOver);
        }
        if !game.destinations(start).contains(&dest) {
            warn!("Rejecting move outside the legal set");
            return Err(EngineError::StaleDestination { start, dest });
        }

        let mover = game.to_move;
        let piece = game.piece(start);
        game.board.insert(start, PieceKind::Empty);
        game.board.insert(dest, piece);
        let taken = game.resolve_captures(dest, mover);
        game.to_move = mover.opponent();
        let outcome = game.judge(piece, dest);
        game.outcome = outcome;
        info!(?mover, taken, "Move applied");

        let snapshot = game.board.clone();
        let (black, white) = (game.black_captured, game.white_captured);
        match self.notifier.as_mut() {
            Some(notifier) => {
                notifier.on_move_applied(snapshot, black, white);
                if let Some(outcome) = outcome {
                    notifier.on_game_over(outcome.winner, outcome.king);
                }
            }
            None => warn!("No observer attached, move result not reported"),
        }
        Ok(())
    }
}
