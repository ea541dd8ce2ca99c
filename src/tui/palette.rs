//! Colors used to draw the board.

use crate::games::tafl::{PieceKind, Player};
use crate::view::Highlight;
use ratatui::style::{Color, Modifier, Style};

/// Resolved palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Plain cell background.
    pub normal: Color,
    /// Corner and throne background.
    pub special: Color,
    /// Legal destination background.
    pub legal_move: Color,
    /// King cell when Black wins.
    pub black_winner: Color,
    /// King cell when White wins.
    pub white_winner: Color,
    /// Attacker glyph.
    pub black_piece: Color,
    /// Defender glyph.
    pub white_piece: Color,
    /// King glyph.
    pub king: Color,
    /// Keyboard cursor background.
    pub cursor: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            normal: Color::Rgb(0x8b, 0x5a, 0x2b),
            special: Color::Rgb(0x5c, 0x3a, 0x1e),
            legal_move: Color::Rgb(0x6b, 0x8e, 0x23),
            black_winner: Color::Red,
            white_winner: Color::LightCyan,
            black_piece: Color::Black,
            white_piece: Color::White,
            king: Color::Yellow,
            cursor: Color::Blue,
        }
    }
}

impl Palette {
    /// Background for a highlight.
    pub fn background(&self, highlight: Highlight) -> Color {
        match highlight {
            Highlight::Normal => self.normal,
            Highlight::Special => self.special,
            Highlight::LegalMove => self.legal_move,
            Highlight::Winner(Player::Black) => self.black_winner,
            Highlight::Winner(Player::White) => self.white_winner,
        }
    }

    /// Glyph style for a piece.
    pub fn piece(&self, piece: PieceKind) -> Style {
        let fg = match piece {
            PieceKind::Empty => return Style::default(),
            PieceKind::BlackPawn => self.black_piece,
            PieceKind::WhitePawn => self.white_piece,
            PieceKind::WhiteKing => self.king,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}
