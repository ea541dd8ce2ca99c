//! Stateless UI rendering for the Tafl board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::App;
use super::palette::Palette;
use crate::games::tafl::{Coordinate, Dimension, PieceKind, Player};
use crate::view::{BoardView, TallyPanel};

/// Terminal columns per board cell.
pub const CELL_WIDTH: u16 = 3;
const LABEL_WIDTH: u16 = 3;
const TALLY_WIDTH: u16 = 16;

/// Renders title, board, tallies and status line.
pub fn draw(frame: &mut Frame, app: &App) {
    let [title_area, body, status_area] = chunks(frame.area());
    let session = app.session();

    let title = Paragraph::new(format!("Strictly Tafl - {}", session.variant().label()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, title_area);

    let [black_tally, board_area, white_tally] = columns(body);
    draw_tally(frame, black_tally, Player::Black, session.captures().panel(Player::Black), app.palette());
    draw_board(frame, board_area, session.view(), app.cursor(), app.palette());
    draw_tally(frame, white_tally, Player::White, session.captures().panel(Player::White), app.palette());

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, status_area);
}

fn chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Board
            Constraint::Length(3), // Status
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn columns(area: Rect) -> [Rect; 3] {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(TALLY_WIDTH),
            Constraint::Min(0),
            Constraint::Length(TALLY_WIDTH),
        ])
        .split(area);
    [cols[0], cols[1], cols[2]]
}

fn board_rect(area: Rect, dimension: Dimension) -> Rect {
    let side = dimension.get() as u16;
    center_rect(area, side * CELL_WIDTH + LABEL_WIDTH, side + 1)
}

/// Screen rectangle of the cell grid (labels excluded) for a terminal area.
pub fn grid_rect(area: Rect, dimension: Dimension) -> Rect {
    let [_, body, _] = chunks(area);
    let [_, board_area, _] = columns(body);
    let board = board_rect(board_area, dimension);
    Rect {
        x: board.x + LABEL_WIDTH,
        y: board.y + 1,
        width: board.width.saturating_sub(LABEL_WIDTH),
        height: board.height.saturating_sub(1),
    }
}

fn draw_board(frame: &mut Frame, area: Rect, view: &BoardView, cursor: Coordinate, palette: &Palette) {
    let dimension = view.dimension();
    let board = board_rect(area, dimension);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::with_capacity(dimension.get() + 1);
    let header: String = (1..=dimension.get()).map(|c| format!("{:^3}", c)).collect();
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH as usize)),
        Span::styled(header, label),
    ]));

    for (r, cells) in view.rows().enumerate() {
        let row = r + 1;
        let mut spans = vec![Span::styled(format!("{:>2} ", row), label)];
        for (c, cell) in cells.iter().enumerate() {
            let coord = Coordinate::new(row, c + 1);
            let bg = if coord == cursor {
                palette.cursor
            } else {
                palette.background(cell.highlight)
            };
            spans.push(Span::styled(
                format!(" {} ", glyph(cell.piece)),
                palette.piece(cell.piece).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), board);
}

fn glyph(piece: PieceKind) -> char {
    match piece {
        PieceKind::Empty => ' ',
        PieceKind::BlackPawn | PieceKind::WhitePawn => '●',
        PieceKind::WhiteKing => '♚',
    }
}

fn draw_tally(frame: &mut Frame, area: Rect, captor: Player, panel: &TallyPanel, palette: &Palette) {
    let markers: Vec<Line> = panel
        .markers()
        .chunks(5)
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|m| Span::styled(format!("{} ", glyph(*m)), palette.piece(*m)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    let tally = Paragraph::new(markers).block(
        Block::default()
            .title(format!("{} took {}", captor, panel.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(tally, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tafl::{BasicEngine, Variant};
    use crate::session::{GameSession, SessionSettings};
    use ratatui::{Terminal, backend::TestBackend};

    fn app(variant: Variant) -> App {
        let session =
            GameSession::start(BasicEngine::new(), SessionSettings::default(), variant).unwrap();
        App::new(session, Palette::default())
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_shows_title_and_labels() {
        let screen = rendered(&app(Variant::Brandubh));
        assert!(screen.contains("Brandubh (7 x 7)"));
        assert!(screen.contains("Black took 0"));
        assert!(screen.contains("White took 0"));
        assert!(screen.contains('♚'));
    }

    #[test]
    fn test_grid_rect_fits_board() {
        let area = Rect::new(0, 0, 80, 24);
        let dimension = Dimension::new(11).unwrap();
        let grid = grid_rect(area, dimension);
        assert_eq!(grid.width, 11 * CELL_WIDTH);
        assert_eq!(grid.height, 11);
        assert!(grid.x >= TALLY_WIDTH && grid.y >= 3);
    }

    #[test]
    fn test_cursor_cell_uses_cursor_color() {
        let app = app(Variant::Brandubh);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        let grid = grid_rect(Rect::new(0, 0, 80, 24), Dimension::new(7).unwrap());
        let cursor = app.cursor();
        let x = grid.x + (cursor.col() as u16 - 1) * CELL_WIDTH;
        let y = grid.y + cursor.row() as u16 - 1;
        let cell = &terminal.backend().buffer()[(x, y)];
        assert_eq!(cell.bg, Palette::default().cursor);
    }
}
