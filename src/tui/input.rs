//! Cursor movement and mouse hit-testing.

use crate::games::tafl::{Coordinate, Dimension};
use crossterm::event::KeyCode;
use ratatui::layout::Rect;

use super::ui::CELL_WIDTH;

/// Moves the cursor one cell for arrow keys or `hjkl`, clamped to the board.
pub fn move_cursor(cursor: Coordinate, key: KeyCode, dimension: Dimension) -> Coordinate {
    let delta = match key {
        KeyCode::Up | KeyCode::Char('k') => (-1, 0),
        KeyCode::Down | KeyCode::Char('j') => (1, 0),
        KeyCode::Left | KeyCode::Char('h') => (0, -1),
        KeyCode::Right | KeyCode::Char('l') => (0, 1),
        _ => return cursor,
    };
    cursor.step(delta, dimension).unwrap_or(cursor)
}

/// Cell under a terminal position, given the grid's screen rectangle.
pub fn cell_at(grid: Rect, column: u16, row: u16, dimension: Dimension) -> Option<Coordinate> {
    if column < grid.x || row < grid.y {
        return None;
    }
    let coord = Coordinate::new(
        usize::from(row - grid.y) + 1,
        usize::from((column - grid.x) / CELL_WIDTH) + 1,
    );
    coord.within(dimension).then_some(coord)
}
