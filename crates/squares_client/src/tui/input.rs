//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use squares_board::Position;

/// Moves the cursor one cell on a `size`×`size` grid, stopping at the edges.
pub fn move_cursor(cursor: Position, size: usize, key: KeyCode) -> Position {
    let last = size.saturating_sub(1);
    let Position { row, col } = cursor;
    match key {
        KeyCode::Left | KeyCode::Char('h') => Position::new(row, col.saturating_sub(1)),
        KeyCode::Right | KeyCode::Char('l') => Position::new(row, (col + 1).min(last)),
        KeyCode::Up | KeyCode::Char('k') => Position::new(row.saturating_sub(1), col),
        KeyCode::Down | KeyCode::Char('j') => Position::new((row + 1).min(last), col),
        _ => cursor,
    }
}

/// Pulls the cursor back onto a board of `size`.
pub fn clamp_cursor(cursor: Position, size: usize) -> Position {
    let last = size.saturating_sub(1);
    Position::new(cursor.row.min(last), cursor.col.min(last))
}
