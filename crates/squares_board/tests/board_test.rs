//! Tests for the board model.

use squares_board::{BoardError, BoardState, Cell, Color, MAX_BOARD_SIZE, Position};
use strum::IntoEnumIterator;

#[test]
fn test_new_board_is_empty() {
    let board = BoardState::new(4).expect("valid size");
    assert_eq!(board.size(), 4);
    assert_eq!(board.cells().len(), 16);
    assert_eq!(board.empty_cells(), 16);
    assert!(board.cells().iter().all(|c| c.is_empty()));
}

#[test]
fn test_zero_size_rejected() {
    assert_eq!(
        BoardState::new(0),
        Err(BoardError::InvalidSize { size: 0 })
    );
}

#[test]
fn test_oversized_board_rejected() {
    let largest = BoardState::new(MAX_BOARD_SIZE).expect("valid size");
    assert_eq!(largest.empty_cells(), MAX_BOARD_SIZE * MAX_BOARD_SIZE);

    for size in [MAX_BOARD_SIZE + 1, 100_000, usize::MAX] {
        assert_eq!(BoardState::new(size), Err(BoardError::InvalidSize { size }));
    }
}

#[test]
fn test_oversized_reset_keeps_board() {
    let mut board = BoardState::new(3).expect("valid size");
    board.place(Position::new(0, 0), Color::Black).expect("empty cell");

    assert!(board.reset(usize::MAX).is_err());
    assert_eq!(board.size(), 3);
    assert_eq!(
        board.get(Position::new(0, 0)),
        Some(Cell::Occupied(Color::Black))
    );
}

#[test]
fn test_single_cell_board() {
    let mut board = BoardState::new(1).expect("valid size");
    board.place(Position::new(0, 0), Color::Black).expect("empty cell");
    assert!(board.is_full());
}

#[test]
fn test_place_and_get() {
    let mut board = BoardState::new(3).expect("valid size");
    board.place(Position::new(1, 2), Color::White).expect("empty cell");

    assert_eq!(
        board.get(Position::new(1, 2)),
        Some(Cell::Occupied(Color::White))
    );
    assert_eq!(board.get(Position::new(2, 1)), Some(Cell::Empty));
    assert_eq!(board.get(Position::new(3, 0)), None);
}

#[test]
fn test_place_out_of_bounds_is_rejected() {
    let mut board = BoardState::new(3).expect("valid size");
    let before = board.clone();

    let result = board.place(Position::new(0, 3), Color::Black);

    assert_eq!(
        result,
        Err(BoardError::OutOfBounds {
            position: Position::new(0, 3),
            size: 3
        })
    );
    assert_eq!(board, before);
}

#[test]
fn test_place_on_occupied_cell_is_rejected() {
    let mut board = BoardState::new(3).expect("valid size");
    board.place(Position::new(1, 1), Color::Black).expect("empty cell");
    let before = board.clone();

    let result = board.place(Position::new(1, 1), Color::White);

    assert_eq!(
        result,
        Err(BoardError::CellOccupied {
            position: Position::new(1, 1),
            occupant: Color::Black
        })
    );
    assert_eq!(board, before);
}

#[test]
fn test_reset_discards_stones() {
    let mut board = BoardState::new(3).expect("valid size");
    board.place(Position::new(0, 0), Color::White).expect("empty cell");

    board.reset(5).expect("valid size");

    assert_eq!(board.size(), 5);
    assert_eq!(board.empty_cells(), 25);
}

#[test]
fn test_failed_reset_keeps_board() {
    let mut board = BoardState::new(3).expect("valid size");
    board.place(Position::new(0, 0), Color::White).expect("empty cell");
    let before = board.clone();

    assert!(board.reset(0).is_err());
    assert_eq!(board, before);
}

#[test]
fn test_rows_are_row_major() {
    let mut board = BoardState::new(2).expect("valid size");
    board.place(Position::new(1, 0), Color::Black).expect("empty cell");

    let rows: Vec<_> = board.rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], &[Cell::Empty, Cell::Empty]);
    assert_eq!(rows[1], &[Cell::Occupied(Color::Black), Cell::Empty]);
}

#[test]
fn test_color_opponent_and_chars() {
    for color in Color::iter() {
        assert_ne!(color.opponent(), color);
        assert_eq!(color.opponent().opponent(), color);
        assert_eq!(Color::from_char(color.to_char()), Some(color));
    }
    assert_eq!(Color::from_char('W'), Some(Color::White));
    assert_eq!(Color::from_char('x'), None);
}

#[test]
fn test_cell_char_alphabet() {
    assert_eq!(Cell::from_char(' '), Some(Cell::Empty));
    assert_eq!(Cell::from_char('.'), Some(Cell::Empty));
    assert_eq!(Cell::from_char('b'), Some(Cell::Occupied(Color::Black)));
    assert_eq!(Cell::from_char('?'), None);
    assert_eq!(Cell::Occupied(Color::White).to_char(), 'w');
}
