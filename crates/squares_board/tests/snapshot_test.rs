//! Tests for the wire snapshot.

use squares_board::{BoardSnapshot, BoardState, Color, Position, SnapshotError};

fn sample_board() -> BoardState {
    let mut board = BoardState::new(3).expect("valid size");
    board.place(Position::new(0, 0), Color::White).expect("empty cell");
    board.place(Position::new(1, 1), Color::Black).expect("empty cell");
    board.place(Position::new(2, 1), Color::White).expect("empty cell");
    board
}

#[test]
fn test_snapshot_is_row_major() {
    let snapshot = sample_board().snapshot(Color::Black);
    assert_eq!(snapshot.size(), 3);
    assert_eq!(snapshot.data(), "w   b  w ");
    assert_eq!(snapshot.next_player_color(), Color::Black);
}

#[test]
fn test_snapshot_decodes_to_same_occupancy() {
    let board = sample_board();
    let decoded = board.snapshot(Color::White).decode().expect("valid snapshot");

    for row in 0..board.size() {
        for col in 0..board.size() {
            let position = Position::new(row, col);
            assert_eq!(decoded.get(position), board.get(position), "at {position}");
        }
    }
}

#[test]
fn test_snapshot_json_shape() {
    let snapshot = sample_board().snapshot(Color::Black);
    let json = serde_json::to_value(&snapshot).expect("serializable");

    assert_eq!(
        json,
        serde_json::json!({
            "size": 3,
            "data": "w   b  w ",
            "nextPlayerColor": "b"
        })
    );
}

#[test]
fn test_decode_accepts_dots_and_line_breaks() {
    let snapshot = BoardSnapshot::new(2, "w.\r\n.B".to_string(), Color::White);
    let board = snapshot.decode().expect("valid snapshot");

    assert_eq!(board.empty_cells(), 2);
    assert_eq!(
        board.get(Position::new(1, 1)).and_then(|c| c.color()),
        Some(Color::Black)
    );
}

#[test]
fn test_decode_rejects_wrong_length() {
    let snapshot = BoardSnapshot::new(3, "w ".to_string(), Color::White);
    assert_eq!(
        snapshot.decode(),
        Err(SnapshotError::LengthMismatch {
            expected: 9,
            actual: 2
        })
    );
}

#[test]
fn test_decode_rejects_unknown_cell() {
    let snapshot = BoardSnapshot::new(2, "w x ".to_string(), Color::White);
    assert_eq!(
        snapshot.decode(),
        Err(SnapshotError::InvalidCell {
            index: 2,
            found: 'x'
        })
    );
}

#[test]
fn test_decode_rejects_huge_size() {
    let json = r#"{"size":18446744073709551615,"data":"","nextPlayerColor":"b"}"#;
    let snapshot: BoardSnapshot = serde_json::from_str(json).expect("valid json");
    assert_eq!(
        snapshot.decode(),
        Err(SnapshotError::InvalidSize { size: usize::MAX })
    );
}

#[test]
fn test_decode_rejects_size_zero() {
    let snapshot = BoardSnapshot::new(0, String::new(), Color::Black);
    assert_eq!(snapshot.decode(), Err(SnapshotError::InvalidSize { size: 0 }));
}
