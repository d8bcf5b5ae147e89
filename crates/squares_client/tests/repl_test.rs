//! Tests for the command prompt parser and printouts.

use squares_board::{BoardState, Color, Position};
use squares_client::repl::{
    Command, CommandError, blocks_move, format_board, outcome_line, parse_command, turn_line,
};
use squares_client::{
    CallOutcome, FirstMover, GameSetup, Outcome, TransportError, TransportErrorKind, TurnInput,
    TurnMachine,
};

fn defaults() -> GameSetup {
    GameSetup::new(5)
}

#[test]
fn test_blank_line_is_no_command() {
    assert_eq!(parse_command("   ", defaults()), Ok(None));
}

#[test]
fn test_simple_verbs_are_case_insensitive() {
    assert_eq!(parse_command("help", defaults()), Ok(Some(Command::Help)));
    assert_eq!(parse_command("Board", defaults()), Ok(Some(Command::Board)));
    assert_eq!(parse_command("EXIT", defaults()), Ok(Some(Command::Exit)));
    assert_eq!(parse_command("quit", defaults()), Ok(Some(Command::Exit)));
    assert_eq!(parse_command("retry", defaults()), Ok(Some(Command::Retry)));
}

#[test]
fn test_unknown_verb() {
    assert_eq!(
        parse_command("JUMP 1,2", defaults()),
        Err(CommandError::Unknown)
    );
}

#[test]
fn test_game_with_size_only_keeps_defaults() {
    let defaults = GameSetup::new(5).with_human(Color::Black);
    assert_eq!(
        parse_command("GAME 7", defaults),
        Ok(Some(Command::Game(GameSetup::new(7).with_human(Color::Black))))
    );
}

#[test]
fn test_game_with_comp_first() {
    let command = parse_command("GAME 5, comp w, user b", defaults());
    assert_eq!(
        command,
        Ok(Some(Command::Game(
            GameSetup::new(5)
                .with_human(Color::Black)
                .with_first_mover(FirstMover::Opponent)
        )))
    );
}

#[test]
fn test_game_with_user_first() {
    let command = parse_command("game 4, USER B, comp W", defaults());
    assert_eq!(
        command,
        Ok(Some(Command::Game(
            GameSetup::new(4)
                .with_human(Color::Black)
                .with_first_mover(FirstMover::Human)
        )))
    );
}

#[test]
fn test_game_rejections() {
    assert_eq!(
        parse_command("GAME 2", defaults()),
        Err(CommandError::SizeTooSmall)
    );
    assert_eq!(
        parse_command("GAME 5, user w, comp w", defaults()),
        Err(CommandError::SameColors)
    );
    assert_eq!(
        parse_command("GAME 5, user w, user b", defaults()),
        Err(CommandError::Seats)
    );
    assert_eq!(
        parse_command("GAME 20", defaults()),
        Err(CommandError::SizeTooLarge)
    );
    assert_eq!(
        parse_command("GAME 5000000000", defaults()),
        Err(CommandError::SizeTooLarge)
    );
    assert!(matches!(
        parse_command("GAME five", defaults()),
        Err(CommandError::Format { .. })
    ));
    assert!(matches!(
        parse_command("GAME 5, user w", defaults()),
        Err(CommandError::Format { .. })
    ));
}

#[test]
fn test_move_is_one_based_column_then_row() {
    assert_eq!(
        parse_command("MOVE 3, 1", defaults()),
        Ok(Some(Command::Move(Position::new(0, 2))))
    );
    assert_eq!(
        parse_command("MOVE 0, 1", defaults()),
        Err(CommandError::InvalidMove)
    );
    assert!(matches!(
        parse_command("MOVE 1", defaults()),
        Err(CommandError::Format { .. })
    ));
}

#[test]
fn test_size_error_message() {
    assert_eq!(
        CommandError::SizeTooSmall.to_string(),
        "Board size must be > 2"
    );
}

#[test]
fn test_format_board_marks_stones() {
    let mut board = BoardState::new(3).unwrap();
    board.place(Position::new(0, 0), Color::White).unwrap();
    board.place(Position::new(2, 1), Color::Black).unwrap();

    let printed = format_board(&board);
    let lines: Vec<&str> = printed.lines().filter(|l| !l.is_empty()).collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["1", "2", "3"]);
    assert_eq!(
        lines[1].split_whitespace().collect::<Vec<_>>(),
        ["1", "W", ".", ".", "1"]
    );
    assert_eq!(
        lines[3].split_whitespace().collect::<Vec<_>>(),
        ["3", ".", "B", ".", "3"]
    );
}

#[test]
fn test_turn_line_follows_machine() {
    let mut machine = TurnMachine::new();
    assert_eq!(turn_line(&machine), None);

    machine.handle(TurnInput::NewGame(GameSetup::new(3)));
    assert_eq!(
        turn_line(&machine).as_deref(),
        Some("Current turn: w (user)")
    );

    machine.handle(TurnInput::CellActivated(Position::new(0, 0)));
    assert_eq!(
        turn_line(&machine).as_deref(),
        Some("Current turn: b (comp)")
    );
}

#[test]
fn test_outcome_lines() {
    assert_eq!(
        outcome_line(Outcome::Win(Color::Black)),
        "Game finished. b wins!"
    );
    assert_eq!(outcome_line(Outcome::Draw), "Game finished. Draw");
}

#[test]
fn test_occupied_cell_blocks_move_until_step_stalls() {
    let mut machine = TurnMachine::new();
    machine.handle(TurnInput::NewGame(GameSetup::new(3)));
    let stone = Position::new(0, 0);
    assert!(!blocks_move(&machine, stone));

    let effects = machine.handle(TurnInput::CellActivated(stone));
    let generation = machine.generation();
    assert!(!effects.is_empty());
    assert!(blocks_move(&machine, stone));

    let refused = TransportError::new(TransportErrorKind::Connection("refused".to_string()));
    machine.handle(TurnInput::Completed {
        generation,
        outcome: CallOutcome::Status(Err(refused)),
    });

    assert!(machine.is_stalled());
    assert!(!blocks_move(&machine, stone));
}
