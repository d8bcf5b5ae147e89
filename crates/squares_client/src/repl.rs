//! Line-oriented command prompt.
//!
//! ```text
//! GAME N[, user C, comp C]   start a new game; the first-listed seat moves first
//! MOVE X, Y                  place a stone (1-based column, row)
//! BOARD | RETRY | HELP | EXIT
//! ```

use crate::client::{GameClient, Renderer, StatusSink};
use crate::config::{ClientConfig, MIN_PLAYABLE_SIZE};
use crate::http_transport::HttpTransport;
use crate::machine::{FirstMover, GameSetup, TurnMachine, TurnState};
use crate::wire::Outcome;
use derive_more::{Display, Error};
use squares_board::{BoardState, Cell, Color, MAX_BOARD_SIZE, Position};
use std::fmt::Write as _;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new game.
    Game(GameSetup),
    /// Place the human's stone.
    Move(Position),
    /// Print the board.
    Board,
    /// Reissue a failed call.
    Retry,
    /// Print the command list.
    Help,
    /// Leave the prompt.
    Exit,
}

/// Why a prompt line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CommandError {
    /// Unknown verb.
    #[display("Incorrect command")]
    Unknown,
    /// Known verb, unusable arguments.
    #[display("Incorrect command format: {reason}")]
    Format {
        /// What was wrong.
        reason: String,
    },
    /// Board too small for the service.
    #[display("Board size must be > {}", MIN_PLAYABLE_SIZE - 1)]
    SizeTooSmall,
    /// Board larger than the client draws.
    #[display("Board size must be at most {}", MAX_BOARD_SIZE)]
    SizeTooLarge,
    /// Both seats picked the same color.
    #[display("Players must have different colors")]
    SameColors,
    /// Seats other than one `user` and one `comp`.
    #[display("Exactly one user and one comp player are required")]
    Seats,
    /// Coordinate below 1.
    #[display("Invalid move")]
    InvalidMove,
}

fn format_error(reason: impl Into<String>) -> CommandError {
    CommandError::Format {
        reason: reason.into(),
    }
}

/// Parses one prompt line. Blank lines yield `Ok(None)`.
///
/// `defaults` supplies the seating when `GAME` names only a size.
#[instrument(skip(defaults))]
pub fn parse_command(line: &str, defaults: GameSetup) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match verb.to_ascii_uppercase().as_str() {
        "EXIT" | "QUIT" => Command::Exit,
        "HELP" => Command::Help,
        "BOARD" => Command::Board,
        "RETRY" => Command::Retry,
        "GAME" => Command::Game(parse_game(rest, defaults)?),
        "MOVE" => Command::Move(parse_move(rest)?),
        _ => return Err(CommandError::Unknown),
    };
    Ok(Some(command))
}

fn parse_game(rest: &str, defaults: GameSetup) -> Result<GameSetup, CommandError> {
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    let size: usize = parts[0]
        .parse()
        .map_err(|_| format_error(format!("bad size {:?}", parts[0])))?;
    if size < MIN_PLAYABLE_SIZE {
        return Err(CommandError::SizeTooSmall);
    }
    if size > MAX_BOARD_SIZE {
        return Err(CommandError::SizeTooLarge);
    }

    let setup = GameSetup::new(size)
        .with_human(defaults.human)
        .with_first_mover(defaults.first_mover);
    match parts.len() {
        1 => Ok(setup),
        3 => {
            let first = parse_seat(parts[1])?;
            let second = parse_seat(parts[2])?;
            if first.1 == second.1 {
                return Err(CommandError::SameColors);
            }
            match (first.0, second.0) {
                (Seat::User, Seat::Comp) => Ok(setup
                    .with_human(first.1)
                    .with_first_mover(FirstMover::Human)),
                (Seat::Comp, Seat::User) => Ok(setup
                    .with_human(second.1)
                    .with_first_mover(FirstMover::Opponent)),
                _ => Err(CommandError::Seats),
            }
        }
        _ => Err(format_error("expected GAME N or GAME N, TYPE1 C1, TYPE2 C2")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seat {
    User,
    Comp,
}

fn parse_seat(part: &str) -> Result<(Seat, Color), CommandError> {
    let tokens: Vec<&str> = part.split_whitespace().collect();
    let [kind, color] = tokens.as_slice() else {
        return Err(format_error(format!("invalid player {:?}", part)));
    };
    let seat = match kind.to_ascii_lowercase().as_str() {
        "user" => Seat::User,
        "comp" => Seat::Comp,
        other => return Err(format_error(format!("unknown type {:?}", other))),
    };
    let color = color
        .chars()
        .next()
        .and_then(Color::from_char)
        .ok_or_else(|| format_error(format!("unknown color {:?}", color)))?;
    Ok((seat, color))
}

fn parse_move(rest: &str) -> Result<Position, CommandError> {
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    let [x, y] = parts.as_slice() else {
        return Err(format_error("expected MOVE X, Y"));
    };
    let x: usize = x.parse().map_err(|_| format_error(format!("bad column {:?}", x)))?;
    let y: usize = y.parse().map_err(|_| format_error(format!("bad row {:?}", y)))?;
    if x == 0 || y == 0 {
        return Err(CommandError::InvalidMove);
    }
    Ok(Position::new(y - 1, x - 1))
}

/// Draws the board with 1-based rulers on every side.
pub fn format_board(board: &BoardState) -> String {
    let n = board.size();
    let mut out = String::from("\n   ");
    for x in 1..=n {
        let _ = write!(out, " {:>2}", x);
    }
    out.push('\n');
    for (y, row) in board.rows().enumerate() {
        let _ = write!(out, "{:>2} ", y + 1);
        for cell in row {
            let mark = match cell {
                Cell::Empty => ".",
                Cell::Occupied(Color::Black) => "B",
                Cell::Occupied(Color::White) => "W",
            };
            let _ = write!(out, " {:>2}", mark);
        }
        let _ = writeln!(out, "  {:>2}", y + 1);
    }
    out
}

/// Who is expected to act next, or `None` when nobody is.
pub fn turn_line(machine: &TurnMachine) -> Option<String> {
    let (color, seat) = match machine.state() {
        TurnState::Idle | TurnState::Terminal(_) => return None,
        TurnState::AwaitingHumanMove => (machine.human(), "user"),
        TurnState::CheckingStatusAfterHuman
        | TurnState::AwaitingServerMove
        | TurnState::CheckingStatusAfterServer => (machine.opponent(), "comp"),
    };
    Some(format!("Current turn: {} ({})", color.to_char(), seat))
}

/// Checks if `MOVE` on `position` should be refused as landing on a stone.
///
/// A stalled step is retried by any activation, so nothing is refused then.
pub fn blocks_move(machine: &TurnMachine, position: Position) -> bool {
    !machine.is_stalled()
        && machine
            .board()
            .and_then(|b| b.get(position))
            .is_some_and(|c| !c.is_empty())
}

/// Text shown for a finished game.
pub fn outcome_line(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win(color) => format!("Game finished. {} wins!", color.to_char()),
        Outcome::Draw => "Game finished. Draw".to_string(),
        Outcome::Ongoing => "Game in progress".to_string(),
    }
}

/// Prints each board to stdout.
#[derive(Debug, Default)]
pub struct PrintRenderer;

impl Renderer for PrintRenderer {
    fn render(&mut self, board: &BoardState) {
        println!("{}", format_board(board));
    }
}

/// Prints status lines and announcements to stdout.
#[derive(Debug, Default)]
pub struct PrintStatus;

impl StatusSink for PrintStatus {
    fn status(&mut self, message: &str) {
        println!("status: {}", message);
    }

    fn announce(&mut self, outcome: Outcome) {
        println!("*** {} ***", outcome_line(outcome));
    }
}

fn print_help() {
    println!("GAME N[, TYPE1 C1, TYPE2 C2]  - start new game (types user/comp, colors w/b)");
    println!("MOVE X, Y  - make user move (1-based coordinates)");
    println!("BOARD - print board");
    println!("RETRY - resend the request that failed");
    println!("HELP - this help");
    println!("EXIT - exit");
}

/// Runs the prompt on stdin until `EXIT` or end of input.
#[instrument(skip_all, fields(server_url = %config.server_url()))]
pub async fn run_repl(config: ClientConfig) -> anyhow::Result<()> {
    info!("Starting command prompt");
    let transport = HttpTransport::new(config.server_url().clone());
    let mut client = GameClient::new(transport, PrintRenderer, PrintStatus)
        .with_request_timeout(config.request_timeout());

    println!("=== SQUARE GAME CLI ===");
    println!("Type HELP for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line, config.game_setup()) {
            Ok(None) => {}
            Ok(Some(Command::Exit)) => break,
            Ok(Some(Command::Help)) => print_help(),
            Ok(Some(Command::Board)) => match client.machine().board() {
                Some(board) => {
                    println!("{}", format_board(board));
                    if let Some(turn) = turn_line(client.machine()) {
                        println!("{}", turn);
                    }
                }
                None => println!("Game not started"),
            },
            Ok(Some(Command::Game(setup))) => client.start_new_game(setup).await,
            Ok(Some(Command::Move(position))) => {
                if blocks_move(client.machine(), position) {
                    println!("Invalid move: cell is occupied");
                } else {
                    client.activate_cell(position).await;
                }
            }
            Ok(Some(Command::Retry)) => client.retry().await,
            Err(e) => {
                debug!(error = %e, line = %line, "Rejected command");
                println!("{}", e);
            }
        }
    }

    println!("Bye");
    Ok(())
}
