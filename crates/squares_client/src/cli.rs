//! Command-line interface for the squares client.

use clap::{Args, Parser, Subcommand, ValueEnum};
use squares_client::FirstMover;
use std::path::PathBuf;

/// Squares - play a two-color grid game against a remote service
#[derive(Parser, Debug)]
#[command(name = "squares")]
#[command(about = "Client for a remote squares game service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, default_value = "squares.toml")]
    pub config: PathBuf,

    /// Service base URL; overrides config and environment
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Request timeout in milliseconds, 0 to wait forever
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play on an interactive grid
    Play(GameArgs),

    /// Play from a line-oriented prompt
    Prompt(GameArgs),
}

/// Options for the opening game.
#[derive(Args, Debug, Clone, Default)]
pub struct GameArgs {
    /// Board size
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Color played by the human
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// Let the service open the game
    #[arg(long)]
    pub opponent_first: bool,
}

/// Stone color on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    /// Black stones
    #[value(alias = "b")]
    Black,
    /// White stones
    #[value(alias = "w")]
    White,
}

impl From<ColorArg> for squares_board::Color {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Black => squares_board::Color::Black,
            ColorArg::White => squares_board::Color::White,
        }
    }
}

impl GameArgs {
    /// First mover requested on the command line, if any.
    pub fn first_mover(&self) -> Option<FirstMover> {
        self.opponent_first.then_some(FirstMover::Opponent)
    }
}
