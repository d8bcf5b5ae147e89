//! Client for a remote squares game service.
//!
//! The human plays one color on an N×N board; the service answers with the
//! opponent's moves and decides when the game is over. The crate is split
//! into:
//!
//! - [`TurnMachine`]: the pure turn protocol, one input in, a list of
//!   [`Effect`]s out
//! - [`Transport`]: the two remote operations, with [`HttpTransport`] as the
//!   JSON-over-HTTP binding
//! - [`GameClient`]: the async driver that performs effects against a
//!   [`Renderer`] and a [`StatusSink`]
//! - front ends: a ratatui grid ([`tui`]) and a line prompt ([`repl`])
//!
//! # Example
//!
//! ```no_run
//! use squares_client::{GameClient, GameSetup, HttpTransport, Renderer, StatusSink, Outcome};
//! use squares_board::{BoardState, Color, Position};
//!
//! struct Quiet;
//! impl Renderer for Quiet {
//!     fn render(&mut self, _board: &BoardState) {}
//! }
//! impl StatusSink for Quiet {
//!     fn status(&mut self, message: &str) { println!("{message}"); }
//!     fn announce(&mut self, outcome: Outcome) { println!("{outcome}"); }
//! }
//!
//! # async fn demo() {
//! let transport = HttpTransport::new("http://localhost:8080/api/squares");
//! let mut client = GameClient::new(transport, Quiet, Quiet);
//! client.start_new_game(GameSetup::new(5).with_human(Color::White)).await;
//! client.activate_cell(Position::new(2, 2)).await;
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod http_transport;
mod machine;
mod transport;
mod wire;

pub mod repl;
pub mod tui;

pub use client::{
    ChannelRenderer, ChannelStatusSink, ClientEvent, GameClient, Renderer, StatusSink,
    UserCommand,
};
pub use config::{ClientConfig, ConfigError, MIN_PLAYABLE_SIZE, SERVER_URL_ENV};
pub use http_transport::{GAME_STATUS_PATH, HttpTransport, NEXT_MOVE_PATH};
pub use machine::{
    CallKind, CallOutcome, Effect, FirstMover, GameSetup, Generation, MSG_FINISHED,
    MSG_HUMAN_MOVED, MSG_NEW_GAME, MSG_NO_MOVE, MSG_NOT_STARTED, MSG_YOUR_MOVE, RemoteCall,
    TurnInput, TurnMachine, TurnState,
};
pub use transport::{Transport, TransportError, TransportErrorKind};
pub use wire::{
    GameStatusResponse, GameStatusResult, MoveResponse, MoveResult, Outcome, STATUS_DRAW,
    STATUS_ONGOING, STATUS_WIN,
};
