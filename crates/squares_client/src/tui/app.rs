//! Application state and key handling.

use super::input::{clamp_cursor, move_cursor};
use crate::client::{ClientEvent, UserCommand};
use crate::config::MIN_PLAYABLE_SIZE;
use crate::machine::GameSetup;
use crate::wire::Outcome;
use crossterm::event::KeyCode;
use squares_board::{BoardState, MAX_BOARD_SIZE, Position};
use tracing::debug;

/// Main application state.
pub struct App {
    board: Option<BoardState>,
    cursor: Position,
    status: String,
    game_over: Option<Outcome>,
    setup: GameSetup,
    should_quit: bool,
}

impl App {
    /// Creates the application; `setup` seeds every new game.
    pub fn new(setup: GameSetup) -> Self {
        Self {
            board: None,
            cursor: Position::new(0, 0),
            status: "Connecting...".to_string(),
            game_over: None,
            setup,
            should_quit: false,
        }
    }

    /// Board of the live game.
    pub fn board(&self) -> Option<&BoardState> {
        self.board.as_ref()
    }

    /// Highlighted cell.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Outcome awaiting acknowledgement.
    pub fn game_over(&self) -> Option<Outcome> {
        self.game_over
    }

    /// Size the next new game will use.
    pub fn next_size(&self) -> usize {
        self.setup.size
    }

    /// Checks if the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Setup for the next new game.
    pub fn setup(&self) -> GameSetup {
        self.setup
    }

    /// Applies an update from the game client.
    pub fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Board(board) => {
                self.cursor = clamp_cursor(self.cursor, board.size());
                self.board = Some(board);
            }
            ClientEvent::Status(message) => self.status = message,
            ClientEvent::GameOver(outcome) => self.game_over = Some(outcome),
        }
    }

    /// Maps a key press to a command for the game client, if any.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<UserCommand> {
        debug!(?key, "Key pressed");
        if self.game_over.is_some() {
            return self.handle_modal_key(key);
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Some(UserCommand::Quit)
            }
            KeyCode::Char('n') => Some(self.new_game()),
            KeyCode::Char('r') => Some(UserCommand::Retry),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.setup.size = (self.setup.size + 1).min(MAX_BOARD_SIZE);
                self.status = format!("Next game size: {}", self.setup.size);
                None
            }
            KeyCode::Char('-') => {
                self.setup.size = self.setup.size.saturating_sub(1).max(MIN_PLAYABLE_SIZE);
                self.status = format!("Next game size: {}", self.setup.size);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.board.as_ref().map(|_| UserCommand::Activate(self.cursor))
            }
            other => {
                if let Some(board) = &self.board {
                    self.cursor = move_cursor(self.cursor, board.size(), other);
                }
                None
            }
        }
    }

    fn handle_modal_key(&mut self, key: KeyCode) -> Option<UserCommand> {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                self.game_over = None;
                None
            }
            KeyCode::Char('n') => Some(self.new_game()),
            KeyCode::Char('q') => {
                self.should_quit = true;
                Some(UserCommand::Quit)
            }
            _ => None,
        }
    }

    fn new_game(&mut self) -> UserCommand {
        self.game_over = None;
        self.cursor = Position::new(0, 0);
        UserCommand::NewGame(self.setup)
    }
}
