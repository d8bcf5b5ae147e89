//! Turn orchestration as an explicit state machine.
//!
//! Every human move runs the same sequence against the service:
//!
//! ```text
//! AwaitingHumanMove --cell--> CheckingStatusAfterHuman --Ongoing--> AwaitingServerMove
//!        ^                            |                                  |      |
//!        |                       Win / Draw                         no move   move
//!        |                            v                                  |      v
//!        +--------Ongoing------- Terminal <---Win / Draw--- CheckingStatusAfterServer
//! ```
//!
//! The machine does no I/O. [`TurnMachine::handle`] consumes one input and
//! returns the effects the driver must carry out, in order: redraws, status
//! lines, announcements, and at most one remote call. Calls are tagged with
//! the game [`Generation`] so answers for an abandoned game are dropped.

use crate::transport::TransportError;
use crate::wire::{GameStatusResult, MoveResult, Outcome};
use serde::{Deserialize, Serialize};
use squares_board::{BoardError, BoardSnapshot, BoardState, Color, Position};
use tracing::{debug, info, instrument, warn};

/// Shown when a game starts.
pub const MSG_NEW_GAME: &str = "New game";
/// Shown after the human's stone is placed.
pub const MSG_HUMAN_MOVED: &str = "You moved. Checking status...";
/// Shown when the service declines to move.
pub const MSG_NO_MOVE: &str = "No move from server (maybe game finished)";
/// Shown when play returns to the human.
pub const MSG_YOUR_MOVE: &str = "Your move";
/// Shown for input before any game exists.
pub const MSG_NOT_STARTED: &str = "Game not started";
/// Shown for input after a win or draw.
pub const MSG_FINISHED: &str = "Game already finished";

/// Epoch of one "new game". Increases monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who places the first stone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum FirstMover {
    /// The local player.
    #[default]
    Human,
    /// The remote service.
    Opponent,
}

/// Parameters of a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSetup {
    /// Board side length.
    pub size: usize,
    /// Color of the local player; the service plays the other one.
    pub human: Color,
    /// Who moves first.
    pub first_mover: FirstMover,
}

impl GameSetup {
    /// Human plays White and moves first.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            human: Color::White,
            first_mover: FirstMover::Human,
        }
    }

    /// Sets the human's color.
    pub fn with_human(mut self, human: Color) -> Self {
        self.human = human;
        self
    }

    /// Sets who moves first.
    pub fn with_first_mover(mut self, first_mover: FirstMover) -> Self {
        self.first_mover = first_mover;
        self
    }
}

/// Where the turn currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No game yet.
    Idle,
    /// Waiting for the human to pick a cell.
    AwaitingHumanMove,
    /// Asking the service whether the human's move ended the game.
    CheckingStatusAfterHuman,
    /// Asking the service for its move.
    AwaitingServerMove,
    /// Asking the service whether its own move ended the game.
    CheckingStatusAfterServer,
    /// Game over until the next new game.
    Terminal(Outcome),
}

/// The two remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum CallKind {
    /// `gameStatus`.
    GameStatus,
    /// `nextMove`.
    NextMove,
}

/// A request the driver must send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    /// Game the call belongs to.
    pub generation: Generation,
    /// Which operation.
    pub kind: CallKind,
    /// Request body.
    pub snapshot: BoardSnapshot,
}

/// Result of a remote call, as delivered back to the machine.
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// Answer to `gameStatus`.
    Status(Result<GameStatusResult, TransportError>),
    /// Answer to `nextMove`.
    Move(Result<Option<MoveResult>, TransportError>),
}

impl CallOutcome {
    fn kind(&self) -> CallKind {
        match self {
            CallOutcome::Status(_) => CallKind::GameStatus,
            CallOutcome::Move(_) => CallKind::NextMove,
        }
    }
}

/// Everything that can drive the machine.
#[derive(Debug, Clone)]
pub enum TurnInput {
    /// Discard the current game and start another.
    NewGame(GameSetup),
    /// The user picked a cell.
    CellActivated(Position),
    /// Reissue the call that last failed.
    Retry,
    /// A remote call finished.
    Completed {
        /// Generation the call was issued under.
        generation: Generation,
        /// What came back.
        outcome: CallOutcome,
    },
}

/// Work the driver performs on the machine's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Redraw the board.
    Render(BoardState),
    /// Replace the status line.
    Status(String),
    /// Tell the user the game is over.
    Announce(Outcome),
    /// Send a request to the service.
    Call(RemoteCall),
}

/// Owns the board and the turn bookkeeping for the single live game.
#[derive(Debug, Clone)]
pub struct TurnMachine {
    state: TurnState,
    board: Option<BoardState>,
    human: Color,
    generation: Generation,
    outstanding: Option<CallKind>,
}

impl Default for TurnMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnMachine {
    /// Creates an idle machine.
    pub fn new() -> Self {
        Self {
            state: TurnState::Idle,
            board: None,
            human: Color::White,
            generation: Generation::default(),
            outstanding: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Board of the live game.
    pub fn board(&self) -> Option<&BoardState> {
        self.board.as_ref()
    }

    /// Human's color in the live game.
    pub fn human(&self) -> Color {
        self.human
    }

    /// Opponent's color in the live game.
    pub fn opponent(&self) -> Color {
        self.human.opponent()
    }

    /// Generation of the live game.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Checks if a call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Checks if the current step's call failed and waits for a retry.
    pub fn is_stalled(&self) -> bool {
        self.outstanding.is_none() && self.pending_call().is_some()
    }

    /// Applies one input and returns the resulting effects in order.
    #[instrument(skip(self), fields(state = ?self.state, generation = %self.generation))]
    pub fn handle(&mut self, input: TurnInput) -> Vec<Effect> {
        let mut effects = Vec::new();
        match input {
            TurnInput::NewGame(setup) => self.start(setup, &mut effects),
            TurnInput::CellActivated(position) => self.activate(position, &mut effects),
            TurnInput::Retry => self.retry(&mut effects),
            TurnInput::Completed {
                generation,
                outcome,
            } => self.complete(generation, outcome, &mut effects),
        }
        debug!(next_state = ?self.state, effects = effects.len(), "Input handled");
        effects
    }

    fn start(&mut self, setup: GameSetup, effects: &mut Vec<Effect>) {
        let board = match BoardState::new(setup.size) {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "Cannot start game");
                effects.push(Effect::Status(format!("Cannot start game: {}", e)));
                return;
            }
        };

        self.generation = self.generation.next();
        if let Some(kind) = self.outstanding.take() {
            info!(%kind, "Abandoning outstanding call of previous game");
        }
        self.human = setup.human;
        self.board = Some(board.clone());
        info!(
            size = setup.size,
            human = %setup.human,
            first = %setup.first_mover,
            generation = %self.generation,
            "New game"
        );

        effects.push(Effect::Render(board));
        effects.push(Effect::Status(MSG_NEW_GAME.to_string()));

        match setup.first_mover {
            FirstMover::Human => self.state = TurnState::AwaitingHumanMove,
            FirstMover::Opponent => {
                self.state = TurnState::AwaitingServerMove;
                self.dispatch(effects);
            }
        }
    }

    fn activate(&mut self, position: Position, effects: &mut Vec<Effect>) {
        if self.is_busy() {
            debug!(%position, "Call outstanding, activation dropped");
            return;
        }

        match self.state {
            TurnState::Idle => effects.push(Effect::Status(MSG_NOT_STARTED.to_string())),
            TurnState::Terminal(_) => effects.push(Effect::Status(MSG_FINISHED.to_string())),
            TurnState::AwaitingHumanMove => self.place_human(position, effects),
            TurnState::CheckingStatusAfterHuman
            | TurnState::AwaitingServerMove
            | TurnState::CheckingStatusAfterServer => {
                debug!(%position, "Step stalled, activation retries it");
                self.retry(effects);
            }
        }
    }

    fn place_human(&mut self, position: Position, effects: &mut Vec<Effect>) {
        let human = self.human;
        let Some(board) = self.board.as_mut() else {
            return;
        };

        match board.place(position, human) {
            Ok(()) => {}
            Err(BoardError::CellOccupied { .. }) => {
                debug!(%position, "Cell occupied, activation ignored");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Human move rejected");
                effects.push(Effect::Status(format!("Invalid move: {}", e)));
                return;
            }
        }

        effects.push(Effect::Render(board.clone()));
        effects.push(Effect::Status(MSG_HUMAN_MOVED.to_string()));
        self.state = TurnState::CheckingStatusAfterHuman;
        self.dispatch(effects);
    }

    fn retry(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_stalled() {
            debug!("Nothing to retry");
            return;
        }
        info!(state = ?self.state, "Retrying stalled step");
        effects.push(Effect::Status("Retrying...".to_string()));
        self.dispatch(effects);
    }

    /// Call the current state waits on, with the color that moves next.
    fn pending_call(&self) -> Option<(CallKind, Color)> {
        match self.state {
            TurnState::CheckingStatusAfterHuman => Some((CallKind::GameStatus, self.opponent())),
            TurnState::AwaitingServerMove => Some((CallKind::NextMove, self.opponent())),
            TurnState::CheckingStatusAfterServer => Some((CallKind::GameStatus, self.human)),
            _ => None,
        }
    }

    fn dispatch(&mut self, effects: &mut Vec<Effect>) {
        let (Some((kind, next)), Some(board)) = (self.pending_call(), self.board.as_ref()) else {
            return;
        };
        let call = RemoteCall {
            generation: self.generation,
            kind,
            snapshot: board.snapshot(next),
        };
        debug!(%kind, %next, generation = %self.generation, "Issuing call");
        self.outstanding = Some(kind);
        effects.push(Effect::Call(call));
    }

    fn complete(&mut self, generation: Generation, outcome: CallOutcome, effects: &mut Vec<Effect>) {
        if generation != self.generation {
            info!(
                stale = %generation,
                current = %self.generation,
                "Dropping answer for superseded game"
            );
            return;
        }
        if self.outstanding != Some(outcome.kind()) {
            warn!(kind = %outcome.kind(), "Unexpected answer, dropped");
            return;
        }
        self.outstanding = None;

        match (self.state, outcome) {
            (_, CallOutcome::Status(Err(e)) | CallOutcome::Move(Err(e))) => {
                warn!(error = %e, state = ?self.state, "Call failed, step stalled");
                effects.push(Effect::Status(e.user_message()));
            }
            (TurnState::CheckingStatusAfterHuman, CallOutcome::Status(Ok(result))) => {
                effects.push(Effect::Status(server_line(&result)));
                if !self.finish_if_terminal(&result, effects) {
                    self.state = TurnState::AwaitingServerMove;
                    self.dispatch(effects);
                }
            }
            (TurnState::AwaitingServerMove, CallOutcome::Move(Ok(None))) => {
                info!("Service declined to move");
                effects.push(Effect::Status(MSG_NO_MOVE.to_string()));
                self.state = TurnState::AwaitingHumanMove;
            }
            (TurnState::AwaitingServerMove, CallOutcome::Move(Ok(Some(mv)))) => {
                self.place_server(mv, effects);
            }
            (TurnState::CheckingStatusAfterServer, CallOutcome::Status(Ok(result))) => {
                if result.outcome().is_terminal() {
                    effects.push(Effect::Status(server_line(&result)));
                    self.finish_if_terminal(&result, effects);
                } else {
                    effects.push(Effect::Status(MSG_YOUR_MOVE.to_string()));
                    self.state = TurnState::AwaitingHumanMove;
                }
            }
            (state, outcome) => {
                warn!(?state, kind = %outcome.kind(), "Answer does not fit current state");
            }
        }
    }

    fn place_server(&mut self, mv: MoveResult, effects: &mut Vec<Effect>) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        if let Err(e) = board.place(*mv.position(), *mv.color()) {
            warn!(error = %e, "Service move violates the board, step stalled");
            effects.push(Effect::Status(format!("Server move rejected: {}", e)));
            return;
        }
        info!(position = %mv.position(), color = %mv.color(), "Opponent moved");
        effects.push(Effect::Render(board.clone()));
        self.state = TurnState::CheckingStatusAfterServer;
        self.dispatch(effects);
    }

    fn finish_if_terminal(&mut self, result: &GameStatusResult, effects: &mut Vec<Effect>) -> bool {
        let outcome = *result.outcome();
        if !outcome.is_terminal() {
            return false;
        }
        info!(%outcome, "Game over");
        self.state = TurnState::Terminal(outcome);
        effects.push(Effect::Announce(outcome));
        true
    }
}

fn server_line(result: &GameStatusResult) -> String {
    if result.message().is_empty() {
        "Server: no response".to_string()
    } else {
        format!("Server: {}", result.message())
    }
}
