//! Async driver that carries out the turn machine's effects.

use crate::machine::{
    CallKind, CallOutcome, Effect, GameSetup, RemoteCall, TurnInput, TurnMachine,
};
use crate::transport::{Transport, TransportError, TransportErrorKind};
use crate::wire::Outcome;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use squares_board::{BoardState, Position};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Draws the board. Never mutates game state.
pub trait Renderer: Send {
    /// Shows `board`.
    fn render(&mut self, board: &BoardState);
}

/// Shows human-readable progress.
pub trait StatusSink: Send {
    /// Replaces the status line.
    fn status(&mut self, message: &str);

    /// Tells the user the game is over. Front ends should make this
    /// impossible to miss.
    fn announce(&mut self, outcome: Outcome);
}

/// Requests a front end sends to [`GameClient::run`].
#[derive(Debug, Clone)]
pub enum UserCommand {
    /// Start a new game.
    NewGame(GameSetup),
    /// Cell picked by the user.
    Activate(Position),
    /// Reissue a failed call.
    Retry,
    /// Stop the event loop.
    Quit,
}

/// Messages sent from the client to a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Board changed.
    Board(BoardState),
    /// Status line changed.
    Status(String),
    /// Game ended.
    GameOver(Outcome),
}

/// [`Renderer`] that forwards boards over a channel.
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl ChannelRenderer {
    /// Creates a renderer sending on `tx`.
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl Renderer for ChannelRenderer {
    fn render(&mut self, board: &BoardState) {
        if self.tx.send(ClientEvent::Board(board.clone())).is_err() {
            debug!("Front end gone, board dropped");
        }
    }
}

/// [`StatusSink`] that forwards messages over a channel.
#[derive(Debug, Clone)]
pub struct ChannelStatusSink {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl ChannelStatusSink {
    /// Creates a sink sending on `tx`.
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelStatusSink {
    fn status(&mut self, message: &str) {
        if self.tx.send(ClientEvent::Status(message.to_string())).is_err() {
            debug!("Front end gone, status dropped");
        }
    }

    fn announce(&mut self, outcome: Outcome) {
        if self.tx.send(ClientEvent::GameOver(outcome)).is_err() {
            debug!("Front end gone, announcement dropped");
        }
    }
}

/// Owns the single live game and talks to the service for it.
pub struct GameClient<T, R, S> {
    machine: TurnMachine,
    transport: Arc<T>,
    renderer: R,
    status: S,
    request_timeout: Option<Duration>,
    queued: VecDeque<RemoteCall>,
}

impl<T, R, S> GameClient<T, R, S>
where
    T: Transport + 'static,
    R: Renderer,
    S: StatusSink,
{
    /// Creates an idle client without a request timeout.
    pub fn new(transport: T, renderer: R, status: S) -> Self {
        Self {
            machine: TurnMachine::new(),
            transport: Arc::new(transport),
            renderer,
            status,
            request_timeout: None,
            queued: VecDeque::new(),
        }
    }

    /// Bounds every remote call. `None` waits forever.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The turn machine.
    pub fn machine(&self) -> &TurnMachine {
        &self.machine
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The status sink.
    pub fn status_sink(&self) -> &S {
        &self.status
    }

    /// Feeds one input to the machine and applies its effects.
    ///
    /// Remote calls are queued, not sent; see [`Self::settle`] and
    /// [`Self::run`].
    pub fn submit(&mut self, input: TurnInput) {
        for effect in self.machine.handle(input) {
            match effect {
                Effect::Render(board) => self.renderer.render(&board),
                Effect::Status(message) => self.status.status(&message),
                Effect::Announce(outcome) => self.status.announce(outcome),
                Effect::Call(call) => self.queued.push_back(call),
            }
        }
    }

    /// Sends queued calls one at a time until the turn comes to rest.
    #[instrument(skip(self))]
    pub async fn settle(&mut self) {
        while let Some(call) = self.queued.pop_front() {
            let completion =
                perform(Arc::clone(&self.transport), call, self.request_timeout).await;
            self.submit(completion);
        }
    }

    /// Starts a game and runs any opening call to completion.
    pub async fn start_new_game(&mut self, setup: GameSetup) {
        self.submit(TurnInput::NewGame(setup));
        self.settle().await;
    }

    /// Plays the human's move and runs the resulting turn to completion.
    pub async fn activate_cell(&mut self, position: Position) {
        self.submit(TurnInput::CellActivated(position));
        self.settle().await;
    }

    /// Reissues a failed call and runs the turn to completion.
    pub async fn retry(&mut self) {
        self.submit(TurnInput::Retry);
        self.settle().await;
    }

    /// Runs until [`UserCommand::Quit`] or the command channel closes.
    ///
    /// Commands keep flowing while a call is in flight; the machine drops
    /// activations while busy and discards answers for abandoned games.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<UserCommand>) -> Self {
        info!("Starting game client loop");
        let mut in_flight = FuturesUnordered::new();

        loop {
            while let Some(call) = self.queued.pop_front() {
                in_flight.push(perform(
                    Arc::clone(&self.transport),
                    call,
                    self.request_timeout,
                ));
            }

            tokio::select! {
                Some(completion) = in_flight.next(), if !in_flight.is_empty() => {
                    self.submit(completion);
                }
                command = commands.recv() => match command {
                    Some(UserCommand::NewGame(setup)) => self.submit(TurnInput::NewGame(setup)),
                    Some(UserCommand::Activate(position)) => {
                        self.submit(TurnInput::CellActivated(position))
                    }
                    Some(UserCommand::Retry) => self.submit(TurnInput::Retry),
                    Some(UserCommand::Quit) | None => {
                        info!(in_flight = in_flight.len(), "Game client loop stopping");
                        break;
                    }
                },
            }
        }
        self
    }
}

/// Sends one call and wraps its answer as a machine input.
async fn perform<T>(
    transport: Arc<T>,
    call: RemoteCall,
    timeout: Option<Duration>,
) -> TurnInput
where
    T: Transport + ?Sized,
{
    let RemoteCall {
        generation,
        kind,
        snapshot,
    } = call;
    debug!(%kind, %generation, "Sending call");

    let outcome = match kind {
        CallKind::GameStatus => {
            CallOutcome::Status(bounded(timeout, transport.game_status(&snapshot)).await)
        }
        CallKind::NextMove => {
            CallOutcome::Move(bounded(timeout, transport.next_move(&snapshot)).await)
        }
    };
    TurnInput::Completed {
        generation,
        outcome,
    }
}

async fn bounded<F, V>(timeout: Option<Duration>, call: F) -> Result<V, TransportError>
where
    F: Future<Output = Result<V, TransportError>>,
{
    let Some(limit) = timeout else {
        return call.await;
    };
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(limit_ms = limit.as_millis() as u64, "Call timed out");
            Err(TransportError::new(TransportErrorKind::Timeout(limit)))
        }
    }
}
