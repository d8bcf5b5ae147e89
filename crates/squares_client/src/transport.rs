//! Seam between the turn machine and the remote game service.

use crate::wire::{GameStatusResult, MoveResult};
use derive_more::{Display, Error};
use squares_board::BoardSnapshot;
use std::time::Duration;
use tracing::instrument;

/// What went wrong talking to the service.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TransportErrorKind {
    /// The request never got an HTTP answer.
    #[display("connection failed: {_0}")]
    Connection(String),
    /// Non-success status outside the documented no-content case.
    #[display("service answered {code}: {detail}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Body text, or the `error` field when the body is JSON.
        detail: String,
    },
    /// Body did not parse into the expected shape.
    #[display("malformed response: {_0}")]
    Malformed(String),
    /// `gameStatus` answered with no content.
    #[display("service sent no game status")]
    EmptyStatus,
    /// No answer within the configured bound.
    #[display("no answer within {}ms", _0.as_millis())]
    Timeout(Duration),
}

/// Transport failure with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Transport error: {} at {}:{}", kind, file, line)]
pub struct TransportError {
    /// Failure kind.
    pub kind: TransportErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: TransportErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Checks if the service answered but the answer was unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Malformed(_) | TransportErrorKind::EmptyStatus
        )
    }

    /// Short text for the status line.
    pub fn user_message(&self) -> String {
        if self.is_malformed() {
            format!("Bad response from server: {}", self.kind)
        } else {
            format!("Network error: {}", self.kind)
        }
    }
}

/// The two remote operations the client depends on.
///
/// Implementations never mutate anything local; they only translate a
/// snapshot into the service's verdict.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Asks whether the game on `snapshot` is over.
    async fn game_status(&self, snapshot: &BoardSnapshot)
    -> Result<GameStatusResult, TransportError>;

    /// Asks the service for its move. `Ok(None)` means it declines to move.
    async fn next_move(&self, snapshot: &BoardSnapshot)
    -> Result<Option<MoveResult>, TransportError>;
}
