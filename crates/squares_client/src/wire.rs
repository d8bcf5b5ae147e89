//! Response bodies of the remote game service and their domain forms.

use crate::transport::{TransportError, TransportErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use squares_board::{Color, Position};
use tracing::instrument;

/// Wire code for a game that is still running.
pub const STATUS_ONGOING: i64 = 0;
/// Wire code for a won game; `color` names the winner.
pub const STATUS_WIN: i64 = 1;
/// Wire code for a drawn game.
pub const STATUS_DRAW: i64 = 2;

/// How the game stands after the latest move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Play continues.
    Ongoing,
    /// The given color has won.
    Win(Color),
    /// No more moves can change the result.
    Draw,
}

impl Outcome {
    /// Checks if the outcome ends the game.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "In progress"),
            Outcome::Win(color) => write!(f, "Winner: {}", color),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Parsed answer to a `gameStatus` call.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameStatusResult {
    /// Game outcome.
    outcome: Outcome,
    /// Advisory text from the service; may be empty.
    message: String,
}

impl GameStatusResult {
    /// Creates a status result.
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
        }
    }
}

/// Parsed answer to a `nextMove` call that carried a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct MoveResult {
    /// Cell the opponent claims.
    position: Position,
    /// Color the service placed.
    color: Color,
}

impl MoveResult {
    /// Creates a move result.
    pub fn new(position: Position, color: Color) -> Self {
        Self { position, color }
    }
}

/// `gameStatus` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatusResponse {
    /// `0` ongoing, `1` win, `2` draw.
    pub status: i64,
    /// Winner, present iff `status == 1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Free-text diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TryFrom<GameStatusResponse> for GameStatusResult {
    type Error = TransportError;

    #[instrument]
    fn try_from(response: GameStatusResponse) -> Result<Self, Self::Error> {
        let outcome = match (response.status, response.color) {
            (STATUS_ONGOING, _) => Outcome::Ongoing,
            (STATUS_WIN, Some(color)) => Outcome::Win(color),
            (STATUS_WIN, None) => {
                return Err(TransportError::new(TransportErrorKind::Malformed(
                    "win status without a color".to_string(),
                )));
            }
            (STATUS_DRAW, _) => Outcome::Draw,
            (other, _) => {
                let detail = response.message.unwrap_or_default();
                return Err(TransportError::new(TransportErrorKind::Malformed(format!(
                    "unknown status code {} ({})",
                    other, detail
                ))));
            }
        };
        Ok(GameStatusResult::new(
            outcome,
            response.message.unwrap_or_default(),
        ))
    }
}

/// `nextMove` response body. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Color placed.
    pub color: Color,
}

impl From<MoveResponse> for MoveResult {
    fn from(response: MoveResponse) -> Self {
        MoveResult::new(Position::new(response.y, response.x), response.color)
    }
}

/// Error body the service sends with a failure status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}
