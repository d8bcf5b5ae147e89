//! Board model for the squares game client.
//!
//! The board is plain data: an N×N grid of cells holding nothing, a black
//! stone, or a white stone. Rules live on the remote service; this crate only
//! enforces that a stone lands on an empty in-range cell and knows how to
//! flatten the grid into the wire snapshot the service expects.
//!
//! # Example
//!
//! ```
//! use squares_board::{BoardState, Color, Position};
//!
//! # fn main() -> Result<(), squares_board::BoardError> {
//! let mut board = BoardState::new(3)?;
//! board.place(Position::new(0, 0), Color::White)?;
//!
//! let snapshot = board.snapshot(Color::Black);
//! assert_eq!(snapshot.data(), "w        ");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod snapshot;
mod types;

pub use board::{BoardError, BoardState, MAX_BOARD_SIZE};
pub use snapshot::{BoardSnapshot, SnapshotError};
pub use types::{Cell, Color, Position};
