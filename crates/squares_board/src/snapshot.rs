//! Flattened wire form of the board.

use crate::board::{BoardState, MAX_BOARD_SIZE, cell_count};
use crate::types::{Cell, Color};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Snapshot could not be turned back into a board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SnapshotError {
    /// Size below one or above [`MAX_BOARD_SIZE`].
    #[display("Snapshot size must be between 1 and {}, got {size}", MAX_BOARD_SIZE)]
    InvalidSize {
        /// Declared size.
        size: usize,
    },
    /// `data` does not hold `size * size` cells.
    #[display("Snapshot data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// `size * size`.
        expected: usize,
        /// Cells found after stripping line breaks.
        actual: usize,
    },
    /// A character outside the cell alphabet.
    #[display("Unknown cell character {found:?} at index {index}")]
    InvalidCell {
        /// Row-major index of the cell.
        index: usize,
        /// The offending character.
        found: char,
    },
}

/// Request body for both service operations.
///
/// `data` holds `size * size` characters, row-major, over `' '`, `'b'` and
/// `'w'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    size: usize,
    data: String,
    next_player_color: Color,
}

impl BoardSnapshot {
    /// Creates a snapshot from its wire parts.
    pub fn new(size: usize, data: String, next_player_color: Color) -> Self {
        Self {
            size,
            data,
            next_player_color,
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Flattened cells.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Color that moves next if the game continues.
    pub fn next_player_color(&self) -> Color {
        self.next_player_color
    }

    /// Rebuilds the board this snapshot describes.
    ///
    /// Line breaks inside `data` are skipped, as the service does.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn decode(&self) -> Result<BoardState, SnapshotError> {
        let Some(expected) = cell_count(self.size) else {
            warn!(size = self.size, "Snapshot size out of range");
            return Err(SnapshotError::InvalidSize { size: self.size });
        };
        let cells = self
            .data
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .enumerate()
            .map(|(index, found)| {
                Cell::from_char(found).ok_or(SnapshotError::InvalidCell { index, found })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cells.len() != expected {
            warn!(expected, actual = cells.len(), "Snapshot length mismatch");
            return Err(SnapshotError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(BoardState::from_cells(self.size, cells))
    }
}
