//! The authoritative in-memory grid.

use crate::snapshot::BoardSnapshot;
use crate::types::{Cell, Color, Position};
use derive_more::{Display, Error};
use tracing::{debug, instrument, warn};

/// Largest side length a board may have.
pub const MAX_BOARD_SIZE: usize = 19;

/// Rejected board operation. The board is left untouched when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Board size below one or above [`MAX_BOARD_SIZE`].
    #[display("Board size must be between 1 and {}, got {size}", MAX_BOARD_SIZE)]
    InvalidSize {
        /// Requested size.
        size: usize,
    },
    /// Coordinate outside `[0, size)`.
    #[display("Position {position} is outside a {size}x{size} board")]
    OutOfBounds {
        /// Offending coordinate.
        position: Position,
        /// Current board size.
        size: usize,
    },
    /// Target cell already holds a stone.
    #[display("Position {position} is already occupied by {occupant}")]
    CellOccupied {
        /// Offending coordinate.
        position: Position,
        /// Stone already on the cell.
        occupant: Color,
    },
}

/// Number of cells on a board of `size`, or `None` when the size is not allowed.
pub(crate) fn cell_count(size: usize) -> Option<usize> {
    if size == 0 || size > MAX_BOARD_SIZE {
        return None;
    }
    size.checked_mul(size)
}

/// Square grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    size: usize,
    cells: Vec<Cell>,
}

impl BoardState {
    /// Creates an all-empty board of `1..=MAX_BOARD_SIZE` cells per side.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, BoardError> {
        let Some(len) = cell_count(size) else {
            warn!(size, "Rejected board size");
            return Err(BoardError::InvalidSize { size });
        };
        Ok(Self {
            size,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Builds a board from row-major cells. Callers guarantee the length.
    pub(crate) fn from_cells(size: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Discards every stone and re-allocates the grid at `size`.
    ///
    /// On error the board keeps its previous contents.
    #[instrument(skip(self), fields(old_size = self.size))]
    pub fn reset(&mut self, size: usize) -> Result<(), BoardError> {
        *self = Self::new(size)?;
        debug!("Board reset");
        Ok(())
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks if the position lies on the board.
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.size && position.col < self.size
    }

    /// Occupancy at `position`, or `None` when out of range.
    pub fn get(&self, position: Position) -> Option<Cell> {
        self.index(position).map(|i| self.cells[i])
    }

    /// Puts a stone of `color` on an empty in-range cell.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn place(&mut self, position: Position, color: Color) -> Result<(), BoardError> {
        let index = self.index(position).ok_or(BoardError::OutOfBounds {
            position,
            size: self.size,
        })?;
        if let Cell::Occupied(occupant) = self.cells[index] {
            return Err(BoardError::CellOccupied { position, occupant });
        }
        self.cells[index] = Cell::Occupied(color);
        debug!(%position, %color, "Stone placed");
        Ok(())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Number of cells without a stone.
    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Checks if every cell holds a stone.
    pub fn is_full(&self) -> bool {
        self.empty_cells() == 0
    }

    /// Serializes the board for the service, tagged with who moves next.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn snapshot(&self, next_player: Color) -> BoardSnapshot {
        let data: String = self.cells.iter().map(|c| c.to_char()).collect();
        BoardSnapshot::new(self.size, data, next_player)
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row * self.size + position.col)
    }
}
