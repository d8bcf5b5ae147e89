//! Core domain types for the squares board.

use derive_new::new;
use serde::{Deserialize, Serialize};

/// Stone color.
///
/// On the wire a color is a single lower-case letter; upper-case is accepted
/// when reading.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Color {
    /// Black stones (`'b'`).
    #[serde(rename = "b", alias = "B")]
    Black,
    /// White stones (`'w'`).
    #[serde(rename = "w", alias = "W")]
    White,
}

impl Color {
    /// Returns the other color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Wire character for this color.
    pub fn to_char(self) -> char {
        match self {
            Color::Black => 'b',
            Color::White => 'w',
        }
    }

    /// Parses a wire character, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Color::Black),
            'w' => Some(Color::White),
            _ => None,
        }
    }

    /// Glyph used when drawing a stone of this color.
    pub fn symbol(self) -> char {
        match self {
            Color::Black => '●',
            Color::White => '○',
        }
    }
}

/// A single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// A stone of the given color.
    Occupied(Color),
}

impl Cell {
    /// Checks if the cell holds no stone.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Stone color, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(color) => Some(color),
        }
    }

    /// Wire character: `' '`, `'b'` or `'w'`.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Occupied(color) => color.to_char(),
        }
    }

    /// Parses a wire character.
    ///
    /// `'.'` and NUL are read as empty, matching what the service accepts.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' | '.' | '\0' => Some(Cell::Empty),
            other => Color::from_char(other).map(Cell::Occupied),
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        Cell::Occupied(color)
    }
}

/// Zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new, Serialize, Deserialize)]
pub struct Position {
    /// Row index, counted from the top.
    pub row: usize,
    /// Column index, counted from the left.
    pub col: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
