//! Configuration errors raised while building or laying out a board.

use std::fmt;

use crate::tile::TileId;

/// Error type for grid construction and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A row of the grid has a different length than the first row.
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// No tile with this id exists in the grid.
    UnknownTile(TileId),
    /// A colour string could not be parsed.
    InvalidColor(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedGrid {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid is not rectangular: row {row} has {found} tiles, expected {expected}"
            ),
            Self::UnknownTile(id) => write!(f, "no tile with id {id}"),
            Self::InvalidColor(s) => write!(f, "invalid colour {s:?}"),
        }
    }
}

impl std::error::Error for LayoutError {}
