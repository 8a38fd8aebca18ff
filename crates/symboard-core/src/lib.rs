//! **symboard-core**: layout types for communication boards.
//!
//! This crate holds the pure half of board rendering: tiles and the grid
//! they live in, preference resolution, the container derived from the
//! viewport, and the stretch resolver that turns all of it into per-tile
//! [`Geometry`]. Nothing here performs I/O or touches a surface.

pub mod board;
pub mod chrome;
pub mod color;
pub mod error;
pub mod geom;
pub mod grid;
pub mod prefs;
pub mod stretch;
pub mod tile;

pub use board::{BoardData, BoardGrid, ButtonData, ButtonRef};
pub use chrome::{Chrome, Modes};
pub use color::Color;
pub use error::LayoutError;
pub use geom::{Geometry, Size};
pub use grid::GridModel;
pub use prefs::{LayoutPreferences, RawPreferences, StretchMode, TextPosition, TextSize};
pub use stretch::{StretchResolver, TextDensity};
pub use tile::{Tile, TileColors, TileId};
