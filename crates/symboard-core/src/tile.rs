//! The [`Tile`] type: one selectable cell of a board.

use std::fmt;

use crate::color::Color;
use crate::geom::Geometry;

/// Stable identifier of a tile (the board's button id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(pub String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Colours used to paint a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileColors {
    pub border: Color,
    pub background: Color,
    /// Border while touched or hovered.
    pub dark_border: Color,
    /// Background while touched or hovered.
    pub dark_background: Color,
    pub text: Color,
}

impl Default for TileColors {
    fn default() -> Self {
        let border = Color::from_rgb(0xCC, 0xCC, 0xCC);
        let background = Color::WHITE;
        Self {
            border,
            background,
            dark_border: border.darken(DARKEN),
            dark_background: background.darken(DARKEN),
            text: Color::BLACK,
        }
    }
}

/// How much the dark variants are derived from the base colours when the
/// board does not supply them.
pub const DARKEN: f32 = 0.3;

/// A single board tile.
///
/// Everything except [`geometry`](Tile::geometry) is supplied by the board
/// data or the interaction layer; layout only ever writes `geometry`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Tile {
    pub id: TileId,
    pub row: usize,
    pub col: usize,
    pub label: String,
    pub vocalization: Option<String>,
    pub colors: TileColors,
    pub image_url: Option<String>,
    pub action_image_url: Option<String>,
    /// The tile's action is "speak"; its action icon is not painted.
    pub talk_action: bool,
    pub empty: bool,
    pub hidden: bool,
    pub touched: bool,
    pub hover: bool,
    pub geometry: Option<Geometry>,
}

impl Tile {
    /// A visible tile with a label.
    pub fn new(id: impl Into<TileId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// A placeholder for a grid cell without a button.
    pub fn empty_cell(row: usize, col: usize) -> Self {
        Self {
            id: TileId(format!("empty_{row}_{col}")),
            row,
            col,
            empty: true,
            ..Default::default()
        }
    }

    /// Neighbours that are empty or hidden may be claimed by stretching.
    #[inline]
    pub fn is_empty_or_hidden(&self) -> bool {
        self.empty || self.hidden
    }

    /// Whether the tile gets painted at all.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.is_empty_or_hidden()
    }

    /// Touched or hovered tiles paint with the dark colour variants.
    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.touched || self.hover
    }

    /// Set the symbol image (builder).
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the action icon (builder).
    pub fn with_action_image(mut self, url: impl Into<String>) -> Self {
        self.action_image_url = Some(url.into());
        self
    }

    /// Set the colours (builder).
    pub fn with_colors(mut self, colors: TileColors) -> Self {
        self.colors = colors;
        self
    }

    /// Mark as hidden (builder).
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl From<String> for TileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_hidden() {
        let t = Tile::new("a", "apple");
        assert!(t.is_visible());
        assert!(t.clone().with_hidden(true).is_empty_or_hidden());
        assert!(Tile::empty_cell(0, 1).is_empty_or_hidden());
    }

    #[test]
    fn default_colors_have_darker_variants() {
        let c = TileColors::default();
        assert_eq!(c.background, Color::WHITE);
        assert!(c.dark_background.r() < c.background.r());
        assert!(c.dark_border.r() < c.border.r());
    }
}
