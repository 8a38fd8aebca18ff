//! Board data as delivered by the board collaborator, and its conversion
//! into a [`GridModel`].
//!
//! A board lists its buttons once and places them with an `order` matrix of
//! button ids; cells without an id (or with an id that matches no button)
//! become empty tiles.

use std::collections::HashMap;

use crate::color::Color;
use crate::error::LayoutError;
use crate::grid::GridModel;
use crate::tile::{DARKEN, Tile, TileColors, TileId};

/// A button id as it appears in board JSON: a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ButtonRef {
    Num(u64),
    Str(String),
}

impl From<&ButtonRef> for TileId {
    fn from(r: &ButtonRef) -> Self {
        match r {
            ButtonRef::Num(n) => TileId(n.to_string()),
            ButtonRef::Str(s) => TileId(s.clone()),
        }
    }
}

/// Declared grid shape plus the placement matrix.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardGrid {
    pub rows: usize,
    pub columns: usize,
    pub order: Vec<Vec<Option<ButtonRef>>>,
}

/// One button of a board.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonData {
    pub id: ButtonRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vocalization: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub border_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub background_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dark_border_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dark_background_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action_image: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub talk_action: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: bool,
}

impl ButtonData {
    pub fn new(id: ButtonRef, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            vocalization: None,
            border_color: None,
            background_color: None,
            dark_border_color: None,
            dark_background_color: None,
            text_color: None,
            image_url: None,
            action_image: None,
            talk_action: false,
            hidden: false,
        }
    }

    /// Parse the button's colours, deriving dark variants when absent.
    ///
    /// A colour that does not parse is logged and replaced by the value the
    /// field would have had without it; it never fails the board.
    pub fn colors(&self) -> TileColors {
        let defaults = TileColors::default();
        let parse = |field: &str, s: &Option<String>, fallback: Color| match s.as_deref() {
            Some(s) if !s.trim().is_empty() => Color::parse_css(s).unwrap_or_else(|err| {
                log::warn!("button {}: {field}: {err}; using {fallback}", TileId::from(&self.id));
                fallback
            }),
            _ => fallback,
        };
        let border = parse("border_color", &self.border_color, defaults.border);
        let background = parse("background_color", &self.background_color, defaults.background);
        TileColors {
            border,
            background,
            dark_border: parse("dark_border_color", &self.dark_border_color, border.darken(DARKEN)),
            dark_background: parse(
                "dark_background_color",
                &self.dark_background_color,
                background.darken(DARKEN),
            ),
            text: parse("text_color", &self.text_color, defaults.text),
        }
    }

    fn to_tile(&self) -> Tile {
        Tile {
            id: TileId::from(&self.id),
            label: self.label.clone(),
            vocalization: self.vocalization.clone(),
            colors: self.colors(),
            image_url: self.image_url.clone(),
            action_image_url: self.action_image.clone(),
            talk_action: self.talk_action,
            hidden: self.hidden,
            ..Default::default()
        }
    }
}

/// A board: buttons plus their placement.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub grid: BoardGrid,
    pub buttons: Vec<ButtonData>,
}

impl GridModel {
    /// Build the tile matrix for a board.
    pub fn from_board(board: &BoardData) -> Result<Self, LayoutError> {
        let buttons: HashMap<TileId, &ButtonData> = board
            .buttons
            .iter()
            .map(|b| (TileId::from(&b.id), b))
            .collect();

        let mut rows = Vec::with_capacity(board.grid.order.len());
        for (i, order_row) in board.grid.order.iter().enumerate() {
            let mut row = Vec::with_capacity(order_row.len());
            for (j, cell) in order_row.iter().enumerate() {
                let button = cell
                    .as_ref()
                    .and_then(|r| buttons.get(&TileId::from(r)).copied());
                let tile = match button {
                    Some(b) => b.to_tile(),
                    None => Tile::empty_cell(i, j),
                };
                row.push(tile);
            }
            rows.push(row);
        }

        let grid = Self::from_rows(rows)?;
        if grid.rows() != board.grid.rows || grid.cols() != board.grid.columns {
            log::warn!(
                "board declares {}x{} but its order is {}x{}; using the order",
                board.grid.rows,
                board.grid.columns,
                grid.rows(),
                grid.cols()
            );
        }
        Ok(grid)
    }
}
