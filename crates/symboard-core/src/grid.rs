//! The [`GridModel`] type: a rectangular, row-major matrix of [`Tile`]s.

use crate::error::LayoutError;
use crate::tile::{Tile, TileId};

/// Rows and columns assumed when there is no grid to divide the container by.
pub const FALLBACK_DIMENSION: usize = 2;

/// A rectangular matrix of tiles.
///
/// The grid is rebuilt wholesale whenever the board or its buttons change;
/// a fresh grid carries no geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridModel {
    tiles: Vec<Tile>,
    rows: usize,
    cols: usize,
}

impl GridModel {
    /// Build a grid from rows of tiles.
    ///
    /// Every row must have the same length as the first one. Each tile's
    /// `row`/`col` are set from its position and any previous geometry is
    /// discarded.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, LayoutError> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut tiles = Vec::with_capacity(row_count * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(LayoutError::RaggedGrid {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, mut tile) in row.into_iter().enumerate() {
                tile.row = i;
                tile.col = j;
                tile.geometry = None;
                tiles.push(tile);
            }
        }
        Ok(Self {
            tiles,
            rows: row_count,
            cols,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the grid has no tiles at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Rows and columns to lay out against, falling back to
    /// [`FALLBACK_DIMENSION`] for a missing grid.
    pub fn layout_dimensions(&self) -> (usize, usize) {
        let rows = if self.rows == 0 {
            FALLBACK_DIMENSION
        } else {
            self.rows
        };
        let cols = if self.cols == 0 {
            FALLBACK_DIMENSION
        } else {
            self.cols
        };
        (rows, cols)
    }

    /// The tile at `(row, col)`, if in bounds.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> Option<&Tile> {
        if row < self.rows && col < self.cols {
            self.tiles.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Mutable access to the tile at `(row, col)`.
    #[inline]
    pub fn at_mut(&mut self, row: usize, col: usize) -> Option<&mut Tile> {
        if row < self.rows && col < self.cols {
            self.tiles.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Occupancy of a possibly out-of-range cell: `None` beyond the grid
    /// edge, otherwise whether the cell is empty or hidden.
    pub fn open_at(&self, row: isize, col: isize) -> Option<bool> {
        if row < 0 || col < 0 {
            return None;
        }
        self.at(row as usize, col as usize)
            .map(Tile::is_empty_or_hidden)
    }

    /// Find a tile by id.
    pub fn find(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| &t.id == id)
    }

    /// Find a tile by id, mutably.
    pub fn find_mut(&mut self, id: &TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| &t.id == id)
    }

    /// Row-major iterator over the tiles.
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Row-major mutable iterator over the tiles.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tile> {
        self.tiles.iter_mut()
    }

    /// The first visible tile whose geometry contains the logical point.
    pub fn tile_at_point(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tiles.iter().find(|t| {
            t.is_visible() && t.geometry.is_some_and(|g| g.contains(x, y))
        })
    }
}

impl<'a> IntoIterator for &'a GridModel {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Geometry;

    fn row(ids: &[&str]) -> Vec<Tile> {
        ids.iter().map(|id| Tile::new(*id, *id)).collect()
    }

    #[test]
    fn from_rows_assigns_positions() {
        let g = GridModel::from_rows(vec![row(&["a", "b"]), row(&["c", "d"])]).unwrap();
        assert_eq!((g.rows(), g.cols()), (2, 2));
        let d = g.at(1, 1).unwrap();
        assert_eq!(d.id.as_str(), "d");
        assert_eq!((d.row, d.col), (1, 1));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = GridModel::from_rows(vec![row(&["a", "b"]), row(&["c"])]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rebuilding_discards_geometry() {
        let mut t = Tile::new("a", "a");
        t.geometry = Some(Geometry::default());
        let g = GridModel::from_rows(vec![vec![t]]).unwrap();
        assert!(g.at(0, 0).unwrap().geometry.is_none());
    }

    #[test]
    fn open_at_distinguishes_edge_from_occupied() {
        let mut r = row(&["a", "b"]);
        r[1].empty = true;
        let g = GridModel::from_rows(vec![r]).unwrap();
        assert_eq!(g.open_at(0, 0), Some(false));
        assert_eq!(g.open_at(0, 1), Some(true));
        assert_eq!(g.open_at(-1, 0), None);
        assert_eq!(g.open_at(0, 2), None);
    }

    #[test]
    fn missing_grid_falls_back_to_two_by_two() {
        let g = GridModel::default();
        assert!(g.is_empty());
        assert_eq!(g.layout_dimensions(), (2, 2));
    }

    #[test]
    fn find_by_id() {
        let mut g = GridModel::from_rows(vec![row(&["a", "b"])]).unwrap();
        g.find_mut(&TileId::from("b")).unwrap().hover = true;
        assert!(g.find(&"b".into()).unwrap().hover);
        assert!(g.find(&"z".into()).is_none());
    }
}
