//! Tile geometry: the base grid box plus stretching into open neighbours.
//!
//! Every tile starts from its cell of the evenly divided container. When
//! stretching is enabled each axis may then grow into empty or hidden
//! neighbours. Growth on each side is computed from the same base box and
//! the results are combined, so an isolated tile surrounded by open cells
//! fills the space around it while tiles in dense rows stay at base size.

use crate::geom::{Geometry, Size};
use crate::grid::GridModel;
use crate::prefs::{LayoutPreferences, StretchMode, TextPosition};

/// Fixed padding of the image box inside a tile.
pub const BOX_PAD: f64 = 17.0;
/// Height of the label band the image area is measured against.
pub const LABEL_BAND: f64 = 15.0;
/// Tiles shorter or narrower than this reclaim their padding for the image.
pub const CRAMPED_EDGE: f64 = 50.0;

/// Label sizing bucket chosen from the height of a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextDensity {
    #[default]
    Normal,
    Small,
    ReallySmall,
}

impl TextDensity {
    /// Bucket for a cell of height `cell_height`.
    pub fn for_cell_height(cell_height: f64) -> Self {
        if cell_height < 35.0 {
            Self::ReallySmall
        } else if cell_height < 75.0 {
            Self::Small
        } else {
            Self::Normal
        }
    }
}

// ---------------------------------------------------------------------------
// Neighbourhood
// ---------------------------------------------------------------------------

/// Occupancy of the eight cells around a tile.
///
/// `None` means the cell lies beyond the grid edge, `Some(open)` whether an
/// in-grid cell is empty or hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Neighbors {
    up: Option<bool>,
    up_left: Option<bool>,
    up_right: Option<bool>,
    down: Option<bool>,
    down_left: Option<bool>,
    down_right: Option<bool>,
    left: Option<bool>,
    right: Option<bool>,
}

impl Neighbors {
    fn of(grid: &GridModel, row: isize, col: isize) -> Self {
        Self {
            up: grid.open_at(row - 1, col),
            up_left: grid.open_at(row - 1, col - 1),
            up_right: grid.open_at(row - 1, col + 1),
            down: grid.open_at(row + 1, col),
            down_left: grid.open_at(row + 1, col - 1),
            down_right: grid.open_at(row + 1, col + 1),
            left: grid.open_at(row, col - 1),
            right: grid.open_at(row, col + 1),
        }
    }
}

/// An in-grid cell that can be claimed.
#[inline]
fn open(cell: Option<bool>) -> bool {
    cell == Some(true)
}

/// Not known to be occupied: open, or past the grid edge.
#[inline]
fn unblocked(cell: Option<bool>) -> bool {
    cell != Some(false)
}

/// One side of an axis, seen from the tile.
struct Side {
    ahead: Option<bool>,
    flank_a: Option<bool>,
    flank_b: Option<bool>,
    /// The cell two steps ahead.
    beyond: Option<bool>,
}

/// Growth of one side of an axis, measured from the base extent.
///
/// `preferred` is true when the mode favours this axis; it lifts the need
/// for both diagonals to be open. `overlap` is subtracted from the first
/// claim when the opposite side already grew.
fn side_growth(side: &Side, base: f64, cell: f64, padding: f64, preferred: bool, overlap: f64) -> Option<f64> {
    if !open(side.ahead) || !(preferred || (open(side.flank_a) && open(side.flank_b))) {
        return None;
    }
    let mut growth = padding + base / 2.0 - overlap;
    if unblocked(side.beyond) && preferred && !open(side.flank_a) && !open(side.flank_b) {
        growth += padding + (base + growth) / 2.0 - cell / 4.0;
    }
    Some(growth)
}

/// Leading/trailing growth of one axis.
fn axis_growth(lead: &Side, trail: &Side, base: f64, cell: f64, padding: f64, preferred: bool) -> (f64, f64) {
    let leading = side_growth(lead, base, cell, padding, preferred, 0.0);
    let overlap = if leading.is_some() { cell / 4.0 } else { 0.0 };
    let trailing = side_growth(trail, base, cell, padding, preferred, overlap);
    (leading.unwrap_or(0.0), trailing.unwrap_or(0.0))
}

// ---------------------------------------------------------------------------
// StretchResolver
// ---------------------------------------------------------------------------

/// Computes [`Geometry`] for every tile of a grid.
#[derive(Copy, Clone, Debug)]
pub struct StretchResolver<'a> {
    prefs: &'a LayoutPreferences,
    container: Size,
    stretch: StretchMode,
}

impl<'a> StretchResolver<'a> {
    /// A resolver for the given preferences and container. Stretching uses
    /// the preference's mode.
    pub fn new(prefs: &'a LayoutPreferences, container: Size) -> Self {
        Self {
            prefs,
            container,
            stretch: prefs.stretch,
        }
    }

    /// Disable stretching regardless of the preference (edit mode).
    pub fn with_stretch_allowed(mut self, allowed: bool) -> Self {
        if !allowed {
            self.stretch = StretchMode::None;
        }
        self
    }

    /// Size of one grid cell, truncated to hundredths of a pixel.
    pub fn cell_size(&self, grid: &GridModel) -> Size {
        let (rows, cols) = grid.layout_dimensions();
        Size::new(
            truncate_hundredths(self.container.width / cols as f64),
            truncate_hundredths(self.container.height / rows as f64),
        )
    }

    /// Geometry of the tile at `(row, col)`.
    pub fn geometry_at(&self, grid: &GridModel, row: usize, col: usize) -> Geometry {
        let cell = self.cell_size(grid);
        let pad = self.prefs.padding;
        let inner = self.prefs.inner_pad;

        let base_height = cell.height - 2.0 * pad;
        let base_width = cell.width - 2.0 * pad;
        let mut top = pad + row as f64 * cell.height + inner;
        let mut left = pad + col as f64 * cell.width + inner;
        let mut height = base_height;
        let mut width = base_width;

        if self.stretch.is_enabled() {
            let (r, c) = (row as isize, col as isize);
            let n = Neighbors::of(grid, r, c);
            let tall = self.stretch == StretchMode::PreferTall;
            let wide = self.stretch == StretchMode::PreferWide;

            let up = Side {
                ahead: n.up,
                flank_a: n.up_left,
                flank_b: n.up_right,
                beyond: grid.open_at(r - 2, c),
            };
            let down = Side {
                ahead: n.down,
                flank_a: n.down_left,
                flank_b: n.down_right,
                beyond: grid.open_at(r + 2, c),
            };
            let (grow_up, grow_down) = axis_growth(&up, &down, base_height, cell.height, pad, tall);
            top -= grow_up;
            height += grow_up + grow_down;

            let leftward = Side {
                ahead: n.left,
                flank_a: n.up_left,
                flank_b: n.down_left,
                beyond: grid.open_at(r, c - 2),
            };
            let rightward = Side {
                ahead: n.right,
                flank_a: n.up_right,
                flank_b: n.down_right,
                beyond: grid.open_at(r, c + 2),
            };
            let (grow_left, grow_right) =
                axis_growth(&leftward, &rightward, base_width, cell.width, pad, wide);
            left -= grow_left;
            width += grow_left + grow_right;
        }

        self.finish(top, left, width, height, cell.height)
    }

    /// Derive the image and label sub-regions of a finished box.
    fn finish(&self, top: f64, left: f64, width: f64, height: f64, cell_height: f64) -> Geometry {
        let pad = self.prefs.padding;
        let inner = self.prefs.inner_pad;
        let label = self.prefs.label_height();

        let mut image_height = height - label - BOX_PAD - 2.0 * inner + 8.0;
        let mut image_width = width - BOX_PAD - 2.0 * inner + 8.0;
        let mut top_margin = label + LABEL_BAND - 8.0;

        if label > 0.0 {
            match TextDensity::for_cell_height(cell_height) {
                TextDensity::ReallySmall => {
                    image_height += label - LABEL_BAND + 25.0;
                    top_margin = 0.0;
                }
                TextDensity::Small => {
                    image_height += label - LABEL_BAND + 10.0;
                    top_margin -= 10.0;
                }
                TextDensity::Normal => {}
            }
        }
        if height < CRAMPED_EDGE {
            image_height += 2.0 * inner;
        }
        if width < CRAMPED_EDGE {
            image_width += 2.0 * inner + 2.0 * pad;
        }
        if label == 0.0 || self.prefs.text_position != TextPosition::Top {
            top_margin = 0.0;
        }

        Geometry {
            top,
            left,
            width,
            height,
            image_width,
            image_height,
            image_square_size: image_height.min(image_width),
            image_top_margin: top_margin,
            border_width: inner,
        }
    }

    /// Write fresh geometry into every tile of `grid`, row-major.
    pub fn resolve(&self, grid: &mut GridModel) {
        let geometries: Vec<Geometry> = grid
            .iter()
            .map(|t| self.geometry_at(grid, t.row, t.col))
            .collect();
        for (tile, geometry) in grid.iter_mut().zip(geometries) {
            tile.geometry = Some(geometry);
        }
        log::debug!(
            "resolved geometry for {}x{} grid (padding {}, inner {}, stretch {:?})",
            grid.rows(),
            grid.cols(),
            self.prefs.padding,
            self.prefs.inner_pad,
            self.stretch
        );
    }
}

#[inline]
fn truncate_hundredths(v: f64) -> f64 {
    (v * 100.0).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{RawPreferences, TextSize};
    use crate::tile::Tile;

    fn prefs(spacing: &str, border: &str, stretch: Option<&str>) -> LayoutPreferences {
        LayoutPreferences::resolve(
            &RawPreferences {
                button_spacing: Some(spacing.into()),
                button_border: Some(border.into()),
                stretch_buttons: stretch.map(Into::into),
                ..Default::default()
            },
            1024.0,
        )
    }

    /// Grid where `#` is a visible tile and `.` an empty cell.
    fn grid(rows: &[&str]) -> GridModel {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, line)| {
                line.chars()
                    .enumerate()
                    .map(|(j, ch)| {
                        if ch == '#' {
                            Tile::new(format!("{i}_{j}"), "t")
                        } else {
                            Tile::empty_cell(i, j)
                        }
                    })
                    .collect()
            })
            .collect();
        GridModel::from_rows(rows).unwrap()
    }

    #[test]
    fn two_by_two_without_stretch() {
        let p = prefs("medium", "medium", None);
        let g = grid(&["##", "##"]);
        let r = StretchResolver::new(&p, Size::new(800.0, 600.0));
        assert_eq!(r.cell_size(&g), Size::new(400.0, 300.0));
        let geo = r.geometry_at(&g, 0, 0);
        assert_eq!(geo.width, 380.0);
        assert_eq!(geo.height, 280.0);
        assert_eq!(geo.top, 12.0);
        assert_eq!(geo.left, 12.0);
        assert_eq!(geo.border_width, 2.0);
    }

    #[test]
    fn unstretched_tiles_never_overlap() {
        let p = prefs("large", "", None);
        let mut g = grid(&["###", "###", "###", "###"]);
        let container = Size::new(1003.0, 771.0);
        StretchResolver::new(&p, container).resolve(&mut g);
        let cell_w = (container.width / 3.0 * 100.0).floor() / 100.0;
        let cell_h = (container.height / 4.0 * 100.0).floor() / 100.0;
        let boxes: Vec<Geometry> = g.iter().map(|t| t.geometry.unwrap()).collect();
        for b in &boxes {
            assert!((b.width - (cell_w - 2.0 * p.padding)).abs() < 1e-9);
            assert!((b.height - (cell_h - 2.0 * p.padding)).abs() < 1e-9);
        }
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn stretch_ignores_occupied_neighbors() {
        let p = prefs("medium", "", Some("prefer_tall"));
        let g = grid(&["###", "###", "###"]);
        let r = StretchResolver::new(&p, Size::new(900.0, 900.0));
        let p_plain = prefs("medium", "", None);
        let plain = StretchResolver::new(&p_plain, Size::new(900.0, 900.0));
        assert_eq!(r.geometry_at(&g, 1, 1), plain.geometry_at(&g, 1, 1));
    }

    #[test]
    fn lone_tile_grows_on_every_open_side() {
        let p = prefs("medium", "", Some("on"));
        let g = grid(&["...", ".#.", "..."]);
        let container = Size::new(900.0, 600.0);
        let stretched = StretchResolver::new(&p, container).geometry_at(&g, 1, 1);
        let base = StretchResolver::new(&p, container)
            .with_stretch_allowed(false)
            .geometry_at(&g, 1, 1);
        assert!(stretched.top < base.top);
        assert!(stretched.left < base.left);
        assert!(stretched.bottom() > base.bottom());
        assert!(stretched.right() > base.right());
    }

    #[test]
    fn prefer_tall_grows_upward_by_at_least_half_height() {
        let p = prefs("medium", "", Some("prefer_tall"));
        let g = grid(&["...", ".#.", "..."]);
        let r = StretchResolver::new(&p, Size::new(900.0, 600.0));
        let cell = r.cell_size(&g);
        let base_height = cell.height - 2.0 * p.padding;
        let geo = r.geometry_at(&g, 1, 1);
        let base_top = p.padding + cell.height + p.inner_pad;
        let upward = base_top - geo.top;
        assert!(upward >= p.padding + base_height / 2.0);
        assert!(geo.height - base_height >= p.padding + base_height / 2.0);
    }

    #[test]
    fn even_stretch_needs_diagonal_support() {
        // Up is open but the up-left diagonal is occupied.
        let p = prefs("medium", "", Some("on"));
        let g = grid(&["#..", ".#.", "###"]);
        let r = StretchResolver::new(&p, Size::new(900.0, 900.0));
        let base = r.with_stretch_allowed(false).geometry_at(&g, 1, 1);
        let geo = r.geometry_at(&g, 1, 1);
        assert_eq!(geo.top, base.top);
        assert_eq!(geo.height, base.height);
        // Right is open too, but down-right is occupied.
        assert_eq!(geo.width, base.width);
    }

    #[test]
    fn prefer_tall_corridor_claims_further() {
        // Column of open cells above the tile without diagonal support.
        let p = prefs("medium", "", Some("prefer_tall"));
        let g = grid(&["#.#", "#.#", "###"]);
        let r = StretchResolver::new(&p, Size::new(900.0, 900.0));
        let cell = r.cell_size(&g);
        let base = r.with_stretch_allowed(false).geometry_at(&g, 2, 1);
        let geo = r.geometry_at(&g, 2, 1);
        let first = p.padding + base.height / 2.0;
        let second = p.padding + (base.height + first) / 2.0 - cell.height / 4.0;
        assert!((base.top - geo.top - (first + second)).abs() < 1e-9);
        assert!((geo.height - base.height - (first + second)).abs() < 1e-9);
    }

    #[test]
    fn downward_growth_discounts_upward_claim() {
        let p = prefs("medium", "", Some("prefer_tall"));
        let g = grid(&["#.#", "###", "#.#"]);
        let r = StretchResolver::new(&p, Size::new(900.0, 900.0));
        let cell = r.cell_size(&g);
        let base = r.with_stretch_allowed(false).geometry_at(&g, 1, 1);
        let geo = r.geometry_at(&g, 1, 1);
        // Upward: one claim, row -1 is past the edge so the corridor
        // correction applies as well.
        let up_first = p.padding + base.height / 2.0;
        let up = up_first + p.padding + (base.height + up_first) / 2.0 - cell.height / 4.0;
        let down_first = p.padding + base.height / 2.0 - cell.height / 4.0;
        let down = down_first + p.padding + (base.height + down_first) / 2.0 - cell.height / 4.0;
        assert!((base.top - geo.top - up).abs() < 1e-9);
        assert!((geo.height - base.height - up - down).abs() < 1e-9);
    }

    #[test]
    fn prefer_wide_is_horizontal_only_without_support() {
        let p = prefs("medium", "", Some("prefer_wide"));
        let g = grid(&["###", ".#.", "###"]);
        let r = StretchResolver::new(&p, Size::new(900.0, 900.0));
        let base = r.with_stretch_allowed(false).geometry_at(&g, 1, 1);
        let geo = r.geometry_at(&g, 1, 1);
        assert!(geo.left < base.left);
        assert!(geo.right() > base.right());
        assert_eq!(geo.top, base.top);
        assert_eq!(geo.height, base.height);
    }

    #[test]
    fn zero_container_yields_degenerate_tiles() {
        let p = prefs("none", "none", None);
        let g = GridModel::default();
        let r = StretchResolver::new(&p, Size::ZERO);
        assert_eq!(r.cell_size(&g), Size::ZERO);
        let geo = r.geometry_at(&g, 0, 0);
        assert_eq!((geo.width, geo.height), (0.0, 0.0));
    }

    #[test]
    fn image_region_follows_text_density() {
        let mut p = prefs("none", "none", None);
        p.text_size = TextSize::Medium;
        let g = grid(&["#"]);
        let label = p.label_height();

        let normal = StretchResolver::new(&p, Size::new(200.0, 200.0)).geometry_at(&g, 0, 0);
        assert_eq!(normal.image_height, 200.0 - label - BOX_PAD + 8.0);
        assert_eq!(normal.image_width, 200.0 - BOX_PAD + 8.0);
        assert_eq!(normal.image_square_size, normal.image_height);

        let small = StretchResolver::new(&p, Size::new(200.0, 60.0)).geometry_at(&g, 0, 0);
        assert_eq!(
            small.image_height,
            60.0 - label - BOX_PAD + 8.0 + label - LABEL_BAND + 10.0
        );

        let tiny = StretchResolver::new(&p, Size::new(200.0, 30.0)).geometry_at(&g, 0, 0);
        assert_eq!(tiny.image_top_margin, 0.0);
        assert_eq!(
            tiny.image_height,
            30.0 - label - BOX_PAD + 8.0 + label - LABEL_BAND + 25.0
        );
    }

    #[test]
    fn top_margin_only_for_top_labels() {
        let mut p = prefs("none", "none", None);
        let g = grid(&["#"]);
        let bottom = StretchResolver::new(&p, Size::new(200.0, 200.0)).geometry_at(&g, 0, 0);
        assert_eq!(bottom.image_top_margin, 0.0);
        p.text_position = TextPosition::Top;
        let top = StretchResolver::new(&p, Size::new(200.0, 200.0)).geometry_at(&g, 0, 0);
        assert_eq!(top.image_top_margin, p.label_height() + LABEL_BAND - 8.0);
    }

    #[test]
    fn cramped_tiles_reclaim_padding() {
        let p = prefs("medium", "large", None);
        let g = grid(&["#"]);
        let geo = StretchResolver::new(&p, Size::new(60.0, 60.0)).geometry_at(&g, 0, 0);
        // 60 - 2*10 = 40 on both axes.
        assert_eq!(geo.width, 40.0);
        assert_eq!(geo.image_width, 40.0 - BOX_PAD - 2.0 * 5.0 + 8.0 + 2.0 * 5.0 + 2.0 * 10.0);
    }
}
