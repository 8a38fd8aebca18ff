//! Painting one tile: body, label, image well and images.
//!
//! All positions derive from the tile's [`Geometry`] and are produced in
//! raster space (see [`calibration`](crate::calibration)).

use kurbo::{BezPath, Point, Rect};
use symboard_core::{Color, Geometry, Tile};

use crate::calibration::*;
use crate::surface::{Bitmap, Surface, TextRun};

/// Raster-space layout of one tile, derived from its geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileFrame {
    /// The rounded body, before any highlight bleed.
    pub body: Rect,
    /// The white square behind the symbol image.
    pub well: Rect,
    /// Where the symbol image is drawn.
    pub image: Rect,
    /// Where the action icon is drawn.
    pub action_icon: Rect,
    /// Label clip band.
    pub label_clip: Rect,
    /// Label anchor: horizontal center, top of the text.
    pub label_anchor: Point,
}

impl TileFrame {
    pub fn new(g: &Geometry) -> Self {
        let s = SUPERSAMPLE;
        let inner = g.border_width;

        // Bounded by the narrower side; keeps narrow tiles' symbols in the body.
        let side = g.image_square_size;
        let image_left = (g.width - side) / 2.0 - inner;
        let image_top = inner + IMAGE_TOP_GAP;
        let text_top = g.image_height + image_top + LABEL_GAP;

        let w = (g.width - 2.0 * inner) * s + BODY_WIDTH_NUDGE;
        let h = (g.height - 2.0 * inner) * s + BODY_HEIGHT_NUDGE;
        let x = g.left * s + BODY_X_NUDGE;
        let y = g.top * s + BODY_Y_NUDGE;
        let body = Rect::from_origin_size((x, y), (w, h));

        let well_origin = ((g.left + image_left) * s, (g.top + image_top) * s);
        let well = Rect::from_origin_size(well_origin, (side * s, side * s));
        let image = Rect::from_origin_size(
            (well_origin.0 + IMAGE_X_NUDGE, well_origin.1 + IMAGE_Y_NUDGE),
            (side * s + IMAGE_WIDTH_NUDGE, side * s),
        );
        let action_icon = Rect::from_origin_size(
            (x + w - ACTION_ICON_SIZE - ACTION_ICON_INSET, y),
            (ACTION_ICON_SIZE, ACTION_ICON_SIZE),
        );

        let label_y = (g.top + text_top) * s;
        let label_clip = Rect::from_origin_size((g.left * s, label_y), (g.width * s, LABEL_CLIP_HEIGHT));
        let label_anchor = Point::new(
            (g.left + g.width / 2.0 - inner) * s,
            label_y + LABEL_Y_NUDGE,
        );

        Self {
            body,
            well,
            image,
            action_icon,
            label_clip,
            label_anchor,
        }
    }

    /// Region a targeted repaint clears.
    pub fn repaint_region(&self) -> Rect {
        self.body.inflate(REPAINT_MARGIN, REPAINT_MARGIN)
    }
}

/// Four straight edges joined by quadratic corners of `radius`, grown
/// outward by `extra` on every side.
pub fn rounded_body(rect: Rect, radius: f64, extra: f64) -> BezPath {
    let (x, y, w, h, r, e) = (rect.x0, rect.y0, rect.width(), rect.height(), radius, extra);
    let mut p = BezPath::new();
    p.move_to((x + r - e, y - e));
    p.line_to((x + w - r + e, y - e));
    p.quad_to((x + w + e, y - e), (x + w + e, y + r - e));
    p.line_to((x + w + e, y + h - r + e));
    p.quad_to((x + w + e, y + h + e), (x + w - r + e, y + h + e));
    p.line_to((x + r - e, y + h + e));
    p.quad_to((x - e, y + h + e), (x - e, y + h - r + e));
    p.line_to((x - e, y + r - e));
    p.quad_to((x - e, y - e), (x + r - e, y - e));
    p.close_path();
    p
}

/// Stroke width for a tile's body outline.
pub fn line_width(tile: &Tile) -> f64 {
    if tile.touched {
        LINE_WIDTH_TOUCHED
    } else if tile.hover {
        LINE_WIDTH_HOVER
    } else {
        LINE_WIDTH
    }
}

/// Paint everything of a tile that does not wait on an image: body, label
/// (when `show_label`) and the white image well.
pub fn paint_static(surface: &mut dyn Surface, tile: &Tile, frame: &TileFrame, show_label: bool) {
    let (fill, stroke, extra) = if tile.is_highlighted() {
        (tile.colors.dark_background, tile.colors.dark_border, HIGHLIGHT_BLEED)
    } else {
        (tile.colors.background, tile.colors.border, 0.0)
    };
    let path = rounded_body(frame.body, CORNER_RADIUS * SUPERSAMPLE, extra);
    surface.fill_and_stroke(&path, fill, stroke, line_width(tile));

    if show_label && !tile.label.is_empty() {
        surface.fill_text(&TextRun {
            text: &tile.label,
            anchor: frame.label_anchor,
            clip: frame.label_clip,
            font_px: LABEL_FONT_PX,
            color: tile.colors.text,
        });
    }

    surface.fill_rect(frame.well, Color::WHITE);
}

/// Whether the tile shows an action icon.
pub fn has_action_icon(tile: &Tile) -> bool {
    tile.action_image_url.is_some() && !tile.talk_action
}

pub fn paint_symbol(surface: &mut dyn Surface, frame: &TileFrame, image: &Bitmap) {
    surface.draw_image(image, frame.image);
}

pub fn paint_action_icon(surface: &mut dyn Surface, frame: &TileFrame, icon: &Bitmap) {
    surface.draw_image(icon, frame.action_icon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PaintOp, RecordingSurface};
    use kurbo::PathEl;

    fn geometry() -> Geometry {
        Geometry {
            top: 12.0,
            left: 12.0,
            width: 100.0,
            height: 120.0,
            image_width: 80.0,
            image_height: 80.0,
            image_square_size: 80.0,
            image_top_margin: 0.0,
            border_width: 2.0,
        }
    }

    #[test]
    fn frame_offsets() {
        let f = TileFrame::new(&geometry());
        assert_eq!(f.body.x0, 36.0 - 1.5);
        assert_eq!(f.body.y0, 36.0 + 8.0);
        assert_eq!(f.body.width(), 96.0 * 3.0 + 3.5);
        assert_eq!(f.body.height(), 116.0 * 3.0 + 2.0);
        // image_left = (100 - 80) / 2 - 2 = 8, image_top = 4
        assert_eq!(f.well, Rect::from_origin_size((60.0, 48.0), (240.0, 240.0)));
        assert_eq!(f.image, Rect::from_origin_size((59.0, 51.0), (241.5, 240.0)));
        assert_eq!(f.action_icon.x1, f.body.x1 - 6.0);
        assert_eq!(f.action_icon.y0, f.body.y0);
        // text_top = 80 + 4 + 3 = 87
        assert_eq!(f.label_clip.y0, 99.0 * 3.0);
        assert_eq!(f.label_anchor, Point::new(60.0 * 3.0, 297.0 - 8.0));
        assert_eq!(f.repaint_region().x0, f.body.x0 - 9.0);
    }

    #[test]
    fn narrow_tile_keeps_symbol_inside_body() {
        let g = Geometry {
            width: 60.0,
            height: 200.0,
            image_width: 40.0,
            image_height: 150.0,
            image_square_size: 40.0,
            ..geometry()
        };
        let f = TileFrame::new(&g);
        assert_eq!(f.well.width(), 120.0);
        assert!(f.well.x0 >= f.body.x0 && f.well.x1 <= f.body.x1);
        assert!(f.image.x0 >= f.body.x0 && f.image.x1 <= f.body.x1);
        // The label band still starts below the full image area.
        assert_eq!(f.label_clip.y0, (12.0 + 150.0 + 4.0 + 3.0) * 3.0);
    }

    #[test]
    fn body_path_uses_quadratic_corners() {
        let p = rounded_body(Rect::new(0.0, 0.0, 30.0, 30.0), 12.0, 0.0);
        let quads = p.elements().iter().filter(|e| matches!(e, PathEl::QuadTo(..))).count();
        let lines = p.elements().iter().filter(|e| matches!(e, PathEl::LineTo(..))).count();
        assert_eq!((quads, lines), (4, 4));
        assert_eq!(p.elements()[0], PathEl::MoveTo(Point::new(12.0, 0.0)));
    }

    #[test]
    fn bleed_grows_outward() {
        let plain = rounded_body(Rect::new(10.0, 10.0, 40.0, 40.0), 12.0, 0.0);
        let bled = rounded_body(Rect::new(10.0, 10.0, 40.0, 40.0), 12.0, 3.0);
        use kurbo::Shape;
        let (a, b) = (plain.bounding_box(), bled.bounding_box());
        assert_eq!(b, a.inflate(3.0, 3.0));
    }

    #[test]
    fn highlight_changes_colors_and_width() {
        let mut tile = Tile::new("a", "hi");
        tile.colors.dark_background = Color::from_rgb(1, 2, 3);
        let frame = TileFrame::new(&geometry());

        let mut s = RecordingSurface::new(1000, 1000);
        paint_static(&mut s, &tile, &frame, true);
        assert!(matches!(
            s.ops()[0],
            PaintOp::Path { line_width, fill, .. } if line_width == 3.0 && fill == Color::WHITE
        ));

        tile.hover = true;
        s.take_ops();
        paint_static(&mut s, &tile, &frame, true);
        assert!(matches!(
            s.ops()[0],
            PaintOp::Path { line_width, fill, .. } if line_width == 6.0 && fill == Color::from_rgb(1, 2, 3)
        ));

        tile.touched = true;
        assert_eq!(line_width(&tile), 9.0);
    }

    #[test]
    fn static_paint_order() {
        let tile = Tile::new("a", "hello");
        let mut s = RecordingSurface::new(1000, 1000);
        paint_static(&mut s, &tile, &TileFrame::new(&geometry()), true);
        let ops = s.ops();
        assert_eq!(ops.len(), 3);
        assert!(matches!(&ops[1], PaintOp::Text { text, font_px, .. } if text == "hello" && *font_px == 36.0));
        assert!(matches!(ops[2], PaintOp::FillRect { color, .. } if color == Color::WHITE));
    }

    #[test]
    fn no_label_without_text() {
        let tile = Tile::new("a", "hello");
        let mut s = RecordingSurface::new(1000, 1000);
        paint_static(&mut s, &tile, &TileFrame::new(&geometry()), false);
        assert!(!s.ops().iter().any(|op| matches!(op, PaintOp::Text { .. })));
    }

    #[test]
    fn talk_action_hides_icon() {
        let mut tile = Tile::new("a", "x").with_action_image("go.png");
        assert!(has_action_icon(&tile));
        tile.talk_action = true;
        assert!(!has_action_icon(&tile));
    }
}
