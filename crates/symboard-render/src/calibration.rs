//! Raster-space constants for tile painting.
//!
//! Geometry is logical; painting happens at [`SUPERSAMPLE`] times that
//! resolution. The offsets below nudge the body path, label and images so
//! they line up with each other at that scale.

/// Logical to raster scale factor.
pub const SUPERSAMPLE: f64 = 3.0;

/// Logical corner radius of the tile body.
pub const CORNER_RADIUS: f64 = 4.0;

/// Added to the body width after scaling.
pub const BODY_WIDTH_NUDGE: f64 = 3.5;
/// Added to the body height after scaling.
pub const BODY_HEIGHT_NUDGE: f64 = 2.0;
/// Added to the body x after scaling.
pub const BODY_X_NUDGE: f64 = -1.5;
/// Added to the body y after scaling.
pub const BODY_Y_NUDGE: f64 = 8.0;

/// Stroke widths for the body outline.
pub const LINE_WIDTH: f64 = 3.0;
pub const LINE_WIDTH_HOVER: f64 = 6.0;
pub const LINE_WIDTH_TOUCHED: f64 = 9.0;
/// Outward growth of a highlighted body.
pub const HIGHLIGHT_BLEED: f64 = 3.0;

/// Margin cleared around the body on a targeted repaint.
pub const REPAINT_MARGIN: f64 = 9.0;

/// Label font size in raster pixels.
pub const LABEL_FONT_PX: f64 = 36.0;
/// Height of the label clip band in raster pixels.
pub const LABEL_CLIP_HEIGHT: f64 = 60.0;
/// Added to the label anchor y after scaling.
pub const LABEL_Y_NUDGE: f64 = -8.0;

/// Logical gap between the inner border and the image well.
pub const IMAGE_TOP_GAP: f64 = 2.0;
/// Logical gap between the image well and the label.
pub const LABEL_GAP: f64 = 3.0;

/// Added to the symbol image x after scaling.
pub const IMAGE_X_NUDGE: f64 = -1.0;
/// Added to the symbol image y after scaling.
pub const IMAGE_Y_NUDGE: f64 = 3.0;
/// Added to the symbol image width after scaling.
pub const IMAGE_WIDTH_NUDGE: f64 = 1.5;

/// Raster size of the square action icon.
pub const ACTION_ICON_SIZE: f64 = 60.0;
/// Distance from the body's right edge to the icon's right edge.
pub const ACTION_ICON_INSET: f64 = 6.0;
