//! The drawing boundary: the [`Surface`] trait, [`Bitmap`] handles, and a
//! [`RecordingSurface`] that captures paint calls instead of rasterizing.

use std::sync::Arc;

use kurbo::{BezPath, Point, Rect};
use symboard_core::Color;

// ---------------------------------------------------------------------------
// Bitmap
// ---------------------------------------------------------------------------

/// A decoded image: premultiplied RGBA8, shared by reference count.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Bitmap {
    /// Build from straight-alpha RGBA8 pixels. Returns `None` when the
    /// buffer length does not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        for px in rgba.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a != 255 {
                px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
                px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
                px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
            }
        }
        Some(Self {
            width,
            height,
            data: rgba.into(),
        })
    }

    /// A bitmap filled with one colour.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let px = [color.r(), color.g(), color.b(), color.a()];
        let rgba = px.repeat(width as usize * height as usize);
        // Length matches by construction.
        Self::from_rgba8(width, height, rgba).unwrap_or_else(|| Self {
            width: 0,
            height: 0,
            data: Arc::from(Vec::new()),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A line of label text: centered on `anchor.x`, top of the em box at
/// `anchor.y`, clipped to `clip`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub anchor: Point,
    pub clip: Rect,
    pub font_px: f64,
    pub color: Color,
}

/// A 2D immediate-mode raster target addressed in raster pixels.
pub trait Surface {
    /// Current size in raster pixels.
    fn size(&self) -> (u32, u32);

    /// Reallocate to a new size; contents become transparent.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset a region to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill a closed path, then stroke its outline.
    fn fill_and_stroke(&mut self, path: &BezPath, fill: Color, stroke: Color, line_width: f64);

    /// Draw one clipped line of text.
    fn fill_text(&mut self, run: &TextRun<'_>);

    /// Draw `image` scaled into `dest`.
    fn draw_image(&mut self, image: &Bitmap, dest: Rect);
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One recorded paint call.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    Resize {
        width: u32,
        height: u32,
    },
    Clear(Rect),
    FillRect {
        rect: Rect,
        color: Color,
    },
    Path {
        path: BezPath,
        fill: Color,
        stroke: Color,
        line_width: f64,
    },
    Text {
        text: String,
        anchor: Point,
        clip: Rect,
        font_px: f64,
        color: Color,
    },
    Image {
        width: u32,
        height: u32,
        dest: Rect,
    },
}

/// A surface that records every call, for tests and debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// All calls so far, in order.
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Drop the recorded calls.
    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    /// Recorded image blits.
    pub fn images(&self) -> impl Iterator<Item = Rect> + '_ {
        self.ops.iter().filter_map(|op| match op {
            PaintOp::Image { dest, .. } => Some(*dest),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(PaintOp::Resize { width, height });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(PaintOp::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(PaintOp::FillRect { rect, color });
    }

    fn fill_and_stroke(&mut self, path: &BezPath, fill: Color, stroke: Color, line_width: f64) {
        self.ops.push(PaintOp::Path {
            path: path.clone(),
            fill,
            stroke,
            line_width,
        });
    }

    fn fill_text(&mut self, run: &TextRun<'_>) {
        self.ops.push(PaintOp::Text {
            text: run.text.to_string(),
            anchor: run.anchor,
            clip: run.clip,
            font_px: run.font_px,
            color: run.color,
        });
    }

    fn draw_image(&mut self, image: &Bitmap, dest: Rect) {
        self.ops.push(PaintOp::Image {
            width: image.width(),
            height: image.height(),
            dest,
        });
    }
}
