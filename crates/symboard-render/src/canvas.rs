//! A software [`Surface`] backed by a tiny-skia pixmap, with label glyphs
//! rasterized by fontdue.

use std::collections::HashMap;

use fontdue::{Font, FontSettings};
use kurbo::{BezPath, PathEl, Rect};
use symboard_core::Color;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, PixmapRef,
    Stroke, Transform,
};

use crate::surface::{Bitmap, Surface, TextRun};

/// Error type for canvas construction.
#[derive(Debug)]
pub enum CanvasError {
    /// The font data could not be parsed.
    InvalidFont(&'static str),
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::InvalidFont(why) => write!(f, "invalid font data: {why}"),
        }
    }
}

impl std::error::Error for CanvasError {}

/// Cached rasterized glyph.
struct Glyph {
    coverage: Vec<u8>, // alpha values, width*height
    width: usize,
    height: usize,
    xmin: i32,
    ymin: i32,
    advance: f32,
}

/// Raster surface in premultiplied RGBA.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    /// `None` while either dimension is zero.
    pixmap: Option<Pixmap>,
    font: Option<Font>,
    /// Keyed by character and font size bits.
    glyphs: HashMap<(char, u32), Glyph>,
}

impl PixelCanvas {
    /// A transparent canvas. Without font data, labels are not drawn.
    pub fn new(width: u32, height: u32, font_data: Option<&[u8]>) -> Result<Self, CanvasError> {
        let font = match font_data {
            Some(data) => {
                Some(Font::from_bytes(data, FontSettings::default()).map_err(CanvasError::InvalidFont)?)
            }
            None => {
                log::warn!("no font supplied; tile labels will not be drawn");
                None
            }
        };
        Ok(Self {
            width,
            height,
            pixmap: Pixmap::new(width, height),
            font,
            glyphs: HashMap::new(),
        })
    }

    /// Premultiplied RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pm = self.pixmap.as_ref()?;
        let p = pm.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Copy the canvas into a softbuffer-style `0xFFRRGGBB` buffer,
    /// composited over white, with its top-left at `origin`. Each
    /// `factor`×`factor` block of canvas pixels is averaged into one buffer
    /// pixel. Everything the canvas does not cover is white.
    pub fn blit_to_buffer(
        &self,
        buf: &mut [u32],
        buf_width: usize,
        buf_height: usize,
        origin: (usize, usize),
        factor: usize,
    ) {
        buf.fill(0xFFFFFFFF);
        let Some(pm) = &self.pixmap else {
            return;
        };
        let factor = factor.max(1);
        let src_w = self.width as usize;
        let copy_w = (src_w / factor).min(buf_width.saturating_sub(origin.0));
        let copy_h = (self.height as usize / factor).min(buf_height.saturating_sub(origin.1));
        let samples = (factor * factor) as u32;

        let pixels = pm.pixels();
        for y in 0..copy_h {
            let dst_start = (origin.1 + y) * buf_width + origin.0;
            let Some(dst_row) = buf.get_mut(dst_start..dst_start + copy_w) else {
                break;
            };
            for (x, dst) in dst_row.iter_mut().enumerate() {
                let (mut r, mut g, mut b, mut a) = (0u32, 0u32, 0u32, 0u32);
                for sy in y * factor..(y + 1) * factor {
                    for p in &pixels[sy * src_w + x * factor..sy * src_w + (x + 1) * factor] {
                        r += p.red() as u32;
                        g += p.green() as u32;
                        b += p.blue() as u32;
                        a += p.alpha() as u32;
                    }
                }
                let under = 255 - a / samples;
                let r = r / samples + under;
                let g = g / samples + under;
                let b = b / samples + under;
                *dst = 0xFF000000 | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255);
            }
        }
    }

    fn glyph(&mut self, ch: char, px: f32) -> Option<&Glyph> {
        let font = self.font.as_ref()?;
        let key = (ch, px.to_bits());
        Some(self.glyphs.entry(key).or_insert_with(|| {
            let (m, coverage) = font.rasterize(ch, px);
            Glyph {
                coverage,
                width: m.width,
                height: m.height,
                xmin: m.xmin,
                ymin: m.ymin,
                advance: m.advance_width,
            }
        }))
    }
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
    paint.anti_alias = true;
    paint
}

fn skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}

fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

impl Surface for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixmap = Pixmap::new(width, height);
    }

    fn clear_rect(&mut self, rect: Rect) {
        let (Some(pm), Some(r)) = (self.pixmap.as_mut(), skia_rect(rect)) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = false;
        pm.fill_rect(r, &paint, Transform::identity(), None);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (Some(pm), Some(r)) = (self.pixmap.as_mut(), skia_rect(rect)) else {
            return;
        };
        pm.fill_rect(r, &paint_for(color), Transform::identity(), None);
    }

    fn fill_and_stroke(&mut self, path: &BezPath, fill: Color, stroke: Color, line_width: f64) {
        let (Some(pm), Some(p)) = (self.pixmap.as_mut(), skia_path(path)) else {
            return;
        };
        pm.fill_path(&p, &paint_for(fill), FillRule::Winding, Transform::identity(), None);
        let outline = Stroke {
            width: line_width as f32,
            ..Default::default()
        };
        pm.stroke_path(&p, &paint_for(stroke), &outline, Transform::identity(), None);
    }

    fn fill_text(&mut self, run: &TextRun<'_>) {
        let px = run.font_px as f32;
        let Some(ascent) = self
            .font
            .as_ref()
            .map(|f| f.horizontal_line_metrics(px).map_or(px * 0.8, |m| m.ascent))
        else {
            return;
        };

        let text_width: f32 = run
            .text
            .chars()
            .filter_map(|ch| self.glyph(ch, px).map(|g| g.advance))
            .sum();
        let baseline = run.anchor.y as f32 + ascent;
        let mut pen = run.anchor.x as f32 - text_width / 2.0;

        let clip = run.clip.intersect(Rect::new(0.0, 0.0, self.width as f64, self.height as f64));
        let (cx0, cy0, cx1, cy1) = (
            clip.x0.max(0.0) as i32,
            clip.y0.max(0.0) as i32,
            clip.x1.max(0.0) as i32,
            clip.y1.max(0.0) as i32,
        );
        let color = run.color;
        let stride = self.width as usize;

        for ch in run.text.chars() {
            let Some(glyph) = self.glyph(ch, px) else {
                return;
            };
            let gx = pen.round() as i32 + glyph.xmin;
            let gy = (baseline - (glyph.ymin + glyph.height as i32) as f32).round() as i32;
            pen += glyph.advance;
            let (gw, gh) = (glyph.width, glyph.height);
            let coverage = glyph.coverage.clone();

            let Some(pm) = self.pixmap.as_mut() else {
                return;
            };
            let data = pm.data_mut();
            for row in 0..gh {
                let py = gy + row as i32;
                if py < cy0 || py >= cy1 {
                    continue;
                }
                for col in 0..gw {
                    let px_x = gx + col as i32;
                    if px_x < cx0 || px_x >= cx1 {
                        continue;
                    }
                    let cov = coverage[row * gw + col] as u32;
                    if cov == 0 {
                        continue;
                    }
                    let sa = cov * color.a() as u32 / 255;
                    let idx = (py as usize * stride + px_x as usize) * 4;
                    let dst = &mut data[idx..idx + 4];
                    let inv = 255 - sa;
                    dst[0] = ((color.r() as u32 * sa + dst[0] as u32 * inv) / 255) as u8;
                    dst[1] = ((color.g() as u32 * sa + dst[1] as u32 * inv) / 255) as u8;
                    dst[2] = ((color.b() as u32 * sa + dst[2] as u32 * inv) / 255) as u8;
                    dst[3] = ((255 * sa + dst[3] as u32 * inv) / 255) as u8;
                }
            }
        }
    }

    fn draw_image(&mut self, image: &Bitmap, dest: Rect) {
        let Some(pm) = self.pixmap.as_mut() else {
            return;
        };
        let Some(src) = PixmapRef::from_bytes(image.data(), image.width(), image.height()) else {
            return;
        };
        let sx = dest.width() / image.width() as f64;
        let sy = dest.height() / image.height() as f64;
        let transform =
            Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, dest.x0 as f32, dest.y0 as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pm.draw_pixmap(0, 0, src, &paint, transform, None);
    }
}
