//! **symboard-render**: painting communication boards.
//!
//! Geometry comes from [`symboard_core`]; this crate turns it into paint
//! calls on a [`Surface`]. The [`LayoutEngine`] ties the two together: it
//! recomputes layout on explicit [`Trigger`]s, throttles full passes, and
//! applies image loads as they complete.
//!
//! ```ignore
//! let mut engine = LayoutEngine::new(EngineConfig::default(), raw_prefs);
//! let mut images = TileImages::new(FsImageSource::with_root("boards"));
//! let mut canvas = PixelCanvas::new(0, 0, Some(font))?;
//! engine.recompute(Trigger::Grid(grid), Instant::now(), &mut canvas, &mut images);
//! engine.recompute(Trigger::Resize(Size::new(1024.0, 768.0)), Instant::now(), &mut canvas, &mut images);
//! // later, on the UI thread:
//! engine.pump_images(&mut canvas, &mut images);
//! ```

pub mod calibration;
pub mod canvas;
pub mod engine;
pub mod image_cache;
pub mod paint;
pub mod pass;
pub mod surface;

pub use canvas::{CanvasError, PixelCanvas};
pub use engine::{EngineConfig, LayoutEngine, PassOutcome, Trigger};
pub use image_cache::{Completion, FsImageSource, ImageCache, ImageError, ImageSource, LoadResult};
pub use pass::{Generation, ImageSlot, ImageWaiter, Renderer, TileImages};
pub use surface::{Bitmap, PaintOp, RecordingSurface, Surface, TextRun};
