//! Full and targeted render passes, and the generation token that lets a
//! newer full pass supersede image paints still in flight from older ones.

use std::fmt;

use kurbo::Rect;
use symboard_core::{GridModel, LayoutError, LayoutPreferences, TextSize, Tile, TileId};

use crate::image_cache::ImageCache;
use crate::paint::{self, TileFrame};
use crate::surface::Surface;

/// Monotonic counter identifying the most recent full pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generation {}", self.0)
    }
}

/// Which image of a tile a load was requested for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Symbol,
    ActionIcon,
}

/// What to paint when an image arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageWaiter {
    pub tile: TileId,
    pub slot: ImageSlot,
}

/// The image cache as the renderer uses it.
pub type TileImages = ImageCache<ImageWaiter>;

/// Paints a grid onto a surface and tracks the current generation.
#[derive(Debug, Default)]
pub struct Renderer {
    generation: Generation,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new generation, clear the whole surface and paint every
    /// visible tile in row-major order.
    pub fn full_pass(
        &mut self,
        grid: &GridModel,
        prefs: &LayoutPreferences,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) {
        self.generation = self.generation.next();
        log::debug!(
            "full pass: {}, {} tiles",
            self.generation,
            grid.iter().filter(|t| t.is_visible()).count()
        );

        let (w, h) = surface.size();
        surface.clear_rect(Rect::new(0.0, 0.0, w as f64, h as f64));
        for tile in grid {
            self.paint_tile(tile, prefs, surface, images);
        }
    }

    /// Repaint one tile in place. The generation is left alone so image
    /// paints from the last full pass still land.
    pub fn tile_pass(
        &self,
        id: &TileId,
        grid: &GridModel,
        prefs: &LayoutPreferences,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) -> Result<(), LayoutError> {
        let tile = grid
            .find(id)
            .ok_or_else(|| LayoutError::UnknownTile(id.clone()))?;
        if let Some(g) = &tile.geometry {
            surface.clear_rect(TileFrame::new(g).repaint_region());
        }
        self.paint_tile(tile, prefs, surface, images);
        Ok(())
    }

    /// Paint images that finished loading for the current generation.
    /// Returns how many paints were applied.
    pub fn deliver_images(
        &self,
        grid: &GridModel,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) -> usize {
        let mut painted = 0;
        for (waiter, bitmap) in images.drain(self.generation) {
            let Some(tile) = grid.find(&waiter.tile).filter(|t| t.is_visible()) else {
                continue;
            };
            let Some(g) = &tile.geometry else {
                continue;
            };
            let frame = TileFrame::new(g);
            match waiter.slot {
                ImageSlot::Symbol => {
                    paint::paint_symbol(surface, &frame, &bitmap);
                    self.paint_action_icon(tile, &frame, surface, images);
                }
                ImageSlot::ActionIcon => paint::paint_action_icon(surface, &frame, &bitmap),
            }
            painted += 1;
        }
        painted
    }

    /// Take finished loads off the channel without painting them. The
    /// bitmaps stay cached, so the next full pass paints them directly.
    pub fn discard_images(&self, images: &mut TileImages) -> usize {
        let dropped = images.drain(self.generation).len();
        if dropped > 0 {
            log::trace!("holding {dropped} image paints until the next full pass");
        }
        dropped
    }

    fn paint_tile(
        &self,
        tile: &Tile,
        prefs: &LayoutPreferences,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) {
        if !tile.is_visible() {
            return;
        }
        let Some(g) = &tile.geometry else {
            return;
        };
        let frame = TileFrame::new(g);
        paint::paint_static(surface, tile, &frame, prefs.text_size != TextSize::None);
        self.paint_action_icon(tile, &frame, surface, images);

        if let Some(url) = &tile.image_url {
            let waiter = ImageWaiter {
                tile: tile.id.clone(),
                slot: ImageSlot::Symbol,
            };
            if let Some(bitmap) = images.resolve(url, self.generation, waiter) {
                paint::paint_symbol(surface, &frame, &bitmap);
                self.paint_action_icon(tile, &frame, surface, images);
            }
        }
    }

    fn paint_action_icon(
        &self,
        tile: &Tile,
        frame: &TileFrame,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) {
        if !paint::has_action_icon(tile) {
            return;
        }
        let Some(url) = &tile.action_image_url else {
            return;
        };
        let waiter = ImageWaiter {
            tile: tile.id.clone(),
            slot: ImageSlot::ActionIcon,
        };
        if let Some(icon) = images.resolve(url, self.generation, waiter) {
            paint::paint_action_icon(surface, frame, &icon);
        }
    }
}
