//! The [`LayoutEngine`]: one place that owns a board's layout state and
//! decides when to recompute geometry and when to paint.

use std::time::{Duration, Instant};

use symboard_core::{
    Chrome, GridModel, LayoutError, LayoutPreferences, Modes, RawPreferences, Size,
    StretchResolver, Tile, TileId,
};

use crate::calibration::SUPERSAMPLE;
use crate::pass::{Generation, Renderer, TileImages};
use crate::surface::Surface;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Minimum time between two unforced full passes.
    pub throttle: Duration,
    /// UI around the board, used to derive the container.
    pub chrome: Chrome,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(100),
            chrome: Chrome::default(),
        }
    }
}

/// What changed since the last layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Trigger {
    /// The viewport was resized.
    Resize(Size),
    /// Stored preferences changed.
    Preferences(RawPreferences),
    /// The board or its buttons changed.
    Grid(GridModel),
    EditMode(bool),
    SpeakMode(bool),
    SidebarPinned(bool),
    /// Recompute and paint now, ignoring the throttle.
    Force,
}

/// Result of asking the engine to paint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// A full pass ran.
    Painted,
    /// Too soon after the last pass; a redraw is pending.
    Throttled,
    /// Nothing to do.
    Idle,
}

/// Owns the grid, resolved preferences and renderer of one board view.
#[derive(Debug)]
pub struct LayoutEngine {
    config: EngineConfig,
    raw_prefs: RawPreferences,
    prefs: LayoutPreferences,
    viewport: Size,
    container: Size,
    modes: Modes,
    grid: GridModel,
    renderer: Renderer,
    last_full_pass: Option<Instant>,
    pending: bool,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig, raw_prefs: RawPreferences) -> Self {
        Self {
            config,
            prefs: LayoutPreferences::resolve(&raw_prefs, 0.0),
            raw_prefs,
            viewport: Size::ZERO,
            container: Size::ZERO,
            modes: Modes::default(),
            grid: GridModel::default(),
            renderer: Renderer::new(),
            last_full_pass: None,
            pending: false,
        }
    }

    /// Apply `trigger`, refresh geometry, and run a full pass unless it is
    /// throttled.
    pub fn recompute(
        &mut self,
        trigger: Trigger,
        now: Instant,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) -> PassOutcome {
        let force = matches!(trigger, Trigger::Force);
        match trigger {
            Trigger::Resize(viewport) => self.viewport = viewport,
            Trigger::Preferences(raw) => self.raw_prefs = raw,
            Trigger::Grid(grid) => self.grid = grid,
            Trigger::EditMode(on) => self.modes.edit = on,
            Trigger::SpeakMode(on) => self.modes.speak = on,
            Trigger::SidebarPinned(on) => self.config.chrome.sidebar_pinned = on,
            Trigger::Force => {}
        }
        self.relayout();

        if !force && self.throttled(now) {
            log::debug!("full pass throttled; redraw pending");
            self.pending = true;
            return PassOutcome::Throttled;
        }
        self.paint_all(now, surface, images);
        PassOutcome::Painted
    }

    /// Run a pass that was throttled earlier, once the interval is up.
    pub fn redraw_if_needed(
        &mut self,
        now: Instant,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) -> PassOutcome {
        if !self.pending {
            return PassOutcome::Idle;
        }
        if self.throttled(now) {
            return PassOutcome::Throttled;
        }
        self.paint_all(now, surface, images);
        PassOutcome::Painted
    }

    /// Repaint a single tile, e.g. after its hover or touch state changed.
    ///
    /// While a throttled full pass is pending the surface still shows the
    /// previous layout, so nothing is painted; the pending pass picks up
    /// the tile's new state.
    pub fn repaint_tile(
        &self,
        id: &TileId,
        surface: &mut dyn Surface,
        images: &mut TileImages,
    ) -> Result<(), LayoutError> {
        if self.pending {
            return match self.grid.find(id) {
                Some(_) => Ok(()),
                None => Err(LayoutError::UnknownTile(id.clone())),
            };
        }
        self.renderer
            .tile_pass(id, &self.grid, &self.prefs, surface, images)
    }

    /// Paint any images that have arrived for the current generation.
    /// Returns how many were painted.
    ///
    /// Geometry already moved on if a full pass is pending; arrivals are
    /// then cached but not painted.
    pub fn pump_images(&self, surface: &mut dyn Surface, images: &mut TileImages) -> usize {
        if self.pending {
            self.renderer.discard_images(images);
            return 0;
        }
        self.renderer.deliver_images(&self.grid, surface, images)
    }

    /// Set a tile's hover/touch state. Returns whether anything changed.
    pub fn set_highlight(&mut self, id: &TileId, hover: bool, touched: bool) -> Result<bool, LayoutError> {
        let tile = self
            .grid
            .find_mut(id)
            .ok_or_else(|| LayoutError::UnknownTile(id.clone()))?;
        let changed = tile.hover != hover || tile.touched != touched;
        tile.hover = hover;
        tile.touched = touched;
        Ok(changed)
    }

    /// The visible tile under a point in logical (container) coordinates.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Tile> {
        self.grid.tile_at_point(x, y)
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn tile_mut(&mut self, id: &TileId) -> Option<&mut Tile> {
        self.grid.find_mut(id)
    }

    pub fn preferences(&self) -> &LayoutPreferences {
        &self.prefs
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn chrome(&self) -> &Chrome {
        &self.config.chrome
    }

    /// Offset of the board's top edge within the viewport.
    pub fn board_top(&self) -> f64 {
        self.config
            .chrome
            .board_top(self.modes, self.prefs.text_size, self.prefs.text_position)
    }

    pub fn modes(&self) -> Modes {
        self.modes
    }

    pub fn generation(&self) -> Generation {
        self.renderer.generation()
    }

    /// Whether a throttled full pass is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Raster size of the surface for the current container.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            (self.container.width * SUPERSAMPLE).round() as u32,
            (self.container.height * SUPERSAMPLE).round() as u32,
        )
    }

    fn throttled(&self, now: Instant) -> bool {
        self.last_full_pass
            .is_some_and(|last| now.saturating_duration_since(last) < self.config.throttle)
    }

    fn relayout(&mut self) {
        self.prefs = LayoutPreferences::resolve(&self.raw_prefs, self.viewport.width);
        self.container = self.config.chrome.container_size(
            self.viewport,
            self.modes,
            self.prefs.text_size,
            self.prefs.text_position,
        );
        StretchResolver::new(&self.prefs, self.container)
            .with_stretch_allowed(!self.modes.edit)
            .resolve(&mut self.grid);
    }

    fn paint_all(&mut self, now: Instant, surface: &mut dyn Surface, images: &mut TileImages) {
        let (w, h) = self.surface_size();
        if surface.size() != (w, h) {
            surface.resize(w, h);
        }
        self.renderer
            .full_pass(&self.grid, &self.prefs, surface, images);
        self.last_full_pass = Some(now);
        self.pending = false;
    }
}
