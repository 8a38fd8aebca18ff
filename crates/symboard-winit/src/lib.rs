//! Winit viewer for symboard boards.
//!
//! Shows one board in a native window using:
//! - [`winit`] for window creation and input events
//! - [`softbuffer`] for presenting the CPU-rendered canvas
//! - [`symboard_render`] for layout, painting and image loading
//!
//! Resizes become [`Trigger::Resize`], hovering and pressing tiles repaint
//! just those tiles, and image loads are applied between events.
//!
//! # Usage
//!
//! ```rust,no_run
//! use symboard_core::GridModel;
//! use symboard_winit::{BoardViewer, ViewerConfig};
//!
//! let grid = GridModel::default();
//! BoardViewer::new(ViewerConfig::default(), grid).run().unwrap();
//! ```

mod input;

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use symboard_core::{GridModel, RawPreferences, Size, TileId};
use symboard_render::{
    FsImageSource, LayoutEngine, PassOutcome, PixelCanvas, TileImages, Trigger,
    calibration::SUPERSAMPLE,
};

use input::Command;

pub use symboard_render::EngineConfig;

/// How often pending redraws and image completions are checked.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the board viewer.
pub struct ViewerConfig {
    /// Window title.
    pub title: String,
    /// Font bytes (TTF/OTF) for tile labels. If `None`, labels are not drawn.
    pub font_data: Option<Vec<u8>>,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Throttle and surrounding chrome.
    pub engine: EngineConfig,
    pub preferences: RawPreferences,
    /// Directory relative image URLs resolve against.
    pub image_root: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "symboard".into(),
            font_data: None,
            width: 1024,
            height: 768,
            engine: EngineConfig::default(),
            preferences: RawPreferences::default(),
            image_root: None,
        }
    }
}

// ---------------------------------------------------------------------------
// BoardViewer
// ---------------------------------------------------------------------------

/// Owns the main-thread event loop and shows one board.
pub struct BoardViewer {
    config: ViewerConfig,
    grid: GridModel,
}

impl BoardViewer {
    pub fn new(config: ViewerConfig, grid: GridModel) -> Self {
        Self { config, grid }
    }

    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        let canvas = PixelCanvas::new(0, 0, self.config.font_data.as_deref())?;
        let source = match &self.config.image_root {
            Some(root) => FsImageSource::with_root(root),
            None => FsImageSource::new(),
        };
        let engine = LayoutEngine::new(self.config.engine.clone(), self.config.preferences.clone());
        let mut app = ViewerApp {
            title: self.config.title,
            initial_size: LogicalSize::new(self.config.width, self.config.height),
            engine,
            canvas,
            images: TileImages::new(source),
            grid: Some(self.grid),
            state: None,
            hovered: None,
            pressed: None,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ViewerApp - ApplicationHandler
// ---------------------------------------------------------------------------

struct ViewerApp {
    title: String,
    initial_size: LogicalSize<u32>,
    engine: LayoutEngine,
    canvas: PixelCanvas,
    images: TileImages,
    /// Handed to the engine once the window exists.
    grid: Option<GridModel>,
    state: Option<WindowState>,
    hovered: Option<TileId>,
    pressed: Option<TileId>,
}

struct WindowState {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    pixel_width: u32,
    pixel_height: u32,
}

impl ViewerApp {
    fn request_redraw(&self) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }

    fn apply(&mut self, trigger: Trigger) {
        let outcome = self
            .engine
            .recompute(trigger, Instant::now(), &mut self.canvas, &mut self.images);
        if outcome == PassOutcome::Painted {
            self.request_redraw();
        }
    }

    /// Update one tile's highlight and repaint it if it changed.
    fn highlight(&mut self, id: &TileId, hover: bool, touched: bool) {
        match self.engine.set_highlight(id, hover, touched) {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                log::warn!("highlight: {err}");
                return;
            }
        }
        if let Err(err) = self.engine.repaint_tile(id, &mut self.canvas, &mut self.images) {
            log::warn!("repaint: {err}");
        }
        self.request_redraw();
    }

    fn hover(&mut self, target: Option<TileId>) {
        if target == self.hovered {
            return;
        }
        if let Some(old) = self.hovered.take() {
            let touched = self.pressed.as_ref() == Some(&old);
            self.highlight(&old, false, touched);
        }
        if let Some(new) = &target {
            let touched = self.pressed.as_ref() == Some(new);
            self.highlight(new, true, touched);
        }
        self.hovered = target;
    }

    fn render(&mut self) {
        let board_top = self.engine.board_top().max(0.0) as usize;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let width = state.pixel_width;
        let height = state.pixel_height;
        if width == 0 || height == 0 {
            return;
        }

        let mut buf = match state.surface.buffer_mut() {
            Ok(b) => b,
            Err(err) => {
                log::warn!("softbuffer: {err}");
                return;
            }
        };
        self.canvas.blit_to_buffer(
            &mut buf,
            width as usize,
            height as usize,
            (0, board_top),
            SUPERSAMPLE as usize,
        );
        buf.present().ok();
    }
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return; // already initialized
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(self.initial_size)
            .with_resizable(true);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("failed to create window"),
        );

        let context =
            softbuffer::Context::new(window.clone()).expect("failed to create softbuffer context");
        let mut surface = softbuffer::Surface::new(&context, window.clone())
            .expect("failed to create softbuffer surface");

        let PhysicalSize { width, height } = window.inner_size();
        surface.resize(non_zero(width), non_zero(height)).ok();

        self.state = Some(WindowState {
            window,
            surface,
            pixel_width: width,
            pixel_height: height,
        });

        self.apply(Trigger::Resize(Size::new(width as f64, height as f64)));
        if let Some(grid) = self.grid.take() {
            // Usually throttled right after the resize; flushed from
            // about_to_wait.
            self.apply(Trigger::Grid(grid));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(state) = self.state.as_mut() {
                    state.pixel_width = width;
                    state.pixel_height = height;
                    state.surface.resize(non_zero(width), non_zero(height)).ok();
                }
                self.apply(Trigger::Resize(Size::new(width as f64, height as f64)));
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => self.render(),

            WindowEvent::KeyboardInput { event, .. } => {
                let pinned = self.engine.chrome().sidebar_pinned;
                match input::translate_keyboard(&event, self.engine.modes(), pinned) {
                    Some(Command::Quit) => event_loop.exit(),
                    Some(Command::Trigger(trigger)) => self.apply(trigger),
                    None => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let target = input::board_point(position, self.engine.board_top())
                    .and_then(|(x, y)| self.engine.hit_test(x, y))
                    .map(|t| t.id.clone());
                self.hover(target);
            }

            WindowEvent::CursorLeft { .. } => self.hover(None),

            WindowEvent::MouseInput {
                state: btn_state,
                button: MouseButton::Left,
                ..
            } => match btn_state {
                ElementState::Pressed => {
                    if let Some(id) = self.hovered.clone() {
                        self.pressed = Some(id.clone());
                        self.highlight(&id, true, true);
                    }
                }
                ElementState::Released => {
                    if let Some(id) = self.pressed.take() {
                        let over = self.hovered.as_ref() == Some(&id);
                        if over {
                            log::debug!("activated tile {id}");
                        }
                        self.highlight(&id, over, false);
                    }
                }
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let mut dirty = self
            .engine
            .redraw_if_needed(now, &mut self.canvas, &mut self.images)
            == PassOutcome::Painted;
        dirty |= self.engine.pump_images(&mut self.canvas, &mut self.images) > 0;
        if dirty {
            self.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(now + POLL_INTERVAL));
    }
}
