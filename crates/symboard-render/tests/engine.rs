//! End-to-end: board JSON through the engine onto a recording surface, with
//! image loads completed by hand.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use symboard_core::{BoardData, Chrome, Color, GridModel, RawPreferences, Size, TileId};
use symboard_render::paint::TileFrame;
use symboard_render::{
    Bitmap, Completion, EngineConfig, ImageSource, LayoutEngine, PaintOp, PassOutcome,
    RecordingSurface, Surface, TileImages, Trigger,
};

/// Records fetches and completes them only when told to.
#[derive(Clone, Default)]
struct ManualSource {
    pending: Rc<RefCell<Vec<Completion>>>,
    fetched: Rc<RefCell<Vec<String>>>,
}

impl ImageSource for ManualSource {
    fn fetch(&self, url: &str, done: Completion) {
        self.fetched.borrow_mut().push(url.to_string());
        self.pending.borrow_mut().push(done);
    }
}

impl ManualSource {
    fn take(&self) -> Vec<Completion> {
        self.pending.borrow_mut().drain(..).collect()
    }
}

fn complete(batch: Vec<Completion>) {
    for c in batch {
        c.complete(Ok(Bitmap::solid(4, 4, Color::from_rgb(9, 9, 9))));
    }
}

const BOARD: &str = r##"{
    "name": "Snacks",
    "grid": { "rows": 2, "columns": 3, "order": [[1, 2, 3], [4, null, 5]] },
    "buttons": [
        { "id": 1, "label": "apple", "image_url": "apple.png" },
        { "id": 2, "label": "more", "image_url": "plus.png", "action_image": "go.png" },
        { "id": 3, "label": "again", "image_url": "apple.png" },
        { "id": 4, "label": "hello", "talk_action": true, "action_image": "go.png" },
        { "id": 5, "label": "secret", "hidden": true, "image_url": "x.png" }
    ]
}"##;

struct Harness {
    engine: LayoutEngine,
    surface: RecordingSurface,
    images: TileImages,
    source: ManualSource,
    t0: Instant,
}

impl Harness {
    fn new() -> Self {
        let board: BoardData = serde_json::from_str(BOARD).unwrap();
        let grid = GridModel::from_board(&board).unwrap();
        let source = ManualSource::default();
        let config = EngineConfig {
            chrome: Chrome {
                header_height: 45.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let raw = RawPreferences {
            button_spacing: Some("medium".into()),
            button_border: Some("medium".into()),
            ..Default::default()
        };
        let mut h = Self {
            engine: LayoutEngine::new(config, raw),
            surface: RecordingSurface::new(0, 0),
            images: TileImages::new(source.clone()),
            source,
            t0: Instant::now(),
        };
        h.engine.recompute(
            Trigger::Resize(Size::new(900.0, 650.0)),
            h.t0,
            &mut h.surface,
            &mut h.images,
        );
        h.engine.recompute(
            Trigger::Grid(grid),
            h.t0,
            &mut h.surface,
            &mut h.images,
        );
        h.engine
            .redraw_if_needed(h.t0 + Duration::from_millis(100), &mut h.surface, &mut h.images);
        h
    }

    fn at(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }
}

#[test]
fn board_lays_out_into_container() {
    let h = Harness::new();
    assert_eq!(h.engine.container(), Size::new(900.0, 600.0));
    assert_eq!(h.surface.size(), (2700, 1800));
    let apple = h.engine.grid().find(&TileId::from("1")).unwrap();
    let g = apple.geometry.unwrap();
    assert_eq!((g.top, g.left, g.width), (12.0, 12.0, 280.0));
}

#[test]
fn one_load_per_url_and_hidden_tiles_skip() {
    let h = Harness::new();
    let mut fetched = h.source.fetched.borrow().clone();
    fetched.sort();
    // apple.png shared by two tiles; hello's icon suppressed; secret hidden.
    assert_eq!(fetched, vec!["apple.png", "go.png", "plus.png"]);
}

#[test]
fn images_from_current_generation_paint() {
    let mut h = Harness::new();
    complete(h.source.take());
    h.surface.take_ops();
    let painted = h.engine.pump_images(&mut h.surface, &mut h.images);
    // apple x2, plus, go; then go again after plus lands.
    assert_eq!(painted, 4);
    assert_eq!(h.surface.images().count(), 5);
}

#[test]
fn superseded_pass_does_not_paint() {
    let mut h = Harness::new();
    let first = h.source.take();
    let before = h.engine.generation();
    let apple = TileId::from("1");
    let old_rect = symbol_rect(&h.engine, &apple);

    let out = h.engine.recompute(
        Trigger::Resize(Size::new(1000.0, 700.0)),
        h.at(300),
        &mut h.surface,
        &mut h.images,
    );
    assert_eq!(out, PassOutcome::Painted);
    assert_eq!(h.engine.generation().value(), before.value() + 1);
    // The new pass attached to the loads already in flight.
    assert_eq!(h.source.fetched.borrow().len(), 3);

    complete(first);
    h.surface.take_ops();
    assert_eq!(h.engine.pump_images(&mut h.surface, &mut h.images), 4);
    let new_rect = symbol_rect(&h.engine, &apple);
    assert_ne!(old_rect, new_rect);
    assert!(h.surface.images().any(|r| r == new_rect));
    assert!(h.surface.images().all(|r| r != old_rect));
}

fn symbol_rect(engine: &LayoutEngine, id: &TileId) -> kurbo::Rect {
    let g = engine.grid().find(id).and_then(|t| t.geometry).unwrap();
    TileFrame::new(&g).image
}

#[test]
fn stale_only_completions_are_dropped() {
    let mut h = Harness::new();
    let first = h.source.take();

    // Replace the board while the old loads are outstanding.
    let board: BoardData = serde_json::from_str(
        r##"{ "grid": { "rows": 1, "columns": 1, "order": [[7]] },
              "buttons": [{ "id": 7, "label": "new", "image_url": "new.png" }] }"##,
    )
    .unwrap();
    let grid = GridModel::from_board(&board).unwrap();
    h.engine
        .recompute(Trigger::Grid(grid), h.at(300), &mut h.surface, &mut h.images);

    complete(first);
    h.surface.take_ops();
    assert_eq!(h.engine.pump_images(&mut h.surface, &mut h.images), 0);
    assert_eq!(h.surface.images().count(), 0);
}

#[test]
fn throttled_full_pass_keeps_generation() {
    let mut h = Harness::new();
    let before = h.engine.generation();
    let out = h.engine.recompute(
        Trigger::SidebarPinned(true),
        h.at(150),
        &mut h.surface,
        &mut h.images,
    );
    assert_eq!(out, PassOutcome::Throttled);
    assert_eq!(h.engine.generation(), before);
    assert_eq!(h.engine.container().width, 800.0);

    let out = h.engine.recompute(Trigger::Force, h.at(150), &mut h.surface, &mut h.images);
    assert_eq!(out, PassOutcome::Painted);
    assert_eq!(h.engine.generation().value(), before.value() + 1);
}

#[test]
fn hover_repaint_is_targeted() {
    let mut h = Harness::new();
    let before = h.engine.generation();
    let id = TileId::from("2");
    h.engine.set_highlight(&id, true, false).unwrap();
    h.surface.take_ops();
    h.engine
        .repaint_tile(&id, &mut h.surface, &mut h.images)
        .unwrap();
    assert_eq!(h.engine.generation(), before);
    let clears = h
        .surface
        .ops()
        .iter()
        .filter(|op| matches!(op, PaintOp::Clear(_)))
        .count();
    let bodies = h
        .surface
        .ops()
        .iter()
        .filter(|op| matches!(op, PaintOp::Path { .. }))
        .count();
    assert_eq!((clears, bodies), (1, 1));
}
