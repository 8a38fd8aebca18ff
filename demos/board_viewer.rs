//! Show a board JSON file in a window.
//!
//! Run: cargo run --bin board-viewer -- demos/boards/snacks.json [font.ttf]
//!
//! Image URLs in the board resolve relative to the board file. Keys: `e`
//! edit mode, `s` speak mode, `p` pin sidebar, `r` refresh, Escape quits.

use std::path::{Path, PathBuf};

use symboard_core::{BoardData, GridModel, RawPreferences};
use symboard_winit::{BoardViewer, EngineConfig, ViewerConfig};

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(board_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: board-viewer <board.json> [font.ttf]");
        std::process::exit(2);
    };
    let font_path = args.next();

    if let Err(e) = run(&board_path, font_path.as_deref().map(Path::new)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(board_path: &Path, font_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let board: BoardData = serde_json::from_slice(&std::fs::read(board_path)?)?;
    let grid = GridModel::from_board(&board)?;
    let font_data = font_path.map(std::fs::read).transpose()?;

    let mut engine = EngineConfig::default();
    engine.chrome.has_description = board.description.is_some();

    let viewer = BoardViewer::new(
        ViewerConfig {
            title: board.name.clone().unwrap_or_else(|| "symboard".into()),
            font_data,
            preferences: RawPreferences {
                button_spacing: Some("medium".into()),
                button_border: Some("medium".into()),
                stretch_buttons: Some("prefer_tall".into()),
                ..Default::default()
            },
            image_root: board_path.parent().map(Path::to_path_buf),
            engine,
            ..Default::default()
        },
        grid,
    );
    viewer.run()
}
