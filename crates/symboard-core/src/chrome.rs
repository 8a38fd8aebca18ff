//! Deriving the board container from the viewport and the UI around it.

use crate::geom::Size;
use crate::prefs::{TextPosition, TextSize};

/// Width taken by a pinned sidebar.
pub const SIDEBAR_WIDTH: f64 = 100.0;
/// Height of the setup footer.
pub const FOOTER_HEIGHT: f64 = 56.0;
/// Height of the board description line.
pub const DESCRIPTION_HEIGHT: f64 = 30.0;
/// Base height of the word-suggestion bar.
pub const SUGGESTION_BAR_HEIGHT: f64 = 55.0;
/// Extra height when word suggestions carry images.
pub const SUGGESTION_IMAGE_HEIGHT: f64 = 50.0;

/// Application mode flags that affect layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Modes {
    pub edit: bool,
    pub speak: bool,
}

/// UI elements surrounding the board.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Chrome {
    /// Height of the application header.
    pub header_height: f64,
    pub sidebar_pinned: bool,
    pub footer: bool,
    /// Whether the board has a description line to show.
    pub has_description: bool,
    /// Whether the board offers word suggestions.
    pub word_suggestions: bool,
    /// Whether word suggestions are shown with images.
    pub word_suggestion_images: bool,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            header_height: 70.0,
            sidebar_pinned: false,
            footer: false,
            has_description: false,
            word_suggestions: false,
            word_suggestion_images: true,
        }
    }
}

impl Chrome {
    /// Whether the word-suggestion bar is showing.
    pub fn shows_suggestions(&self, modes: Modes) -> bool {
        self.word_suggestions && modes.speak
    }

    /// The description line is hidden while editing or speaking.
    pub fn shows_description(&self, modes: Modes) -> bool {
        self.has_description && !modes.edit && !modes.speak
    }

    /// Distance from the top of the viewport to the board.
    pub fn board_top(&self, modes: Modes, text_size: TextSize, text_position: TextPosition) -> f64 {
        let mut top = self.header_height + 5.0;
        if self.shows_suggestions(modes) {
            top += SUGGESTION_BAR_HEIGHT;
            top += match text_size {
                TextSize::Small => -4.0,
                TextSize::Large => 4.0,
                TextSize::Huge => 17.0,
                _ => 0.0,
            };
            if self.word_suggestion_images && text_position != TextPosition::TextOnly {
                top += SUGGESTION_IMAGE_HEIGHT;
            }
        }
        if self.shows_description(modes) {
            top += DESCRIPTION_HEIGHT;
        }
        top
    }

    /// Space left for the board inside `viewport`.
    pub fn container_size(
        &self,
        viewport: Size,
        modes: Modes,
        text_size: TextSize,
        text_position: TextPosition,
    ) -> Size {
        let mut width = viewport.width;
        if self.sidebar_pinned {
            width -= SIDEBAR_WIDTH;
        }
        let top = self.board_top(modes, text_size, text_position);
        let mut height = viewport.height;
        if self.footer {
            height -= FOOTER_HEIGHT;
        }
        Size::new(width.max(0.0), (height - top).max(0.0))
    }
}
