//! Raw preference strings and their resolution into [`LayoutPreferences`].
//!
//! Resolution is a pure function of the raw strings and the viewport width:
//! narrow viewports force tighter spacing, borders and text regardless of
//! what the user picked.

/// Viewports narrower than this get the tightest spacing, border and text.
pub const NARROW_VIEWPORT: f64 = 600.0;
/// Viewports narrower than this get reduced spacing, border and text.
pub const COMPACT_VIEWPORT: f64 = 750.0;

/// Unresolved device/user preferences, exactly as stored.
///
/// Missing values fall through to the defaults of each ladder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawPreferences {
    pub button_spacing: Option<String>,
    pub button_border: Option<String>,
    pub button_text: Option<String>,
    pub button_text_position: Option<String>,
    pub stretch_buttons: Option<String>,
}

impl RawPreferences {
    fn spacing(&self) -> &str {
        self.button_spacing.as_deref().unwrap_or("")
    }

    fn border(&self) -> &str {
        self.button_border.as_deref().unwrap_or("")
    }

    fn text(&self) -> &str {
        self.button_text.as_deref().unwrap_or("")
    }

    fn text_position(&self) -> &str {
        self.button_text_position.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Label text size bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextSize {
    None,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
}

impl TextSize {
    /// Base text height in logical pixels.
    pub fn height(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Small => 14.0,
            Self::Medium => 18.0,
            Self::Large => 22.0,
            Self::Huge => 35.0,
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "none" => Self::None,
            "small" => Self::Small,
            "large" => Self::Large,
            "huge" => Self::Huge,
            _ => Self::Medium,
        }
    }
}

/// Where the label sits relative to the symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextPosition {
    Top,
    #[default]
    Bottom,
    TextOnly,
    None,
}

impl TextPosition {
    fn parse(s: &str) -> Self {
        match s {
            "top" => Self::Top,
            "text_only" => Self::TextOnly,
            "none" => Self::None,
            _ => Self::Bottom,
        }
    }
}

/// Policy for growing tiles into empty or hidden neighbours.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum StretchMode {
    #[default]
    None,
    /// Vertical growth is allowed without diagonal support.
    PreferTall,
    /// Horizontal growth is allowed without diagonal support.
    PreferWide,
    /// Grow on any axis, but only with diagonal support.
    Even,
}

impl StretchMode {
    /// Any non-empty value other than the named modes means [`Even`](Self::Even).
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            None | Some("") | Some("none") | Some("false") => Self::None,
            Some("prefer_tall") => Self::PreferTall,
            Some("prefer_wide") => Self::PreferWide,
            Some(_) => Self::Even,
        }
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }
}

// ---------------------------------------------------------------------------
// LayoutPreferences
// ---------------------------------------------------------------------------

/// Resolved scalar layout configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutPreferences {
    /// Outer spacing around each tile.
    pub padding: f64,
    /// Inner border padding.
    pub inner_pad: f64,
    pub text_size: TextSize,
    pub text_position: TextPosition,
    pub stretch: StretchMode,
}

impl Default for LayoutPreferences {
    fn default() -> Self {
        Self::resolve(&RawPreferences::default(), f64::INFINITY)
    }
}

impl LayoutPreferences {
    /// Resolve raw preference strings against the current viewport width.
    pub fn resolve(raw: &RawPreferences, viewport_width: f64) -> Self {
        let text_position = TextPosition::parse(raw.text_position());
        Self {
            padding: resolve_padding(raw.spacing(), viewport_width),
            inner_pad: resolve_inner_pad(raw.border(), viewport_width),
            text_size: resolve_text_size(raw.text(), text_position, viewport_width),
            text_position,
            stretch: StretchMode::parse(raw.stretch_buttons.as_deref()),
        }
    }

    /// Base text height in logical pixels.
    #[inline]
    pub fn text_height(&self) -> f64 {
        self.text_size.height()
    }

    /// Height reserved for the label band inside a tile.
    #[inline]
    pub fn label_height(&self) -> f64 {
        (self.text_height() - 3.0).max(0.0)
    }
}

fn resolve_padding(spacing: &str, viewport_width: f64) -> f64 {
    if spacing == "none" {
        0.0
    } else if spacing == "minimal" || viewport_width < NARROW_VIEWPORT {
        1.0
    } else if spacing == "extra-small" || viewport_width < COMPACT_VIEWPORT {
        2.0
    } else {
        match spacing {
            "medium" => 10.0,
            "large" => 20.0,
            "huge" => 45.0,
            _ => 5.0,
        }
    }
}

fn resolve_inner_pad(border: &str, viewport_width: f64) -> f64 {
    if border == "none" {
        0.0
    } else if viewport_width < NARROW_VIEWPORT {
        1.0
    } else if border == "medium" || viewport_width < COMPACT_VIEWPORT {
        2.0
    } else {
        match border {
            "large" => 5.0,
            "huge" => 10.0,
            _ => 1.0,
        }
    }
}

/// `small` wins over a `none` position; any other size is dropped by it.
fn resolve_text_size(text: &str, position: TextPosition, viewport_width: f64) -> TextSize {
    let size = match TextSize::parse(text) {
        TextSize::Small => TextSize::Small,
        _ if position == TextPosition::None => TextSize::None,
        other => other,
    };
    match size {
        TextSize::None => TextSize::None,
        _ if viewport_width < NARROW_VIEWPORT => TextSize::Small,
        TextSize::Small => TextSize::Small,
        _ if viewport_width < COMPACT_VIEWPORT => TextSize::Medium,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(spacing: &str, border: &str, text: &str) -> RawPreferences {
        RawPreferences {
            button_spacing: Some(spacing.into()),
            button_border: Some(border.into()),
            button_text: Some(text.into()),
            ..Default::default()
        }
    }

    #[test]
    fn spacing_ladder_on_wide_viewport() {
        let cases = [
            ("none", 0.0),
            ("minimal", 1.0),
            ("extra-small", 2.0),
            ("medium", 10.0),
            ("large", 20.0),
            ("huge", 45.0),
            ("", 5.0),
        ];
        for (spacing, expected) in cases {
            let p = LayoutPreferences::resolve(&raw(spacing, "", ""), 1024.0);
            assert_eq!(p.padding, expected, "spacing {spacing:?}");
        }
    }

    #[test]
    fn narrow_viewports_clamp_spacing() {
        assert_eq!(LayoutPreferences::resolve(&raw("huge", "", ""), 599.0).padding, 1.0);
        assert_eq!(LayoutPreferences::resolve(&raw("huge", "", ""), 700.0).padding, 2.0);
        assert_eq!(LayoutPreferences::resolve(&raw("none", "", ""), 300.0).padding, 0.0);
    }

    #[test]
    fn border_ladder() {
        let pad = |border: &str, vw: f64| LayoutPreferences::resolve(&raw("", border, ""), vw).inner_pad;
        assert_eq!(pad("none", 300.0), 0.0);
        assert_eq!(pad("huge", 500.0), 1.0);
        assert_eq!(pad("huge", 700.0), 2.0);
        assert_eq!(pad("medium", 1024.0), 2.0);
        assert_eq!(pad("large", 1024.0), 5.0);
        assert_eq!(pad("huge", 1024.0), 10.0);
        assert_eq!(pad("", 1024.0), 1.0);
    }

    #[test]
    fn text_ladder_and_clamping() {
        let size = |text: &str, vw: f64| LayoutPreferences::resolve(&raw("", "", text), vw).text_size;
        assert_eq!(size("small", 1024.0).height(), 14.0);
        assert_eq!(size("large", 1024.0).height(), 22.0);
        assert_eq!(size("huge", 1024.0).height(), 35.0);
        assert_eq!(size("", 1024.0).height(), 18.0);
        assert_eq!(size("none", 1024.0).height(), 0.0);
        assert_eq!(size("huge", 500.0), TextSize::Small);
        assert_eq!(size("huge", 700.0), TextSize::Medium);
        assert_eq!(size("small", 700.0), TextSize::Small);
        assert_eq!(size("none", 500.0), TextSize::None);
    }

    #[test]
    fn text_position_none_removes_text() {
        let mut r = raw("", "", "large");
        r.button_text_position = Some("none".into());
        let p = LayoutPreferences::resolve(&r, 1024.0);
        assert_eq!(p.text_size, TextSize::None);
        assert_eq!(p.label_height(), 0.0);
        assert_eq!(p.text_position, TextPosition::None);
    }

    #[test]
    fn small_text_survives_position_none() {
        let mut r = raw("", "", "small");
        r.button_text_position = Some("none".into());
        let p = LayoutPreferences::resolve(&r, 1024.0);
        assert_eq!(p.text_size, TextSize::Small);
        assert_eq!(p.text_height(), 14.0);
        assert_eq!(p.text_position, TextPosition::None);
    }

    #[test]
    fn stretch_parsing() {
        assert_eq!(StretchMode::parse(None), StretchMode::None);
        assert_eq!(StretchMode::parse(Some("none")), StretchMode::None);
        assert_eq!(StretchMode::parse(Some("prefer_tall")), StretchMode::PreferTall);
        assert_eq!(StretchMode::parse(Some("prefer_wide")), StretchMode::PreferWide);
        assert_eq!(StretchMode::parse(Some("on")), StretchMode::Even);
    }

    #[test]
    fn resolution_is_deterministic() {
        let r = raw("large", "huge", "small");
        assert_eq!(
            LayoutPreferences::resolve(&r, 900.0),
            LayoutPreferences::resolve(&r, 900.0)
        );
    }
}
