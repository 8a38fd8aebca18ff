//! The [`Color`] type and CSS color parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A straight-alpha RGBA colour packed into a `u32` (0xRRGGBBAA).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);
    pub const WHITE: Self = Self::from_rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// Construct an opaque colour from RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 0xFF)
    }

    /// Construct from RGBA components.
    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 24) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Alpha component.
    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Scale the RGB channels towards black by `amount` (0.0..=1.0),
    /// keeping alpha.
    pub fn darken(self, amount: f32) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * k).round() as u8;
        Self::from_rgba(scale(self.r()), scale(self.g()), scale(self.b()), self.a())
    }

    /// Parse a CSS colour: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, a named
    /// colour, `transparent`, or the `rgb()`/`rgba()`/`hsl()`/`hsla()`
    /// functions in either comma or space (`rgb(1 2 3 / 50%)`) syntax.
    pub fn parse_css(s: &str) -> Result<Self, LayoutError> {
        let s = s.trim();
        let invalid = || LayoutError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        let lower = s.to_ascii_lowercase();
        if let Some((name, rest)) = lower.split_once('(') {
            let body = rest.strip_suffix(')').ok_or_else(invalid)?;
            return parse_function(name.trim(), body).ok_or_else(invalid);
        }
        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }
        named(&lower).ok_or_else(invalid)
    }
}

// ---------------------------------------------------------------------------
// CSS syntax
// ---------------------------------------------------------------------------

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|d| d * 17);
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgb(digit(0)?, digit(1)?, digit(2)?)),
        4 => Some(Color::from_rgba(digit(0)?, digit(1)?, digit(2)?, digit(3)?)),
        6 => Some(Color::from_rgb(pair(0)?, pair(2)?, pair(4)?)),
        8 => Some(Color::from_rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => None,
    }
}

/// `body` is everything between the parentheses.
fn parse_function(name: &str, body: &str) -> Option<Color> {
    let (channels, alpha) = split_args(body)?;
    let alpha = match alpha {
        Some(a) => unit(a)?,
        None => 1.0,
    };
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    match name {
        "rgb" | "rgba" => {
            let channel = |p: &str| {
                let v = match p.strip_suffix('%') {
                    Some(pct) => pct.trim().parse::<f64>().ok()? * 2.55,
                    None => p.parse::<f64>().ok()?,
                };
                Some(v.clamp(0.0, 255.0).round() as u8)
            };
            Some(Color::from_rgba(
                channel(channels[0])?,
                channel(channels[1])?,
                channel(channels[2])?,
                a,
            ))
        }
        "hsl" | "hsla" => {
            let h = channels[0].strip_suffix("deg").unwrap_or(channels[0]);
            let h = h.trim().parse::<f64>().ok()?.rem_euclid(360.0);
            let pct = |p: &str| Some(p.strip_suffix('%')?.trim().parse::<f64>().ok()? / 100.0);
            let s = pct(channels[1])?.clamp(0.0, 1.0);
            let l = pct(channels[2])?.clamp(0.0, 1.0);
            let [r, g, b] = hsl_to_rgb(h, s, l).map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8);
            Some(Color::from_rgba(r, g, b, a))
        }
        _ => None,
    }
}

/// Three colour arguments plus an optional alpha, in comma or space syntax.
fn split_args(body: &str) -> Option<([&str; 3], Option<&str>)> {
    let (parts, alpha): (Vec<&str>, Option<&str>) = if body.contains(',') {
        let mut parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let alpha = if parts.len() == 4 { parts.pop() } else { None };
        (parts, alpha)
    } else {
        let (colour, alpha) = match body.split_once('/') {
            Some((c, a)) => (c, Some(a.trim())),
            None => (body, None),
        };
        (colour.split_whitespace().collect(), alpha)
    };
    match parts.as_slice() {
        [a, b, c] => Some(([*a, *b, *c], alpha)),
        _ => None,
    }
}

/// A number in 0..=1 or a percentage.
fn unit(s: &str) -> Option<f64> {
    match s.strip_suffix('%') {
        Some(pct) => Some(pct.trim().parse::<f64>().ok()? / 100.0),
        None => s.parse::<f64>().ok(),
    }
}

/// Hue in degrees, saturation and lightness in 0..=1; RGB in 0..=1.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r1, g1, b1) = if h_prime < 1.0 {
        (c, x, 0.0)
    } else if h_prime < 2.0 {
        (x, c, 0.0)
    } else if h_prime < 3.0 {
        (0.0, c, x)
    } else if h_prime < 4.0 {
        (0.0, x, c)
    } else if h_prime < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    let m = l - c / 2.0;
    [r1 + m, g1 + m, b1 + m]
}

fn named(name: &str) -> Option<Color> {
    let i = NAMED.binary_search_by(|(n, _)| n.cmp(&name)).ok()?;
    let rgb = NAMED[i].1;
    Some(Color((rgb << 8) | 0xFF))
}

/// CSS named colours as 0xRRGGBB, sorted by name.
const NAMED: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF),
    ("antiquewhite", 0xFAEBD7),
    ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF),
    ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4),
    ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF),
    ("blueviolet", 0x8A2BE2),
    ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887),
    ("cadetblue", 0x5F9EA0),
    ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50),
    ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkcyan", 0x008B8B),
    ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F),
    ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F),
    ("darkslategrey", 0x2F4F4F),
    ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493),
    ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0),
    ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC),
    ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xADFF2F),
    ("grey", 0x808080),
    ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4),
    ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5),
    ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD),
    ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF),
    ("lightgoldenrodyellow", 0xFAFAD2),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0),
    ("lime", 0x00FF00),
    ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6),
    ("magenta", 0xFF00FF),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A),
    ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA),
    ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD),
    ("navy", 0x000080),
    ("oldlace", 0xFDF5E6),
    ("olive", 0x808000),
    ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA),
    ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5),
    ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F),
    ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F),
    ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072),
    ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57),
    ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];

impl FromStr for Color {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_css(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a() == 0xFF {
            write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r(),
                self.g(),
                self.b(),
                self.a()
            )
        }
    }
}
