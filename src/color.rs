//! RGBA colors and highlight compositing.
//!
//! Channels are stored as `i32` so that highlight colors may carry negative
//! components (to darken a square). [`Color::combine`] adds channel-wise and
//! clamps the result into `[0, 255]`, so whatever comes out is always a
//! displayable color.

use std::fmt;
use std::str::FromStr;

use crate::constants::{CHANNEL_MAX, CHANNEL_MIN};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Color {
    pub const fn rgba(r: i32, g: i32, b: i32, a: i32) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: i32, g: i32, b: i32) -> Self {
        Color::rgba(r, g, b, CHANNEL_MAX)
    }

    /// Channel-wise sum of `self` and `other`, each channel clamped to `[0, 255]`.
    pub fn combine(self, other: Color) -> Color {
        Color {
            r: clamp_channel(self.r.saturating_add(other.r)),
            g: clamp_channel(self.g.saturating_add(other.g)),
            b: clamp_channel(self.b.saturating_add(other.b)),
            a: clamp_channel(self.a.saturating_add(other.a)),
        }
    }

    /// The color as bytes, for renderers that want `[r, g, b, a]`.
    /// Out-of-range channels are clamped.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| clamp_channel(c) as u8)
    }
}

#[inline]
fn clamp_channel(v: i32) -> i32 {
    v.clamp(CHANNEL_MIN, CHANNEL_MAX)
}

/// Named colors accepted by [`Color::from_str`].
const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("gray", Color::rgb(128, 128, 128)),
    ("transparent", Color::rgba(0, 0, 0, 0)),
];

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}'", self.0)
    }
}

impl std::error::Error for ParseColorError {}

/// Parses a named color (`"red"`), `#rrggbb`, or `#rrggbbaa`.
impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseColorError(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map(i32::from)
                    .map_err(|_| err())
            };
            let a = if hex.len() == 8 { channel(6)? } else { CHANNEL_MAX };
            return Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a));
        }

        let lower = s.to_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
            .ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_clamps_upper() {
        let a = Color::rgba(200, 10, 0, 255);
        let b = Color::rgba(100, 20, 0, 255);
        assert_eq!(a.combine(b), Color::rgba(255, 30, 0, 255));
    }

    #[test]
    fn test_combine_per_channel_min() {
        let a = Color::rgba(12, 250, 128, 3);
        let b = Color::rgba(40, 9, 127, 250);
        let c = a.combine(b);
        assert_eq!(c.r, (a.r + b.r).min(255));
        assert_eq!(c.g, (a.g + b.g).min(255));
        assert_eq!(c.b, (a.b + b.b).min(255));
        assert_eq!(c.a, (a.a + b.a).min(255));
    }

    #[test]
    fn test_combine_commutative() {
        let a = Color::rgba(90, 200, 0, 10);
        let b = Color::rgba(180, 1, 7, 240);
        assert_eq!(a.combine(b), b.combine(a));
    }

    #[test]
    fn test_combine_floors_negative() {
        let darken = Color::rgba(-100, -100, -100, 0);
        let square = Color::rgb(50, 150, 255);
        assert_eq!(darken.combine(square), Color::rgba(0, 50, 155, 255));
    }

    #[test]
    fn test_combine_extreme_channels() {
        let huge = Color::rgba(i32::MAX, i32::MAX, 0, i32::MAX);
        let tiny = Color::rgba(i32::MIN, 0, i32::MIN, i32::MIN);
        assert_eq!(huge.combine(Color::rgb(1, 0, 0)), Color::rgba(255, 255, 0, 255));
        assert_eq!(huge.combine(huge), Color::rgba(255, 255, 0, 255));
        assert_eq!(tiny.combine(Color::rgba(-1, 0, -1, -1)), Color::rgba(0, 0, 0, 0));
        assert_eq!(tiny.combine(tiny), Color::rgba(0, 0, 0, 0));
        assert_eq!(huge.combine(tiny), Color::rgba(0, 255, 0, 0));
    }

    #[test]
    fn test_combine_leaves_inputs() {
        let a = Color::rgb(1, 2, 3);
        let b = Color::rgb(4, 5, 6);
        let _ = a.combine(b);
        assert_eq!(a, Color::rgb(1, 2, 3));
        assert_eq!(b, Color::rgb(4, 5, 6));
    }

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!("red".parse::<Color>(), Ok(Color::rgb(255, 0, 0)));
        assert_eq!("Blue".parse::<Color>(), Ok(Color::rgb(0, 0, 255)));
        assert_eq!("#102030".parse::<Color>(), Ok(Color::rgb(16, 32, 48)));
        assert_eq!(
            "#10203040".parse::<Color>(),
            Ok(Color::rgba(16, 32, 48, 64))
        );
        assert!("#12".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("mauve".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Color::rgba(255, 0, 16, 128).to_string(), "#ff001080");
        assert_eq!(Color::rgba(-5, 300, 0, 0).to_rgba8(), [0, 255, 0, 0]);
    }
}
