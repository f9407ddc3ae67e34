//! Hex parsing and color interpolation for gradient fills.
//!
//! Gradients are computed here rather than through lipgloss blending so that
//! the same arithmetic drives both the styled output and the structured
//! [`Cell`](crate::render::Cell) view of a bar.
//!
//! ```rust
//! use bubbletea_progress::color::{hex_to_rgb, interpolate_perceptual, rgb_to_hex};
//!
//! let red = hex_to_rgb("#ff0000").unwrap();
//! let green = hex_to_rgb("0f0").unwrap();
//! let mid = interpolate_perceptual(red, green, 0.5);
//! assert_eq!(rgb_to_hex(mid).len(), 7);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    fn from_channels(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rgb_to_hex(*self))
    }
}

/// Terminal color capability levels.
///
/// Only [`ColorProfile::Ascii`] changes rendering here: it suppresses every
/// color and swaps the glyphs for a plain ASCII pair. Richer profiles are
/// handed to lipgloss as-is. Detecting the profile is the host's job.
///
/// Persisted as its integer value (`0..=3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ColorProfile {
    /// No colors at all.
    Ascii = 0,
    /// 16 colors.
    Ansi = 1,
    /// 256 colors.
    Ansi256 = 2,
    /// 24-bit color.
    #[default]
    TrueColor = 3,
}

impl From<ColorProfile> for u8 {
    fn from(profile: ColorProfile) -> u8 {
        profile as u8
    }
}

impl TryFrom<u8> for ColorProfile {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ColorProfile::Ascii),
            1 => Ok(ColorProfile::Ansi),
            2 => Ok(ColorProfile::Ansi256),
            3 => Ok(ColorProfile::TrueColor),
            other => Err(format!("invalid color profile {other}, expected 0-3")),
        }
    }
}

/// Clamps a float into `[0.0, 1.0]`. NaN maps to `0.0`.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Parses `#RGB` or `#RRGGBB` (the `#` is optional, case-insensitive).
///
/// # Errors
///
/// Returns [`Error::InvalidColorFormat`] when the input is not 3 or 6 hex
/// digits after trimming whitespace and the leading `#`.
pub fn hex_to_rgb(color: &str) -> Result<Rgb> {
    let trimmed = color.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(Error::InvalidColorFormat(color.to_string())),
    };
    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColorFormat(color.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|_| Error::InvalidColorFormat(color.to_string()))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Formats a color as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Per-channel linear blend between two colors; `t` is clamped to `[0, 1]`.
pub fn interpolate_linear(start: Rgb, end: Rgb, t: f64) -> Rgb {
    let t = clamp01(t);
    let (s, e) = (start.channels(), end.channels());
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = s[i] as f64 + (e[i] as f64 - s[i] as f64) * t;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    Rgb::from_channels(out)
}

/// Blends two colors in linear-light space and re-encodes the result as sRGB.
///
/// Avoids the dark "muddy middle" that direct sRGB blending produces across
/// a long two-color gradient.
pub fn interpolate_perceptual(start: Rgb, end: Rgb, t: f64) -> Rgb {
    let t = clamp01(t);
    let (s, e) = (start.channels(), end.channels());
    let mut out = [0u8; 3];
    for i in 0..3 {
        let (a, b) = (gamma_expand(s[i]), gamma_expand(e[i]));
        out[i] = gamma_compress(a + (b - a) * t);
    }
    Rgb::from_channels(out)
}

fn gamma_expand(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn gamma_compress(linear: f64) -> u8 {
    let c = if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}
