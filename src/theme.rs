//! Built-in gradients, glyph styles and themes.
//!
//! Lookups are by exact name. An unknown name is always an error listing the
//! valid names; nothing falls back silently to a default.

use crate::error::{Error, Result};
use crate::style::Style;
use once_cell::sync::Lazy;

/// Eighth-block glyphs from 1/8 to 8/8, used for the boundary cell.
pub const PARTIAL_BLOCKS: [char; 8] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Fill/empty pair used when colors are unavailable.
pub const ASCII_CHARS: (char, char) = ('#', '-');

/// Named fill/empty glyph pairs.
pub const CHAR_STYLES: &[(&str, (char, char))] = &[
    ("blocks", ('█', '░')),
    ("dots", ('●', '○')),
    ("arrows", ('▶', '▷')),
    ("lines", ('━', '─')),
    ("squares", ('■', '□')),
    ("circles", ('◉', '◯')),
    ("ascii", ASCII_CHARS),
    ("equals", ('=', ' ')),
];

/// Named start/end gradient pairs.
pub const GRADIENT_PRESETS: &[(&str, (&str, &str))] = &[
    ("purple_pink", ("#5A56E0", "#EE6FF8")),
    ("fire", ("#ff0000", "#ffff00")),
    ("ocean", ("#0066cc", "#00cccc")),
    ("forest", ("#228b22", "#90ee90")),
    ("sunset", ("#ff4500", "#ffd700")),
    ("monochrome", ("#000000", "#ffffff")),
    ("matrix", ("#003300", "#00ff00")),
    ("neon", ("#ff00ff", "#00ffff")),
    ("ice", ("#00ffff", "#ffffff")),
    ("lava", ("#8B0000", "#FF4500")),
];

/// A named bundle of visual configuration.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Registry key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// The style a bar built from this theme starts with.
    pub style: Style,
}

fn theme(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    style: Style,
) -> Theme {
    Theme {
        key,
        name,
        description,
        style,
    }
}

fn gradient_style(start: &str, end: &str, background: &str, scaled: bool) -> Style {
    Style {
        start_color: start.to_string(),
        end_color: end.to_string(),
        background_color: background.to_string(),
        use_gradient: true,
        scale_gradient: scaled,
        ..Style::default()
    }
}

/// Built-in themes, in registry order.
pub static THEMES: Lazy<Vec<Theme>> = Lazy::new(|| {
    vec![
        theme(
            "default",
            "Default",
            "Red to white gradient",
            gradient_style("#ff3333", "#ffffff", "#1a1a1a", false),
        ),
        theme(
            "matrix",
            "Matrix",
            "Green terminal aesthetic",
            gradient_style("#003300", "#00ff00", "#000000", false),
        ),
        theme(
            "neon",
            "Neon",
            "Synthwave vibes",
            gradient_style("#ff00ff", "#00ffff", "#0a0a0a", true),
        ),
        theme(
            "fire",
            "Fire",
            "Burning progress",
            gradient_style("#8B0000", "#FFD700", "#1a0000", true),
        ),
        theme(
            "ocean",
            "Ocean",
            "Deep blue sea",
            gradient_style("#0066cc", "#00ffff", "#001a33", false),
        ),
        theme(
            "minimal",
            "Minimal",
            "Clean and simple",
            Style {
                start_color: "#ffffff".to_string(),
                end_color: "#ffffff".to_string(),
                background_color: "#333333".to_string(),
                show_percentage: false,
                ..Style::default()
            },
        ),
    ]
});

/// Looks up a theme by key.
///
/// # Errors
///
/// [`Error::UnknownPresetName`] when `name` is not a theme key.
pub fn find_theme(name: &str) -> Result<&'static Theme> {
    THEMES
        .iter()
        .find(|t| t.key == name)
        .ok_or_else(|| Error::unknown_preset("theme", name, THEMES.iter().map(|t| t.key)))
}

/// Looks up a gradient preset, returning `(start, end)` colors.
///
/// # Errors
///
/// [`Error::UnknownPresetName`] when `name` is not a gradient preset.
pub fn find_gradient(name: &str) -> Result<(&'static str, &'static str)> {
    lookup(GRADIENT_PRESETS, "gradient preset", name)
}

/// Looks up a glyph style, returning `(full, empty)` characters.
///
/// # Errors
///
/// [`Error::UnknownPresetName`] when `name` is not a glyph style.
pub fn find_char_style(name: &str) -> Result<(char, char)> {
    lookup(CHAR_STYLES, "style preset", name)
}

fn lookup<T: Copy>(table: &[(&'static str, T)], kind: &'static str, name: &str) -> Result<T> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| Error::unknown_preset(kind, name, table.iter().map(|(key, _)| *key)))
}
