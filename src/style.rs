//! Visual configuration shared by the renderer and the animated bar.

use crate::color::{hex_to_rgb, ColorProfile};
use crate::error::Result;
use crate::theme::ASCII_CHARS;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Custom percentage formatter: takes the clamped progress fraction and
/// returns the suffix text, including any leading space.
pub type PercentFormatter = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Visual configuration for a progress bar.
///
/// `Style` is plain data. Every bar owns its own copy, so changing one bar's
/// style never affects another bar built from the same theme.
///
/// It serializes to JSON with `percent_formatter` always written as `null`
/// and ignored on load; everything else round-trips exactly. Missing fields
/// take their [`Default`] values.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Gradient start color, or the fill color when not using a gradient.
    pub start_color: String,
    /// Gradient end color.
    pub end_color: String,
    /// Color of the empty cells.
    pub background_color: String,

    /// Color of the percentage text (rendered bold).
    pub label_color: String,
    /// Color of the hint text (rendered faint).
    pub muted_label_color: String,
    /// Whether to append the percentage suffix.
    pub show_percentage: bool,
    /// Replaces the default ` NNN%` suffix. Not persisted.
    #[serde(serialize_with = "serialize_formatter", skip_deserializing)]
    pub percent_formatter: Option<PercentFormatter>,

    /// Trailing hint such as "Processing...".
    pub hint: Option<String>,

    /// Upper bound on the rendered line width, in columns.
    pub max_width: usize,
    /// Spaces on each side of the bar.
    pub horizontal_padding: usize,

    /// Color filled cells along a start→end gradient.
    pub use_gradient: bool,
    /// Fit the gradient to the filled cells rather than the whole bar.
    pub scale_gradient: bool,
    /// Blend gradient colors in linear light.
    pub perceptual_interpolation: bool,

    /// Glyph for filled cells.
    pub full_char: char,
    /// Glyph for empty cells.
    pub empty_char: char,
    /// Draw the boundary cell with an eighth-block glyph.
    pub use_partial_blocks: bool,

    /// What the terminal can show. [`ColorProfile::Ascii`] disables colors.
    pub color_profile: ColorProfile,
}

fn serialize_formatter<S: Serializer>(
    _formatter: &Option<PercentFormatter>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_none()
}

impl Default for Style {
    fn default() -> Self {
        Self {
            start_color: "#ff3333".to_string(),
            end_color: "#ffffff".to_string(),
            background_color: "#1a1a1a".to_string(),
            label_color: "#ffffff".to_string(),
            muted_label_color: "#808080".to_string(),
            show_percentage: true,
            percent_formatter: None,
            hint: None,
            max_width: 80,
            horizontal_padding: 2,
            use_gradient: false,
            scale_gradient: false,
            perceptual_interpolation: true,
            full_char: '█',
            empty_char: '░',
            use_partial_blocks: false,
            color_profile: ColorProfile::TrueColor,
        }
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Style")
            .field("start_color", &self.start_color)
            .field("end_color", &self.end_color)
            .field("background_color", &self.background_color)
            .field("label_color", &self.label_color)
            .field("muted_label_color", &self.muted_label_color)
            .field("show_percentage", &self.show_percentage)
            .field(
                "percent_formatter",
                &self.percent_formatter.as_ref().map(|_| "<fn>"),
            )
            .field("hint", &self.hint)
            .field("max_width", &self.max_width)
            .field("horizontal_padding", &self.horizontal_padding)
            .field("use_gradient", &self.use_gradient)
            .field("scale_gradient", &self.scale_gradient)
            .field("perceptual_interpolation", &self.perceptual_interpolation)
            .field("full_char", &self.full_char)
            .field("empty_char", &self.empty_char)
            .field("use_partial_blocks", &self.use_partial_blocks)
            .field("color_profile", &self.color_profile)
            .finish()
    }
}

impl Style {
    /// Checks that every color field parses as hex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat)
    /// for the first malformed color.
    pub fn validate(&self) -> Result<()> {
        for color in [
            &self.start_color,
            &self.end_color,
            &self.background_color,
            &self.label_color,
            &self.muted_label_color,
        ] {
            hex_to_rgb(color)?;
        }
        Ok(())
    }

    /// Returns the style actually used for drawing: under
    /// [`ColorProfile::Ascii`] gradients are off and glyphs are `#`/`-`.
    pub fn effective(&self) -> Style {
        let mut style = self.clone();
        if style.color_profile == ColorProfile::Ascii {
            style.use_gradient = false;
            style.use_partial_blocks = false;
            style.full_char = ASCII_CHARS.0;
            style.empty_char = ASCII_CHARS.1;
        }
        style
    }

    /// Whether escape sequences should be emitted at all.
    pub fn colored(&self) -> bool {
        self.color_profile != ColorProfile::Ascii
    }
}
