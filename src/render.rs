//! Stateless progress bar rendering.
//!
//! The renderer turns a progress fraction and a [`Style`] into one line of
//! terminal text:
//!
//! ```text
//!   [██████████░░░░░░░░░░]  50%  Processing...
//! ```
//!
//! It never fails on the progress value (NaN and out-of-range values are
//! clamped). It does fail on a malformed color in the style.
//!
//! ```rust
//! use bubbletea_progress::render::Renderer;
//! use bubbletea_progress::Style;
//!
//! let style = Style { max_width: 30, ..Style::default() };
//! let line = Renderer::with_columns(120).render_plain(0.5, &style).unwrap();
//! assert_eq!(line, format!("  [{}{}]  50%  ", "█".repeat(8), "░".repeat(8)));
//! ```

use crate::color::{
    clamp01, hex_to_rgb, interpolate_linear, interpolate_perceptual, rgb_to_hex, Rgb,
};
use crate::error::Result;
use crate::format::default_percentage;
use crate::style::Style;
use crate::theme::PARTIAL_BLOCKS;
use lipgloss_extras::lipgloss::{Color as LGColor, Style as LGStyle};
use unicode_width::UnicodeWidthStr;

/// Terminal width assumed when it cannot be queried.
pub const FALLBACK_COLUMNS: usize = 120;
/// The bar never gets narrower than this many cells.
pub const MIN_BAR_WIDTH: usize = 10;
/// Columns reserved for the percentage suffix.
pub const PERCENT_COLUMNS: usize = 8;

/// Current terminal width in columns, or [`FALLBACK_COLUMNS`].
pub fn terminal_columns() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(FALLBACK_COLUMNS)
}

/// Gradient fraction for filled cell `index`.
///
/// Unscaled gradients span the whole bar, so a half-filled bar only shows the
/// first half of the colors. Scaled gradients always span the filled cells.
pub fn gradient_position(index: usize, filled: usize, width: usize, scaled: bool) -> f64 {
    if scaled {
        if filled > 1 {
            index as f64 / (filled - 1) as f64
        } else {
            0.0
        }
    } else if width > 1 {
        index as f64 / (width - 1) as f64
    } else {
        0.5
    }
}

/// One cell of the bar: the glyph and, when colors are enabled, its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Glyph drawn in this cell.
    pub glyph: char,
    /// Foreground color, `None` under the ASCII profile.
    pub color: Option<Rgb>,
    /// Whether this cell counts as filled (including a partial block).
    pub filled: bool,
}

/// Renders bars against a terminal width.
///
/// [`Renderer::new`] queries the terminal on every call; [`Renderer::with_columns`]
/// pins the width, which is what tests and fixed-size layouts want.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    columns: Option<usize>,
}

impl Renderer {
    /// A renderer that sizes itself to the current terminal.
    pub fn new() -> Self {
        Self { columns: None }
    }

    /// A renderer that assumes a terminal `columns` wide.
    pub fn with_columns(columns: usize) -> Self {
        Self {
            columns: Some(columns),
        }
    }

    /// Terminal width this renderer lays out against.
    pub fn columns(&self) -> usize {
        self.columns.unwrap_or_else(terminal_columns)
    }

    /// Number of cells between the brackets for `style`.
    pub fn bar_width(&self, style: &Style) -> usize {
        let cols = self.columns().min(style.max_width);

        let mut reserved = 2;
        if style.show_percentage {
            reserved += PERCENT_COLUMNS;
        }
        if let Some(hint) = style.hint.as_deref().filter(|h| !h.is_empty()) {
            reserved += hint.width() + 2;
        }
        reserved += 2 * style.horizontal_padding;

        cols.saturating_sub(reserved).max(MIN_BAR_WIDTH)
    }

    /// Decomposes the bar into cells without producing any text.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if any
    /// color in `style` is malformed.
    pub fn cells(&self, progress: f64, style: &Style) -> Result<Vec<Cell>> {
        style.validate()?;
        let style = style.effective();
        let p = clamp01(progress);
        let width = self.bar_width(&style);

        let exact = p * width as f64;
        let (filled, fraction) = if style.use_partial_blocks {
            let whole = exact.floor();
            (whole as usize, exact - whole)
        } else {
            (exact.round() as usize, 0.0)
        };
        let filled = filled.min(width);

        let start = hex_to_rgb(&style.start_color)?;
        let end = hex_to_rgb(&style.end_color)?;
        let background = hex_to_rgb(&style.background_color)?;
        let colored = style.colored();

        let fill_color = |t: f64| -> Option<Rgb> {
            if !colored {
                None
            } else if !style.use_gradient {
                Some(start)
            } else if style.perceptual_interpolation {
                Some(interpolate_perceptual(start, end, t))
            } else {
                Some(interpolate_linear(start, end, t))
            }
        };

        let mut cells = Vec::with_capacity(width);
        for i in 0..filled {
            cells.push(Cell {
                glyph: style.full_char,
                color: fill_color(gradient_position(i, filled, width, style.scale_gradient)),
                filled: true,
            });
        }

        if style.use_partial_blocks && fraction > 0.01 && filled < width {
            let idx = ((fraction * PARTIAL_BLOCKS.len() as f64) as usize)
                .min(PARTIAL_BLOCKS.len() - 1);
            let t = if style.scale_gradient {
                if filled > 0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                gradient_position(filled, filled, width, false)
            };
            cells.push(Cell {
                glyph: PARTIAL_BLOCKS[idx],
                color: fill_color(t),
                filled: true,
            });
        }

        let empty_color = colored.then_some(background);
        while cells.len() < width {
            cells.push(Cell {
                glyph: style.empty_char,
                color: empty_color,
                filled: false,
            });
        }

        Ok(cells)
    }

    /// Renders the full styled line: padding, brackets, cells, percentage and hint.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if any
    /// color in `style` is malformed.
    pub fn render(&self, progress: f64, style: &Style) -> Result<String> {
        self.compose(progress, style, style.colored())
    }

    /// Same layout as [`Renderer::render`] with no escape sequences.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if any
    /// color in `style` is malformed.
    pub fn render_plain(&self, progress: f64, style: &Style) -> Result<String> {
        self.compose(progress, style, false)
    }

    fn compose(&self, progress: f64, style: &Style, colored: bool) -> Result<String> {
        let cells = self.cells(progress, style)?;
        let p = clamp01(progress);
        let pad = " ".repeat(style.horizontal_padding);

        let mut out = String::new();
        out.push_str(&pad);
        out.push('[');
        for cell in &cells {
            match cell.color.filter(|_| colored) {
                Some(color) => out.push_str(
                    &LGStyle::new()
                        .foreground(LGColor::from(rgb_to_hex(color).as_str()))
                        .render(&cell.glyph.to_string()),
                ),
                None => out.push(cell.glyph),
            }
        }
        out.push(']');

        if style.show_percentage {
            let text = match &style.percent_formatter {
                Some(formatter) => formatter(p),
                None => default_percentage(p),
            };
            if colored {
                out.push_str(
                    &LGStyle::new()
                        .bold(true)
                        .foreground(LGColor::from(style.label_color.as_str()))
                        .render(&text),
                );
            } else {
                out.push_str(&text);
            }
        }

        if let Some(hint) = style.hint.as_deref().filter(|h| !h.is_empty()) {
            let text = format!("  {hint}");
            if colored {
                out.push_str(
                    &LGStyle::new()
                        .faint(true)
                        .foreground(LGColor::from(style.muted_label_color.as_str()))
                        .render(&text),
                );
            } else {
                out.push_str(&text);
            }
        }

        out.push_str(&pad);
        Ok(out)
    }
}

/// Renders `progress` with `style`, sized to the current terminal.
///
/// # Errors
///
/// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if any
/// color in `style` is malformed.
pub fn render(progress: f64, style: &Style) -> Result<String> {
    Renderer::new().render(progress, style)
}
