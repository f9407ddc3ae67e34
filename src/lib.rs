#![warn(missing_docs)]

//! # bubbletea-progress
//!
//! Spring-animated, themeable progress bars for terminal applications built
//! with [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! A bar has two progress values: the *target*, which the host sets whenever
//! it learns something new, and the *displayed* progress, which follows the
//! target through a damped spring so the bar glides instead of jumping. The
//! host owns the clock: it calls `tick()` once per frame, either directly or
//! by forwarding [`progress::FrameMsg`] from a bubbletea-rs program.
//!
//! ## Features
//!
//! - **Spring animation** with tunable stiffness, damping and frame rate
//! - **Gradients** blended in linear light, fitted to the bar or to the fill
//! - **Eighth-block boundary cells** for sub-cell resolution
//! - **Themes and presets** for gradients and glyphs
//! - **Stale-update protection** through monotonic frame tags
//! - **Groups** of named bars rendered together
//! - **JSON snapshots** of bars and groups
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_progress::prelude::*;
//!
//! # fn main() -> bubbletea_progress::Result<()> {
//! let mut bar = Progress::from_theme("ocean")?
//!     .with_hint("Downloading")
//!     .with_terminal_width(100);
//!
//! bar.update(0.3);
//! for _ in 0..10 {
//!     bar.tick();
//! }
//! println!("{}", bar.render()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Stateless Rendering
//!
//! The renderer can also be used on its own, without any animation state:
//!
//! ```rust
//! use bubbletea_progress::{render::Renderer, Style};
//!
//! let style = Style { max_width: 40, ..Style::default() };
//! let line = Renderer::with_columns(80).render_plain(0.5, &style).unwrap();
//! assert!(line.ends_with(" 50%  "));
//! ```
//!
//! ## Custom Percentage Text
//!
//! ```rust
//! use bubbletea_progress::{format::format_as_fraction, progress};
//!
//! let bar = progress::new(&[progress::with_percent_formatter(format_as_fraction(100))]);
//! let line = bar.render_as(0.5).unwrap();
//! assert!(lipgloss_extras::lipgloss::strip_ansi(&line).contains(" 50/100"));
//! ```

pub mod color;
pub mod error;
pub mod format;
pub mod group;
pub mod metrics;
pub mod progress;
pub mod render;
pub mod snapshot;
pub mod spring;
pub mod style;
pub mod theme;

pub use color::{ColorProfile, Rgb};
pub use error::{Error, Result};
pub use group::ProgressGroup;
pub use metrics::Metrics;
pub use progress::{Equilibrium, FrameMsg, Model as Progress, ProgressOption, ProgressState};
pub use render::{Cell, Renderer};
pub use snapshot::{BarSnapshot, GroupSnapshot};
pub use spring::Spring;
pub use style::{PercentFormatter, Style};
pub use theme::Theme;

/// Commonly used types and functions.
///
/// ```rust
/// use bubbletea_progress::prelude::*;
///
/// let mut group = ProgressGroup::new();
/// group.add("build", progress_new(&[with_width(60)]));
/// assert_eq!(group.len(), 1);
/// ```
pub mod prelude {
    pub use crate::format::{format_as_fraction, format_as_time_remaining, format_engineering};
    pub use crate::progress::{
        new as progress_new, with_color_profile, with_default_gradient,
        with_default_scaled_gradient, with_fill_characters, with_gradient, with_hint,
        with_partial_blocks, with_percent_formatter, with_scaled_gradient, with_solid_fill,
        with_spring_options, with_width, without_percentage,
    };
    pub use crate::{
        ColorProfile, Equilibrium, Error, FrameMsg, Metrics, Progress, ProgressGroup,
        ProgressOption, ProgressState, Result, Style,
    };
}
