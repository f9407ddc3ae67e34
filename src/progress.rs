//! Animated progress bar component for Bubble Tea applications.
//!
//! The bar keeps a *target* progress set by the host and a *displayed*
//! progress that chases it with spring physics. The host drives time: call
//! [`Model::update`] when new progress is known, [`Model::tick`] once per
//! frame, and [`Model::render`] (or [`Model::view`]) to draw.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_progress::progress::{new, with_width, with_solid_fill};
//!
//! // Create a progress bar with default settings
//! let bar = new(&[]);
//!
//! // Create a progress bar with custom settings using the option pattern
//! let bar = new(&[
//!     with_width(50),
//!     with_solid_fill("#ff0000".to_string()),
//! ]);
//! ```
//!
//! # Fluent Configuration
//!
//! ```rust
//! use bubbletea_progress::progress::Model;
//!
//! # fn main() -> bubbletea_progress::Result<()> {
//! let mut bar = Model::from_theme("neon")?
//!     .with_hint("Downloading")
//!     .with_style_preset("dots")?
//!     .with_spring_options(20.0, 2.0);
//!
//! bar.update(0.4);
//! bar.tick();
//! let line = bar.render()?;
//! # let _ = line;
//! # Ok(())
//! # }
//! ```
//!
//! # Stale Updates
//!
//! Every [`Model::update`] bumps the bar's tag. A background job can remember
//! the tag it started from and apply its result with
//! [`Model::update_from_frame`]; if anything updated the bar in the meantime
//! the stale result is dropped.

use crate::color::{clamp01, hex_to_rgb, ColorProfile};
use crate::error::Result;
use crate::metrics::Metrics;
use crate::render::Renderer;
use crate::spring::{Spring, DEFAULT_DAMPING, DEFAULT_FPS, DEFAULT_FREQUENCY};
use crate::style::{PercentFormatter, Style};
use crate::theme::{find_char_style, find_gradient, find_theme};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

// Internal ID management for progress instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

// Restored bars keep their persisted id; later bars must not reuse it.
pub(crate) fn reserve_id(id: i64) {
    LAST_ID.fetch_max(id, Ordering::SeqCst);
}

/// Default increment for [`Model::incr`] and [`Model::decr`].
pub const DEFAULT_STEP: f64 = 0.25;
/// Default auto-increment interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_GRADIENT_A: &str = "#5A56E0";
const DEFAULT_GRADIENT_B: &str = "#EE6FF8";

/// Lifecycle of a bar.
///
/// `Idle → Running → {Completed, Cancelled, Error}`; [`Model::reset`] goes
/// back to `Idle`. Persisted as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    /// Nothing has been reported yet.
    #[default]
    Idle,
    /// At least one update has arrived.
    Running,
    /// The target reached 100%.
    Completed,
    /// The host cancelled the operation.
    Cancelled,
    /// The host reported a failure.
    Error,
}

impl ProgressState {
    /// Cancelled and errored bars stop animating.
    pub fn is_halted(self) -> bool {
        matches!(self, ProgressState::Cancelled | ProgressState::Error)
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgressState::Idle => "idle",
            ProgressState::Running => "running",
            ProgressState::Completed => "completed",
            ProgressState::Cancelled => "cancelled",
            ProgressState::Error => "error",
        };
        f.write_str(s)
    }
}

/// Thresholds under which the animation snaps to its target.
///
/// These are tuning knobs, not physics: small enough that the snap is
/// invisible at terminal resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    /// Maximum `|displayed - target|`.
    pub distance: f64,
    /// Maximum `|velocity|`.
    pub velocity: f64,
}

impl Default for Equilibrium {
    fn default() -> Self {
        Self {
            distance: 0.001,
            velocity: 0.01,
        }
    }
}

impl Equilibrium {
    /// Whether a spring at `distance` from its target moving at `velocity` has settled.
    pub fn is_settled(&self, distance: f64, velocity: f64) -> bool {
        distance.abs() < self.distance && velocity.abs() < self.velocity
    }
}

/// Called with the new state on completion, cancellation or failure.
pub type CompletionCallback = Box<dyn FnMut(ProgressState) + Send + Sync>;

/// Configuration options for building a bar with [`new`].
///
/// # Examples
///
/// ```rust
/// use bubbletea_progress::progress::{new, with_gradient, with_width, without_percentage};
///
/// let gradient_progress = new(&[
///     with_width(80),
///     with_gradient("#ff4757".to_string(), "#5352ed".to_string()),
///     without_percentage(),
/// ]);
/// ```
pub enum ProgressOption {
    /// Purple to pink gradient (#5A56E0 to #EE6FF8) across the whole bar.
    WithDefaultGradient,
    /// Custom gradient across the whole bar.
    WithGradient(String, String),
    /// Purple to pink gradient fitted to the filled cells.
    WithDefaultScaledGradient,
    /// Custom gradient fitted to the filled cells.
    WithScaledGradient(String, String),
    /// Single fill color.
    WithSolidFill(String),
    /// Filled and empty glyphs.
    WithFillCharacters(char, char),
    /// Hides the percentage text.
    WithoutPercentage,
    /// Maximum rendered width in columns.
    WithWidth(usize),
    /// Spring frequency and damping.
    WithSpringOptions(f64, f64),
    /// Trailing hint text.
    WithHint(String),
    /// Custom percentage formatter.
    WithPercentFormatter(PercentFormatter),
    /// Terminal color capability.
    WithColorProfile(ColorProfile),
    /// Eighth-block boundary cell.
    WithPartialBlocks,
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) {
        match self {
            ProgressOption::WithDefaultGradient => {
                m.set_ramp(DEFAULT_GRADIENT_A, DEFAULT_GRADIENT_B, false);
            }
            ProgressOption::WithGradient(color_a, color_b) => {
                m.set_ramp(color_a, color_b, false);
            }
            ProgressOption::WithDefaultScaledGradient => {
                m.set_ramp(DEFAULT_GRADIENT_A, DEFAULT_GRADIENT_B, true);
            }
            ProgressOption::WithScaledGradient(color_a, color_b) => {
                m.set_ramp(color_a, color_b, true);
            }
            ProgressOption::WithSolidFill(color) => {
                m.style.start_color = color.clone();
                m.style.use_gradient = false;
            }
            ProgressOption::WithFillCharacters(full, empty) => {
                m.style.full_char = *full;
                m.style.empty_char = *empty;
            }
            ProgressOption::WithoutPercentage => {
                m.style.show_percentage = false;
            }
            ProgressOption::WithWidth(width) => {
                m.style.max_width = *width;
            }
            ProgressOption::WithSpringOptions(frequency, damping) => {
                m.set_spring_options(*frequency, *damping);
            }
            ProgressOption::WithHint(hint) => {
                m.style.hint = Some(hint.clone());
            }
            ProgressOption::WithPercentFormatter(formatter) => {
                m.style.percent_formatter = Some(formatter.clone());
            }
            ProgressOption::WithColorProfile(profile) => {
                m.style.color_profile = *profile;
            }
            ProgressOption::WithPartialBlocks => {
                m.style.use_partial_blocks = true;
            }
        }
    }
}

/// Purple to pink gradient across the whole bar.
pub fn with_default_gradient() -> ProgressOption {
    ProgressOption::WithDefaultGradient
}

/// Gradient from `color_a` to `color_b` across the whole bar.
///
/// At 50% only the first half of the gradient is visible.
pub fn with_gradient(color_a: String, color_b: String) -> ProgressOption {
    ProgressOption::WithGradient(color_a, color_b)
}

/// Purple to pink gradient fitted to the filled cells.
pub fn with_default_scaled_gradient() -> ProgressOption {
    ProgressOption::WithDefaultScaledGradient
}

/// Gradient from `color_a` to `color_b` fitted to the filled cells.
///
/// ```rust
/// use bubbletea_progress::progress::{new, with_scaled_gradient};
///
/// // The orange-to-yellow gradient always spans the filled portion,
/// // regardless of progress percentage
/// let bar = new(&[with_scaled_gradient("#ee5a24".to_string(), "#feca57".to_string())]);
/// assert!(bar.style.scale_gradient);
/// ```
pub fn with_scaled_gradient(color_a: String, color_b: String) -> ProgressOption {
    ProgressOption::WithScaledGradient(color_a, color_b)
}

/// Solid fill color instead of a gradient.
pub fn with_solid_fill(color: String) -> ProgressOption {
    ProgressOption::WithSolidFill(color)
}

/// Glyphs for filled and empty cells.
///
/// ```rust
/// use bubbletea_progress::progress::{new, with_fill_characters};
///
/// let dots = new(&[with_fill_characters('●', '○')]);
/// assert_eq!(dots.style.full_char, '●');
/// ```
pub fn with_fill_characters(full: char, empty: char) -> ProgressOption {
    ProgressOption::WithFillCharacters(full, empty)
}

/// Hides the numeric percentage.
pub fn without_percentage() -> ProgressOption {
    ProgressOption::WithoutPercentage
}

/// Maximum rendered width in columns, decorations included.
pub fn with_width(w: usize) -> ProgressOption {
    ProgressOption::WithWidth(w)
}

/// Spring stiffness and damping.
///
/// Typical frequencies are 10-30. Damping at or above `2 * sqrt(frequency)`
/// settles without overshoot; lower values bounce.
pub fn with_spring_options(frequency: f64, damping: f64) -> ProgressOption {
    ProgressOption::WithSpringOptions(frequency, damping)
}

/// Trailing hint such as "Processing...".
pub fn with_hint(hint: String) -> ProgressOption {
    ProgressOption::WithHint(hint)
}

/// Replaces the ` NNN%` suffix.
pub fn with_percent_formatter(formatter: PercentFormatter) -> ProgressOption {
    ProgressOption::WithPercentFormatter(formatter)
}

/// Terminal color capability; [`ColorProfile::Ascii`] disables colors.
pub fn with_color_profile(profile: ColorProfile) -> ProgressOption {
    ProgressOption::WithColorProfile(profile)
}

/// Draws the boundary cell with an eighth-block glyph.
pub fn with_partial_blocks() -> ProgressOption {
    ProgressOption::WithPartialBlocks
}

/// Message that drives one animation frame under bubbletea-rs.
///
/// Produced by [`Model::frame_cmd`]. A bar only reacts to frames carrying its
/// own id and current tag, so frames scheduled before a newer update are
/// dropped.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

impl FrameMsg {
    /// Id of the bar this frame belongs to.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Tag the bar had when this frame was scheduled.
    pub fn tag(&self) -> i64 {
        self.tag
    }
}

/// An animated, stateful progress bar.
///
/// The bar owns its [`Style`], its spring state and a small state machine.
/// It never spawns threads or timers: everything happens inside the calls
/// the host makes.
///
/// # Examples
///
/// ## Host-driven loop
/// ```rust
/// use bubbletea_progress::progress::{Model, ProgressState};
///
/// let mut bar = Model::default().with_terminal_width(80);
/// bar.update(1.0);
/// for _ in 0..600 {
///     bar.tick();
/// }
/// assert_eq!(bar.state(), ProgressState::Completed);
/// assert!(bar.is_complete());
/// ```
///
/// ## Integration with bubbletea-rs
/// ```rust
/// use bubbletea_progress::progress;
/// use bubbletea_rs::{Model as TeaModel, Cmd, Msg};
///
/// struct App {
///     progress: progress::Model,
/// }
///
/// impl TeaModel for App {
///     fn init() -> (Self, Option<Cmd>) {
///         let mut progress = progress::new(&[progress::with_width(40)]);
///         let cmd = progress.set_percent(0.5);
///         (Self { progress }, Some(cmd))
///     }
///
///     fn update(&mut self, msg: Msg) -> Option<Cmd> {
///         // Forward animation frames to the bar
///         self.progress.handle_msg(msg)
///     }
///
///     fn view(&self) -> String {
///         format!("Loading: {}\n", self.progress.view())
///     }
/// }
/// ```
pub struct Model {
    /// An identifier to keep us from receiving frames intended for other bars.
    pub(crate) id: i64,
    /// Bumped on every update so stale frames and deferred updates are ignored.
    pub(crate) tag: i64,

    /// Visual configuration.
    pub style: Style,

    pub(crate) spring: Spring,
    /// Amount used by [`Model::incr`] and [`Model::decr`] when no delta is given.
    pub step: f64,
    /// Auto-increment by `step` every `interval` inside [`Model::tick`].
    pub timer_enabled: bool,
    /// Auto-increment period.
    pub interval: Duration,
    /// Snap-to-target thresholds.
    pub equilibrium: Equilibrium,

    pub(crate) state: ProgressState,
    pub(crate) target_percent: f64,
    pub(crate) percent_shown: f64,
    pub(crate) velocity: f64,
    completed_notified: bool,

    on_complete: Option<CompletionCallback>,
    metrics: Option<Metrics>,
    columns: Option<usize>,
    last_timer_fire: Instant,
}

/// Creates a bar from a list of options.
///
/// Colors are not checked here; a malformed one surfaces from
/// [`Model::render`]. Use [`try_new`] to fail at construction instead.
///
/// # Default Configuration
///
/// - **Width**: at most 80 columns, decorations included
/// - **Glyphs**: '█' filled, '░' empty
/// - **Fill color**: "#ff3333"
/// - **Percentage**: shown
/// - **Animation**: 60 fps spring, frequency 18.0, damping 1.0
pub fn new(opts: &[ProgressOption]) -> Model {
    let mut m = Model::with_style(Style::default());
    for opt in opts {
        opt.apply(&mut m);
    }
    m
}

/// Like [`new`], but validates every color in the resulting style.
///
/// # Errors
///
/// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) for a
/// malformed color option.
pub fn try_new(opts: &[ProgressOption]) -> Result<Model> {
    let m = new(opts);
    m.style.validate()?;
    Ok(m)
}

impl Model {
    /// Creates an idle bar with the given style and default physics.
    pub fn with_style(style: Style) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            style,
            spring: Spring::new(DEFAULT_FPS, DEFAULT_FREQUENCY, DEFAULT_DAMPING),
            step: DEFAULT_STEP,
            timer_enabled: false,
            interval: DEFAULT_INTERVAL,
            equilibrium: Equilibrium::default(),
            state: ProgressState::Idle,
            target_percent: 0.0,
            percent_shown: 0.0,
            velocity: 0.0,
            completed_notified: false,
            on_complete: None,
            metrics: None,
            columns: None,
            last_timer_fire: Instant::now(),
        }
    }

    /// Creates a bar styled by a built-in theme.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPresetName`](crate::Error::UnknownPresetName) when no
    /// theme is called `name`.
    pub fn from_theme(name: &str) -> Result<Self> {
        let theme = find_theme(name)?;
        Ok(Self::with_style(theme.style.clone()))
    }

    /// Process-unique identifier, for debugging and frame routing.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current tag. Remember it before deferring an update.
    pub fn tag(&self) -> i64 {
        self.tag
    }

    /// Displayed (animated) progress.
    pub fn progress(&self) -> f64 {
        self.percent_shown
    }

    /// Target progress the display is animating toward.
    pub fn target(&self) -> f64 {
        self.target_percent
    }

    /// Current spring velocity.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Lifecycle state.
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Visual configuration.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Spring parameters.
    pub fn spring(&self) -> Spring {
        self.spring
    }

    /// Frame metrics, if enabled.
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Sets the target progress, clamped to `[0, 1]`, and bumps the tag.
    ///
    /// The first update moves an idle bar to [`ProgressState::Running`].
    /// Completion is detected on the next [`Model::tick`].
    pub fn update(&mut self, progress: f64) {
        self.target_percent = clamp01(progress);
        self.tag += 1;

        if self.state == ProgressState::Idle {
            self.state = ProgressState::Running;
            debug!(id = self.id, "progress bar running");
        }
    }

    /// Applies a deferred update only if no other update happened since `tag`
    /// was read.
    ///
    /// Returns whether the update was applied.
    ///
    /// ```rust
    /// use bubbletea_progress::progress::Model;
    ///
    /// let mut bar = Model::default();
    /// let tag = bar.tag();
    /// bar.update(0.7); // a newer update lands first
    /// assert!(!bar.update_from_frame(0.3, tag));
    /// assert_eq!(bar.target(), 0.7);
    /// ```
    pub fn update_from_frame(&mut self, progress: f64, tag: i64) -> bool {
        if tag != self.tag {
            trace!(id = self.id, tag, current = self.tag, "ignoring stale update");
            return false;
        }
        self.update(progress);
        true
    }

    /// Raises the target by `delta`, or by [`Model::step`](Model#structfield.step) when `None`.
    pub fn incr(&mut self, delta: Option<f64>) {
        let d = delta.unwrap_or(self.step);
        self.update(self.target_percent + d);
    }

    /// Lowers the target by `delta`, or by [`Model::step`](Model#structfield.step) when `None`.
    pub fn decr(&mut self, delta: Option<f64>) {
        let d = delta.unwrap_or(self.step);
        self.update(self.target_percent - d);
    }

    /// Advances the bar by one frame. See [`Model::tick_at`].
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advances the bar by one frame as if the current time were `now`.
    ///
    /// Runs the auto-increment timer if enabled, steps the spring by one
    /// frame, snaps to the target at equilibrium and fires the completion
    /// callback the first time the target is at 100%. Cancelled and errored
    /// bars stay frozen.
    pub fn tick_at(&mut self, now: Instant) {
        let started = self.metrics.is_some().then(Instant::now);

        if !self.state.is_halted() {
            if self.timer_enabled
                && now.saturating_duration_since(self.last_timer_fire) >= self.interval
            {
                self.last_timer_fire = now;
                if self.target_percent < 1.0 {
                    self.incr(None);
                }
            }

            if !self.is_equilibrium() {
                let (position, velocity) =
                    self.spring
                        .update(self.percent_shown, self.velocity, self.target_percent);
                self.percent_shown = clamp01(position);
                // Hitting either end of the bar absorbs the motion.
                self.velocity = if self.percent_shown == position {
                    velocity
                } else {
                    0.0
                };
            }

            if self.is_equilibrium() {
                self.percent_shown = self.target_percent;
                self.velocity = 0.0;
            }

            self.check_completion();
        }

        if let (Some(metrics), Some(started)) = (self.metrics.as_mut(), started) {
            metrics.record_frame(started.elapsed());
        }
    }

    /// Renders the bar at its displayed progress.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if the
    /// style holds a malformed color.
    pub fn render(&self) -> Result<String> {
        self.renderer().render(self.percent_shown, &self.style)
    }

    /// [`Model::render`] without escape sequences.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if the
    /// style holds a malformed color.
    pub fn render_plain(&self) -> Result<String> {
        self.renderer().render_plain(self.percent_shown, &self.style)
    }

    /// Renders the bar at an arbitrary progress, bypassing the animation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if the
    /// style holds a malformed color.
    pub fn render_as(&self, percent: f64) -> Result<String> {
        self.renderer().render(percent, &self.style)
    }

    /// Infallible [`Model::render`] for view functions; a style error renders
    /// as an empty line.
    pub fn view(&self) -> String {
        self.render().unwrap_or_else(|err| {
            warn!(id = self.id, error = %err, "failed to render progress bar");
            String::new()
        })
    }

    /// Whether the display is still moving toward the target.
    pub fn is_animating(&self) -> bool {
        !self.is_equilibrium()
    }

    /// Whether the display has settled on the target.
    pub fn is_equilibrium(&self) -> bool {
        self.equilibrium
            .is_settled(self.percent_shown - self.target_percent, self.velocity)
    }

    /// Whether both the target and the display are at 100%.
    pub fn is_complete(&self) -> bool {
        self.percent_shown >= 1.0 && self.target_percent >= 1.0
    }

    /// Moves to [`ProgressState::Cancelled`] and notifies the callback.
    /// Cancelling an already cancelled bar does nothing.
    pub fn cancel(&mut self) {
        self.halt(ProgressState::Cancelled);
    }

    /// Moves to [`ProgressState::Error`] and notifies the callback.
    /// Failing an already failed bar does nothing.
    pub fn fail(&mut self) {
        self.halt(ProgressState::Error);
    }

    /// Returns to an idle bar at 0% with the notification guard cleared.
    pub fn reset(&mut self) {
        self.target_percent = 0.0;
        self.percent_shown = 0.0;
        self.velocity = 0.0;
        self.tag += 1;
        self.completed_notified = false;
        self.state = ProgressState::Idle;
        self.last_timer_fire = Instant::now();
        debug!(id = self.id, "progress bar reset");
    }

    /// Starts recording frame metrics, discarding any previous record.
    pub fn enable_metrics(&mut self) {
        self.metrics = Some(Metrics::default());
    }

    /// Stops recording frame metrics.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Registers the completion callback in place.
    pub fn set_on_complete<F>(&mut self, callback: F)
    where
        F: FnMut(ProgressState) + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    /// Sets the spring parameters, keeping the frame rate.
    pub fn set_spring_options(&mut self, frequency: f64, damping: f64) {
        self.spring = Spring::new(self.spring.fps, frequency, damping);
    }

    /// Sets the target and returns the command that starts the frame loop.
    pub fn set_percent(&mut self, p: f64) -> Cmd {
        self.update(p);
        self.frame_cmd()
    }

    /// A command delivering the next [`FrameMsg`] after one frame interval.
    pub fn frame_cmd(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        let duration = Duration::from_nanos(1_000_000_000 / self.spring.fps.max(1) as u64);

        bubbletea_tick(duration, move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    /// The frame message this bar would currently accept.
    pub fn frame_msg(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Handles bubbletea-rs messages. A [`FrameMsg`] for this bar ticks it and
    /// schedules the next frame while there is still something to animate.
    pub fn handle_msg(&mut self, msg: Msg) -> Option<Cmd> {
        let frame = msg.downcast_ref::<FrameMsg>()?;
        if frame.id != self.id || frame.tag != self.tag {
            return None;
        }

        self.tick();

        if self.is_animating() || (self.timer_enabled && !self.state.is_halted()) {
            Some(self.frame_cmd())
        } else {
            None
        }
    }

    // Fluent configuration

    /// Gradient fill from `start` to `end`; `scaled` fits it to the filled cells.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) for a
    /// malformed color.
    pub fn with_gradient(mut self, start: &str, end: &str, scaled: bool) -> Result<Self> {
        hex_to_rgb(start)?;
        hex_to_rgb(end)?;
        self.set_ramp(start, end, scaled);
        Ok(self)
    }

    /// Gradient fill from a named preset.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPresetName`](crate::Error::UnknownPresetName) for an
    /// unknown preset.
    pub fn with_preset_gradient(self, preset: &str, scaled: bool) -> Result<Self> {
        let (start, end) = find_gradient(preset)?;
        self.with_gradient(start, end, scaled)
    }

    /// Single fill color.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) for a
    /// malformed color.
    pub fn with_solid_fill(mut self, color: &str) -> Result<Self> {
        hex_to_rgb(color)?;
        self.style.start_color = color.to_string();
        self.style.use_gradient = false;
        Ok(self)
    }

    /// Maximum rendered width in columns.
    pub fn with_width(mut self, width: usize) -> Self {
        self.style.max_width = width;
        self
    }

    /// Trailing hint text.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.style.hint = Some(hint.into());
        self
    }

    /// Hides the percentage.
    pub fn without_percentage(mut self) -> Self {
        self.style.show_percentage = false;
        self
    }

    /// Glyph pair from a named preset such as `"dots"` or `"ascii"`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownPresetName`](crate::Error::UnknownPresetName) for an
    /// unknown preset.
    pub fn with_style_preset(mut self, name: &str) -> Result<Self> {
        let (full, empty) = find_char_style(name)?;
        self.style.full_char = full;
        self.style.empty_char = empty;
        Ok(self)
    }

    /// Spring frequency and damping. Not validated.
    pub fn with_spring_options(mut self, frequency: f64, damping: f64) -> Self {
        self.set_spring_options(frequency, damping);
        self
    }

    /// Frame rate the spring is integrated at.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.spring = Spring::new(fps, self.spring.frequency, self.spring.damping);
        self
    }

    /// Default increment for [`Model::incr`] / [`Model::decr`].
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Enables auto-increment by `step` every `interval`.
    pub fn with_timer(mut self, interval: Duration) -> Self {
        self.timer_enabled = true;
        self.interval = interval;
        self.last_timer_fire = Instant::now();
        self
    }

    /// Pins the terminal width used for layout instead of querying it.
    pub fn with_terminal_width(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Terminal color capability.
    pub fn with_color_profile(mut self, profile: ColorProfile) -> Self {
        self.style.color_profile = profile;
        self
    }

    /// Custom snap-to-target thresholds.
    pub fn with_equilibrium(mut self, equilibrium: Equilibrium) -> Self {
        self.equilibrium = equilibrium;
        self
    }

    /// Custom percentage formatter.
    pub fn with_percent_formatter(mut self, formatter: PercentFormatter) -> Self {
        self.style.percent_formatter = Some(formatter);
        self
    }

    /// Completion callback.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(ProgressState) + Send + Sync + 'static,
    {
        self.set_on_complete(callback);
        self
    }

    pub(crate) fn restore(
        &mut self,
        tag: i64,
        shown: f64,
        target: f64,
        velocity: f64,
        state: ProgressState,
    ) {
        self.tag = tag;
        self.percent_shown = clamp01(shown);
        self.target_percent = clamp01(target);
        self.velocity = velocity;
        self.state = state;
        // A restored bar that already finished must not notify again.
        self.completed_notified = state != ProgressState::Idle
            && state != ProgressState::Running;
    }

    fn renderer(&self) -> Renderer {
        match self.columns {
            Some(columns) => Renderer::with_columns(columns),
            None => Renderer::new(),
        }
    }

    fn set_ramp(&mut self, color_a: &str, color_b: &str, scaled: bool) {
        self.style.use_gradient = true;
        self.style.scale_gradient = scaled;
        self.style.start_color = color_a.to_string();
        self.style.end_color = color_b.to_string();
    }

    fn check_completion(&mut self) {
        if self.target_percent >= 1.0 && !self.completed_notified {
            self.completed_notified = true;
            self.state = ProgressState::Completed;
            debug!(id = self.id, "progress bar completed");
            self.notify();
        }
    }

    fn halt(&mut self, state: ProgressState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.completed_notified = true;
        debug!(id = self.id, %state, "progress bar halted");
        self.notify();
    }

    fn notify(&mut self) {
        let state = self.state;
        if let Some(callback) = self.on_complete.as_mut() {
            callback(state);
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("state", &self.state)
            .field("target_percent", &self.target_percent)
            .field("percent_shown", &self.percent_shown)
            .field("velocity", &self.velocity)
            .field("spring", &self.spring)
            .field("step", &self.step)
            .field("timer_enabled", &self.timer_enabled)
            .field("interval", &self.interval)
            .field("style", &self.style)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        let model = new(&[]);
        (model, std::option::Option::None)
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.handle_msg(msg)
    }

    fn view(&self) -> String {
        Model::view(self)
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::format::format_as_fraction;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (
        Arc<Mutex<Vec<ProgressState>>>,
        impl FnMut(ProgressState) + Send + Sync,
    ) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |state| sink.lock().unwrap().push(state))
    }

    #[test]
    fn test_new_with_no_options() {
        let bar = new(&[]);
        assert_eq!(bar.style.max_width, 80);
        assert_eq!(bar.style.full_char, '█');
        assert_eq!(bar.style.empty_char, '░');
        assert!(bar.style.show_percentage);
        assert!(!bar.style.use_gradient);
        assert_eq!(bar.target(), 0.0);
        assert_eq!(bar.progress(), 0.0);
        assert_eq!(bar.state(), ProgressState::Idle);
        assert_eq!(bar.spring(), Spring::new(60, 18.0, 1.0));
        assert_eq!(bar.step, DEFAULT_STEP);
        assert!(!bar.timer_enabled);
    }

    #[test]
    fn test_new_with_options() {
        let bar = new(&[
            with_width(60),
            with_default_scaled_gradient(),
            with_fill_characters('▓', '▒'),
            without_percentage(),
            with_spring_options(20.0, 0.8),
            with_hint("Working".to_string()),
            with_color_profile(ColorProfile::Ansi256),
            with_partial_blocks(),
        ]);
        assert_eq!(bar.style.max_width, 60);
        assert!(bar.style.use_gradient);
        assert!(bar.style.scale_gradient);
        assert_eq!(bar.style.start_color, "#5A56E0");
        assert_eq!(bar.style.end_color, "#EE6FF8");
        assert_eq!(bar.style.full_char, '▓');
        assert!(!bar.style.show_percentage);
        assert_eq!(bar.spring().frequency, 20.0);
        assert_eq!(bar.spring().damping, 0.8);
        assert_eq!(bar.style.hint.as_deref(), Some("Working"));
        assert_eq!(bar.style.color_profile, ColorProfile::Ansi256);
        assert!(bar.style.use_partial_blocks);
    }

    #[test]
    fn test_solid_fill_option_disables_gradient() {
        let bar = new(&[with_default_gradient(), with_solid_fill("#00ff00".to_string())]);
        assert!(!bar.style.use_gradient);
        assert_eq!(bar.style.start_color, "#00ff00");
    }

    #[test]
    fn test_try_new_validates_colors() {
        assert!(try_new(&[with_gradient("#fff".to_string(), "#000".to_string())]).is_ok());
        assert!(matches!(
            try_new(&[with_solid_fill("green".to_string())]),
            Err(Error::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn test_update_sets_and_clamps_target() {
        let mut bar = Model::default();
        bar.update(0.5);
        assert_eq!(bar.target(), 0.5);
        bar.update(1.5);
        assert_eq!(bar.target(), 1.0);
        bar.update(-0.5);
        assert_eq!(bar.target(), 0.0);
    }

    #[test]
    fn test_first_update_starts_running() {
        let mut bar = Model::default();
        assert_eq!(bar.state(), ProgressState::Idle);
        bar.update(0.1);
        assert_eq!(bar.state(), ProgressState::Running);
    }

    #[test]
    fn test_update_increments_tag() {
        let mut bar = Model::default();
        for _ in 0..5 {
            let before = bar.tag();
            bar.update(0.3);
            assert_eq!(bar.tag(), before + 1);
        }
    }

    #[test]
    fn test_update_from_frame() {
        let mut bar = Model::default();
        let tag = bar.tag();
        assert!(bar.update_from_frame(0.4, tag));
        assert_eq!(bar.target(), 0.4);

        let stale = bar.tag() - 1;
        let tag_before = bar.tag();
        assert!(!bar.update_from_frame(0.9, stale));
        assert_eq!(bar.target(), 0.4);
        assert_eq!(bar.tag(), tag_before);
    }

    #[test]
    fn test_incr_and_decr() {
        let mut bar = Model::default();
        bar.incr(None);
        assert_eq!(bar.target(), 0.25);
        bar.incr(Some(0.1));
        assert!((bar.target() - 0.35).abs() < 1e-9);
        bar.decr(None);
        assert!((bar.target() - 0.10).abs() < 1e-9);
        bar.decr(Some(0.8));
        assert_eq!(bar.target(), 0.0);
        bar.incr(Some(5.0));
        assert_eq!(bar.target(), 1.0);
    }

    #[test]
    fn test_tick_moves_display_toward_target() {
        let mut bar = Model::default();
        bar.update(0.5);
        bar.tick();
        assert!(bar.progress() > 0.0);
        assert!(bar.progress() < 0.5);
        assert!(bar.is_animating());
    }

    #[test]
    fn test_tick_animates_downward() {
        let mut bar = Model::default().with_spring_options(20.0, 9.0);
        bar.update(0.8);
        for _ in 0..600 {
            bar.tick();
        }
        assert_eq!(bar.progress(), 0.8);

        bar.decr(Some(0.5));
        bar.tick();
        assert!(bar.progress() < 0.8);
        for _ in 0..600 {
            bar.tick();
        }
        assert!((bar.progress() - 0.3).abs() < 1e-9);
        assert!(!bar.is_animating());
    }

    #[test]
    fn test_equilibrium_snaps_to_target() {
        let mut bar = Model::default();
        bar.update(0.5);
        bar.percent_shown = 0.4995;
        bar.velocity = 0.001;
        bar.tick();
        assert_eq!(bar.progress(), 0.5);
        assert_eq!(bar.velocity(), 0.0);
    }

    #[test]
    fn test_custom_equilibrium() {
        let loose = Equilibrium {
            distance: 0.1,
            velocity: 1.0,
        };
        let mut bar = Model::default().with_equilibrium(loose);
        bar.update(0.5);
        bar.percent_shown = 0.45;
        assert!(!bar.is_animating());
        bar.tick();
        assert_eq!(bar.progress(), 0.5);
    }

    #[test]
    fn test_display_stays_within_bounds() {
        let mut bar = Model::default().with_spring_options(200.0, 0.1);
        bar.update(1.0);
        for _ in 0..300 {
            bar.tick();
            assert!((0.0..=1.0).contains(&bar.progress()));
        }
    }

    #[test]
    fn test_negative_spring_parameters_do_not_panic() {
        let mut bar = Model::default()
            .with_spring_options(-5.0, -1.0)
            .with_terminal_width(80);
        bar.update(0.5);
        for _ in 0..100 {
            bar.tick();
        }
        assert!((0.0..=1.0).contains(&bar.progress()));
        assert!(bar.render().is_ok());
    }

    #[test]
    fn test_completion_fires_once() {
        let (calls, callback) = recorder();
        let mut bar = Model::default().on_complete(callback);

        bar.update(1.0);
        assert!(calls.lock().unwrap().is_empty());
        for _ in 0..200 {
            bar.tick();
        }
        bar.update(1.0);
        bar.tick();

        assert_eq!(*calls.lock().unwrap(), vec![ProgressState::Completed]);
        assert_eq!(bar.state(), ProgressState::Completed);
    }

    #[test]
    fn test_cancel_notifies_immediately() {
        let (calls, callback) = recorder();
        let mut bar = Model::default().on_complete(callback);
        bar.update(0.4);
        bar.cancel();
        assert_eq!(bar.state(), ProgressState::Cancelled);
        assert_eq!(*calls.lock().unwrap(), vec![ProgressState::Cancelled]);

        // Cancelled bars are frozen and never report completion.
        let shown = bar.progress();
        bar.update(1.0);
        for _ in 0..10 {
            bar.tick();
        }
        assert_eq!(bar.progress(), shown);
        assert_eq!(bar.state(), ProgressState::Cancelled);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_repeated_cancel_notifies_once() {
        let (calls, callback) = recorder();
        let mut bar = Model::default().on_complete(callback);
        bar.update(1.0);
        bar.tick();
        bar.cancel();
        bar.cancel();
        bar.fail();
        bar.fail();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                ProgressState::Completed,
                ProgressState::Cancelled,
                ProgressState::Error
            ]
        );
    }

    #[test]
    fn test_fail_notifies_with_error() {
        let (calls, callback) = recorder();
        let mut bar = Model::default().on_complete(callback);
        bar.update(0.2);
        bar.fail();
        assert_eq!(bar.state(), ProgressState::Error);
        assert_eq!(*calls.lock().unwrap(), vec![ProgressState::Error]);
    }

    #[test]
    fn test_reset() {
        let (calls, callback) = recorder();
        let mut bar = Model::default().on_complete(callback);
        bar.update(1.0);
        bar.tick();
        let tag = bar.tag();

        bar.reset();
        assert_eq!(bar.progress(), 0.0);
        assert_eq!(bar.target(), 0.0);
        assert_eq!(bar.velocity(), 0.0);
        assert_eq!(bar.state(), ProgressState::Idle);
        assert_eq!(bar.tag(), tag + 1);

        // The guard is cleared, so a second traversal notifies again.
        bar.update(1.0);
        bar.tick();
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_timer_disabled_by_default() {
        let mut bar = Model::default();
        bar.tick_at(Instant::now() + Duration::from_secs(10));
        assert_eq!(bar.target(), 0.0);
    }

    #[test]
    fn test_timer_increments_target() {
        let mut bar = Model::default()
            .with_step(0.5)
            .with_timer(Duration::from_millis(100));
        let t0 = Instant::now();

        bar.tick_at(t0 + Duration::from_millis(150));
        assert_eq!(bar.target(), 0.5);
        bar.tick_at(t0 + Duration::from_millis(200));
        assert_eq!(bar.target(), 0.5);
        bar.tick_at(t0 + Duration::from_millis(300));
        assert_eq!(bar.target(), 1.0);
        let tag = bar.tag();
        bar.tick_at(t0 + Duration::from_millis(450));
        assert_eq!(bar.tag(), tag);
    }

    #[test]
    fn test_metrics() {
        let mut bar = Model::default();
        bar.tick();
        assert!(bar.metrics().is_none());

        bar.enable_metrics();
        bar.update(0.5);
        for _ in 0..5 {
            bar.tick();
        }
        let metrics = bar.metrics().unwrap();
        assert_eq!(metrics.frames_rendered, 5);
        assert!(metrics.peak_frame_time >= metrics.avg_frame_time);

        bar.disable_metrics();
        assert!(bar.metrics().is_none());
        bar.enable_metrics();
        assert_eq!(bar.metrics().unwrap().frames_rendered, 0);
    }

    #[test]
    fn test_render_uses_displayed_progress() {
        let mut bar = Model::default()
            .with_terminal_width(120)
            .with_width(40)
            .with_color_profile(ColorProfile::Ascii);
        bar.update(1.0);
        let line = bar.render().unwrap();
        assert!(line.contains("  0%"));
        assert!(!line.contains('#'));

        bar.percent_shown = 1.0;
        assert!(bar.render().unwrap().contains("100%"));
    }

    #[test]
    fn test_render_as_ignores_animation() {
        let bar = Model::default()
            .with_terminal_width(120)
            .with_width(40)
            .with_percent_formatter(format_as_fraction(4));
        let line = lipgloss_extras::lipgloss::strip_ansi(&bar.render_as(0.5).unwrap());
        assert!(line.contains(" 2/4"));
    }

    #[test]
    fn test_view_swallows_style_errors() {
        let mut bar = Model::default().with_terminal_width(80);
        bar.style.start_color = "bogus".to_string();
        assert!(bar.render().is_err());
        assert_eq!(bar.view(), "");
    }

    #[test]
    fn test_fluent_chain() {
        let bar = Model::default()
            .with_gradient("#ff0000", "#00ff00", true)
            .unwrap()
            .with_width(60)
            .with_hint("Loading...")
            .without_percentage()
            .with_style_preset("dots")
            .unwrap()
            .with_spring_options(25.0, 1.5);

        assert!(bar.style.use_gradient);
        assert!(bar.style.scale_gradient);
        assert_eq!(bar.style.start_color, "#ff0000");
        assert_eq!(bar.style.end_color, "#00ff00");
        assert_eq!(bar.style.max_width, 60);
        assert_eq!(bar.style.hint.as_deref(), Some("Loading..."));
        assert!(!bar.style.show_percentage);
        assert_eq!((bar.style.full_char, bar.style.empty_char), ('●', '○'));
        assert_eq!(bar.spring().frequency, 25.0);
        assert_eq!(bar.spring().damping, 1.5);
    }

    #[test]
    fn test_preset_gradient() {
        let bar = Model::default().with_preset_gradient("ocean", false).unwrap();
        assert_eq!(bar.style.start_color, "#0066cc");
        assert_eq!(bar.style.end_color, "#00cccc");
        assert!(matches!(
            Model::default().with_preset_gradient("plaid", false),
            Err(Error::UnknownPresetName { .. })
        ));
    }

    #[test]
    fn test_fluent_color_validation() {
        assert!(Model::default().with_solid_fill("#12").is_err());
        assert!(Model::default().with_gradient("#fff", "nope", false).is_err());
        assert!(Model::default().with_style_preset("nope").is_err());
    }

    #[test]
    fn test_from_theme() {
        let bar = Model::from_theme("matrix").unwrap();
        assert_eq!(bar.style.start_color, "#003300");
        assert_eq!(bar.style.end_color, "#00ff00");
        assert!(Model::from_theme("unknown").is_err());
    }

    #[test]
    fn test_themes_are_not_shared() {
        let mut a = Model::from_theme("fire").unwrap();
        a.style.start_color = "#000000".to_string();
        let b = Model::from_theme("fire").unwrap();
        assert_eq!(b.style.start_color, "#8B0000");
    }

    #[test]
    fn test_unique_ids() {
        let a = new(&[]);
        let b = new(&[]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_handle_frame_msg() {
        let mut bar = Model::default();
        let _ = bar.set_percent(0.5);

        let result = bar.handle_msg(Box::new(bar.frame_msg()));
        assert!(result.is_some());
        assert!(bar.progress() > 0.0);
    }

    #[test]
    fn test_handle_frame_msg_with_wrong_id_or_tag() {
        let mut bar = Model::default();
        bar.update(0.5);

        let wrong_id = FrameMsg {
            id: bar.id() + 999,
            tag: bar.tag(),
        };
        assert!(bar.handle_msg(Box::new(wrong_id)).is_none());

        let stale = FrameMsg {
            id: bar.id(),
            tag: bar.tag() - 1,
        };
        assert!(bar.handle_msg(Box::new(stale)).is_none());
        assert_eq!(bar.progress(), 0.0);
    }

    #[test]
    fn test_handle_frame_msg_stops_at_rest() {
        let mut bar = Model::default();
        assert!(bar.handle_msg(Box::new(bar.frame_msg())).is_none());
    }

    #[test]
    fn test_handle_ignores_other_messages() {
        let mut bar = Model::default();
        assert!(bar.handle_msg(Box::new(42_u32)).is_none());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProgressState::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let s: ProgressState = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(s, ProgressState::Running);
        assert_eq!(ProgressState::Completed.to_string(), "completed");
    }
}
