//! Named collection of progress bars rendered together.

use crate::error::Result;
use crate::progress::Model;
use tracing::debug;

/// An ordered, name-keyed set of bars.
///
/// Bars render one per line in the order they were first added. Adding a
/// bar under an existing name replaces it in place.
///
/// # Examples
///
/// ```rust
/// use bubbletea_progress::{ProgressGroup, progress::Model};
///
/// let mut group = ProgressGroup::new();
/// group.add("download", Model::default().with_terminal_width(80));
/// group.add("extract", Model::default().with_terminal_width(80));
///
/// group.update("download", 0.5);
/// group.update("missing", 0.5); // ignored
/// group.tick_all();
///
/// assert_eq!(group.render().unwrap().lines().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ProgressGroup {
    bars: Vec<(String, Model)>,
}

impl ProgressGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bar` under `name`, replacing any bar already registered there.
    pub fn add(&mut self, name: impl Into<String>, bar: Model) {
        let name = name.into();
        debug!(name = %name, id = bar.id(), "adding bar to group");
        match self.position(&name) {
            Some(i) => self.bars[i].1 = bar,
            None => self.bars.push((name, bar)),
        }
    }

    /// Removes and returns the bar called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Model> {
        let i = self.position(name)?;
        debug!(name, "removing bar from group");
        Some(self.bars.remove(i).1)
    }

    /// The bar called `name`.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.bars.iter().find(|(n, _)| n == name).map(|(_, bar)| bar)
    }

    /// Mutable access to the bar called `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.bars
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, bar)| bar)
    }

    /// Updates the named bar; unknown names are ignored.
    pub fn update(&mut self, name: &str, progress: f64) {
        if let Some(bar) = self.get_mut(name) {
            bar.update(progress);
        }
    }

    /// Ticks every bar once.
    pub fn tick_all(&mut self) {
        for (_, bar) in &mut self.bars {
            bar.tick();
        }
    }

    /// Sets every bar's target to `progress`.
    pub fn update_all(&mut self, progress: f64) {
        for (_, bar) in &mut self.bars {
            bar.update(progress);
        }
    }

    /// Resets every bar to idle at 0%.
    pub fn reset_all(&mut self) {
        for (_, bar) in &mut self.bars {
            bar.reset();
        }
    }

    /// Renders every bar, keyed by name, in insertion order.
    ///
    /// # Errors
    ///
    /// The first bar whose style holds a malformed color.
    pub fn render_all(&self) -> Result<Vec<(String, String)>> {
        self.bars
            .iter()
            .map(|(name, bar)| Ok((name.clone(), bar.render()?)))
            .collect()
    }

    /// Renders every bar, newline-joined, in insertion order.
    ///
    /// # Errors
    ///
    /// The first bar whose style holds a malformed color.
    pub fn render(&self) -> Result<String> {
        let lines: Vec<String> = self
            .render_all()?
            .into_iter()
            .map(|(_, line)| line)
            .collect();
        Ok(lines.join("\n"))
    }

    /// True when every bar is complete. Vacuously true when empty.
    pub fn is_all_complete(&self) -> bool {
        self.bars.iter().all(|(_, bar)| bar.is_complete())
    }

    /// True when any bar is still animating.
    pub fn is_any_animating(&self) -> bool {
        self.bars.iter().any(|(_, bar)| bar.is_animating())
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the group has no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Names and bars in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.bars.iter().map(|(name, bar)| (name.as_str(), bar))
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bars.iter().map(|(name, _)| name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.bars.iter().position(|(n, _)| n == name)
    }
}
