//! JSON snapshots of bars and groups.
//!
//! A bar snapshot captures its animation state, lifecycle state, physics and
//! full style. The custom percentage formatter cannot be persisted: it is
//! written as `null` and a restored bar falls back to the default ` NNN%`
//! text.
//!
//! `progress` and `target` are required. Every other key falls back to its
//! default when missing, so snapshots written by older versions keep
//! loading.

use crate::error::Result;
use crate::group::ProgressGroup;
use crate::progress::{reserve_id, Model, ProgressState, DEFAULT_INTERVAL, DEFAULT_STEP};
use crate::spring::{DEFAULT_DAMPING, DEFAULT_FPS, DEFAULT_FREQUENCY};
use crate::style::Style;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Persisted state of a single bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSnapshot {
    /// Identifier of the bar that wrote the snapshot; a fresh one is assigned
    /// when absent.
    #[serde(default)]
    pub id: Option<i64>,
    /// Frame tag.
    #[serde(default)]
    pub tag: i64,
    /// Displayed progress.
    pub progress: f64,
    /// Target progress.
    pub target: f64,
    /// Spring velocity.
    #[serde(default)]
    pub velocity: f64,
    /// Lifecycle state.
    #[serde(default)]
    pub state: ProgressState,
    /// Visual configuration.
    #[serde(default)]
    pub style: Style,
    /// Spring frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Spring stiffness.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Spring damping.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Increment for `incr` / `decr`.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Whether the auto-increment timer is on.
    #[serde(default)]
    pub timer_enabled: bool,
    /// Auto-increment period in seconds.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: f64,
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY
}

fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

fn default_interval_seconds() -> f64 {
    DEFAULT_INTERVAL.as_secs_f64()
}

impl Model {
    /// Captures the bar's persistable state.
    pub fn to_snapshot(&self) -> BarSnapshot {
        let spring = self.spring();
        BarSnapshot {
            id: Some(self.id()),
            tag: self.tag(),
            progress: self.progress(),
            target: self.target(),
            velocity: self.velocity(),
            state: self.state(),
            style: self.style.clone(),
            fps: spring.fps,
            frequency: spring.frequency,
            damping: spring.damping,
            step: self.step,
            timer_enabled: self.timer_enabled,
            interval_seconds: self.interval.as_secs_f64(),
        }
    }

    /// Rebuilds a bar from a snapshot.
    ///
    /// A bar restored in a terminal state does not fire its completion
    /// callback again.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) if the
    /// snapshot's style holds a malformed color.
    pub fn from_snapshot(snapshot: BarSnapshot) -> Result<Self> {
        snapshot.style.validate()?;

        let mut bar = Model::with_style(snapshot.style)
            .with_fps(snapshot.fps)
            .with_spring_options(snapshot.frequency, snapshot.damping)
            .with_step(snapshot.step);
        bar.timer_enabled = snapshot.timer_enabled;
        bar.interval = Duration::try_from_secs_f64(snapshot.interval_seconds.max(0.0))
            .unwrap_or(DEFAULT_INTERVAL);

        if let Some(id) = snapshot.id {
            bar.id = id;
            reserve_id(id);
        }
        bar.restore(
            snapshot.tag,
            snapshot.progress,
            snapshot.target,
            snapshot.velocity,
            snapshot.state,
        );
        Ok(bar)
    }

    /// Serializes the bar as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`](crate::Error::Serialization) if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Restores a bar from JSON produced by [`Model::to_json`].
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`](crate::Error::Serialization) for malformed
    /// JSON or a missing `progress` / `target`, and
    /// [`Error::InvalidColorFormat`](crate::Error::InvalidColorFormat) for a
    /// bad color.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Writes the bar's snapshot to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) when the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(id = self.id(), path = %path.display(), "saved progress snapshot");
        Ok(())
    }

    /// Loads a bar saved with [`Model::save_to_file`].
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) when the file cannot be read, plus the
    /// errors of [`Model::from_json`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bar = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(id = bar.id(), path = %path.display(), "loaded progress snapshot");
        Ok(bar)
    }
}

/// Persisted state of a group: a JSON object from bar name to
/// [`BarSnapshot`], in the group's order.
#[derive(Debug, Clone, Default)]
pub struct GroupSnapshot {
    /// Named bar snapshots in insertion order.
    pub bars: Vec<(String, BarSnapshot)>,
}

impl Serialize for GroupSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bars.len()))?;
        for (name, bar) in &self.bars {
            map.serialize_entry(name, bar)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GroupSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = GroupSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of bar names to bar snapshots")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<GroupSnapshot, A::Error> {
                let mut bars: Vec<(String, BarSnapshot)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, bar)) = access.next_entry::<String, BarSnapshot>()? {
                    // Later duplicates win, as with any JSON object.
                    match bars.iter_mut().find(|(n, _)| *n == name) {
                        Some(slot) => slot.1 = bar,
                        None => bars.push((name, bar)),
                    }
                }
                Ok(GroupSnapshot { bars })
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

impl ProgressGroup {
    /// Captures every bar's snapshot.
    pub fn to_snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            bars: self
                .iter()
                .map(|(name, bar)| (name.to_string(), bar.to_snapshot()))
                .collect(),
        }
    }

    /// Rebuilds a group from a snapshot, preserving order.
    ///
    /// # Errors
    ///
    /// The first bar that fails [`Model::from_snapshot`].
    pub fn from_snapshot(snapshot: GroupSnapshot) -> Result<Self> {
        let mut group = ProgressGroup::new();
        for (name, bar) in snapshot.bars {
            group.add(name, Model::from_snapshot(bar)?);
        }
        Ok(group)
    }

    /// Serializes the group as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`Error::Serialization`](crate::Error::Serialization) if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    /// Restores a group from JSON produced by [`ProgressGroup::to_json`].
    ///
    /// # Errors
    ///
    /// Same as [`Model::from_json`], for any bar.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Writes the group's snapshot to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) when the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(bars = self.len(), path = %path.display(), "saved group snapshot");
        Ok(())
    }

    /// Loads a group saved with [`ProgressGroup::save_to_file`].
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) when the file cannot be read, plus the
    /// errors of [`ProgressGroup::from_json`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let group = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(bars = group.len(), path = %path.display(), "loaded group snapshot");
        Ok(group)
    }
}
