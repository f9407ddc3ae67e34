//! Error types for progress bar configuration and persistence.
//!
//! Rendering never fails on a bad progress *value*; it clamps instead. The
//! errors here are all configuration errors raised at the call that caused
//! them: parsing a color, looking up a preset, or loading a snapshot.

use std::io;
use thiserror::Error;

/// Errors that can happen while configuring, rendering or restoring a bar.
#[derive(Error, Debug)]
pub enum Error {
    /// A color string was not `#RGB` or `#RRGGBB` hex.
    #[error("Invalid hex color: {0:?}")]
    InvalidColorFormat(String),

    /// A theme, gradient preset or glyph style name is not in the registry.
    ///
    /// `available` lists the valid keys, comma separated, in registry order.
    #[error("Unknown {kind}: {name}. Available: {available}")]
    UnknownPresetName {
        /// Which registry was searched (e.g. `"theme"`).
        kind: &'static str,
        /// The name that was requested.
        name: String,
        /// Comma separated list of valid names.
        available: String,
    },

    /// A persisted snapshot could not be parsed or is missing required fields.
    #[error("Malformed progress snapshot")]
    Serialization {
        /// Underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Reading or writing a snapshot file failed.
    #[error("I/O error")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn unknown_preset<'a>(
        kind: &'static str,
        name: &str,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Error::UnknownPresetName {
            kind,
            name: name.to_string(),
            available: available.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Result type alias for operations that can fail with a progress [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
