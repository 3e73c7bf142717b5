// SPDX-License-Identifier: MIT
//
// Failure modes that reach the caller.
//
// Drawing itself never fails: off-canvas pixels, unmapped glyphs and empty
// blit regions are quietly dropped. What does fail is I/O to the output
// stream, loading a font asset, and reading configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Writing escape sequences to the output stream failed.
    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),

    /// The glyph table for a font size could not be read.
    #[error("failed to load font size {size} from {}: {source}", path.display())]
    FontLoad {
        size: u8,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The glyph table for a font size is not valid JSON of the expected shape.
    #[error("font size {size} is not a valid glyph table: {source}")]
    FontParse {
        size: u8,
        #[source]
        source: serde_json::Error,
    },

    /// One glyph entry is malformed.
    #[error("font size {size}, glyph {key:?}: {reason}")]
    InvalidGlyph {
        size: u8,
        key: String,
        reason: &'static str,
    },

    /// A configuration file could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;
