// SPDX-License-Identifier: MIT
//
// Canvas configuration, read from TOML.
//
//   cols = 100          # omitted: probe the terminal
//   rows = 30
//   output = true       # false: headless, nothing is written
//   font_dir = "font"   # where font_<size>.json live
//   text_size = 5
//   color = "cyan"      # initial drawing color
//
// Every key is optional. An empty file is the default configuration.

use std::path::{Path, PathBuf};

use qp_term::color::PaletteColor;
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::{CanvasError, Result};
use crate::font::DEFAULT_FONT_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width in character cells. `None` asks the terminal.
    pub cols: Option<u16>,
    /// Height in character cells. `None` asks the terminal.
    pub rows: Option<u16>,
    /// Whether drawing calls write escape sequences to the sink.
    pub output: bool,
    /// Directory holding the glyph tables.
    pub font_dir: PathBuf,
    /// Font size used by text calls that don't name one.
    pub text_size: u8,
    /// Drawing color active from construction.
    #[serde(deserialize_with = "palette_name")]
    pub color: Option<PaletteColor>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            cols: None,
            rows: None,
            output: true,
            font_dir: PathBuf::from("font"),
            text_size: DEFAULT_FONT_SIZE,
            color: None,
        }
    }
}

impl CanvasConfig {
    /// A configuration with fixed dimensions and otherwise defaults.
    #[must_use]
    pub fn sized(cols: u16, rows: u16) -> Self {
        Self {
            cols: Some(cols),
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// [`CanvasError::Config`] on malformed TOML, unknown keys or an unknown
    /// color name.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// [`CanvasError::ConfigRead`] if the file can't be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CanvasError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

fn palette_name<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<PaletteColor>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|name| name.parse().map_err(de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(CanvasConfig::from_toml_str("").unwrap(), CanvasConfig::default());
    }

    #[test]
    fn defaults() {
        let config = CanvasConfig::default();
        assert!(config.output);
        assert_eq!(config.text_size, 5);
        assert_eq!(config.font_dir, PathBuf::from("font"));
        assert_eq!((config.cols, config.rows), (None, None));
    }

    #[test]
    fn full_document() {
        let config = CanvasConfig::from_toml_str(
            r#"
            cols = 100
            rows = 30
            output = false
            font_dir = "/usr/share/qpix"
            text_size = 1
            color = "Gray"
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            CanvasConfig {
                cols: Some(100),
                rows: Some(30),
                output: false,
                font_dir: PathBuf::from("/usr/share/qpix"),
                text_size: 1,
                color: Some(PaletteColor::Grey),
            }
        );
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = CanvasConfig::from_toml_str("cols = 40").unwrap();
        assert_eq!(config.cols, Some(40));
        assert_eq!(config.rows, None);
        assert!(config.output);
    }

    #[test]
    fn unknown_color_is_rejected() {
        let err = CanvasConfig::from_toml_str(r#"color = "mauve""#).unwrap_err();
        assert!(matches!(err, CanvasError::Config(_)));
        assert!(err.to_string().contains("mauve"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = CanvasConfig::from_toml_str("colums = 3").unwrap_err();
        assert!(matches!(err, CanvasError::Config(_)));
    }

    #[test]
    fn out_of_range_dimension_is_rejected() {
        assert!(CanvasConfig::from_toml_str("cols = 70000").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qpix.toml");
        std::fs::write(&path, "rows = 12\ncolor = \"red\"\n").unwrap();
        let config = CanvasConfig::load(&path).unwrap();
        assert_eq!(config.rows, Some(12));
        assert_eq!(config.color, Some(PaletteColor::Red));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CanvasConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CanvasError::ConfigRead { .. }));
    }
}
