//! Engine configuration.
//!
//! Read from JSON; every field is optional and falls back to its default.
//!
//! ```json
//! { "viewport_width": 1024, "selection_color": "#3366ff" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use quokka_css::layout::DEFAULT_SELECTION_COLOR;
use quokka_css::{ColorValue, LayoutOptions};
use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Host-facing settings for one [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of the viewport and initial containing block, in px.
    pub viewport_width: f32,
    /// Height of the viewport and initial containing block, in px.
    pub viewport_height: f32,
    /// Fill painted beneath selected text.
    pub selection_color: ColorValue,
    /// Verify the fragment tree after every layout pass and fail the
    /// document on a violation. Debug builds always check and log.
    pub check_invariants: bool,
    /// Font file used for text measurement. Without one the engine looks
    /// for a system font, then falls back to approximate metrics.
    pub font_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            selection_color: DEFAULT_SELECTION_COLOR,
            check_invariants: false,
            font_path: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] when the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when the file cannot be read and
    /// [`LoadError::Json`] when it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The part of the configuration layout and paint read.
    #[must_use]
    pub const fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            selection_color: self.selection_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = EngineConfig::from_json(r#"{ "viewport_width": 1024 }"#).unwrap();
        assert!((config.viewport_width - 1024.0).abs() < f32::EPSILON);
        assert!((config.viewport_height - 600.0).abs() < f32::EPSILON);
        assert_eq!(config.selection_color, DEFAULT_SELECTION_COLOR);
        assert!(!config.check_invariants);
    }

    #[test]
    fn test_layout_options_carry_viewport_and_selection() {
        let config = EngineConfig {
            viewport_width: 320.0,
            selection_color: ColorValue::rgb(1, 2, 3),
            ..EngineConfig::default()
        };
        let options = config.layout_options();
        assert!((options.viewport_width - 320.0).abs() < f32::EPSILON);
        assert_eq!(options.selection_color, ColorValue::rgb(1, 2, 3));
    }
}
