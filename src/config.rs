//! YAML configuration for grid generation.
//!
//! ```yaml
//! min_cell_px: 20
//! max_cell_px: 50
//! integer_x: true
//! alignment_x: one_based
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::step::{DEFAULT_MAX_CELL_PX, DEFAULT_MIN_CELL_PX};
use crate::grid::Alignment;

/// Grid generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Smallest on-screen grid cell in pixels.
    #[serde(default = "default_min_cell_px")]
    pub min_cell_px: f64,

    /// Largest on-screen grid cell in pixels.
    #[serde(default = "default_max_cell_px")]
    pub max_cell_px: f64,

    /// Integral steps on the horizontal axis.
    #[serde(default)]
    pub integer_x: bool,

    /// Integral steps on the vertical axis.
    #[serde(default)]
    pub integer_y: bool,

    /// Display alignment of the horizontal axis.
    #[serde(default)]
    pub alignment_x: Alignment,

    /// Display alignment of the vertical axis.
    #[serde(default)]
    pub alignment_y: Alignment,

    /// Choose steps automatically from the visible range.
    #[serde(default = "default_auto_step")]
    pub auto_step: bool,
}

fn default_min_cell_px() -> f64 {
    DEFAULT_MIN_CELL_PX
}
fn default_max_cell_px() -> f64 {
    DEFAULT_MAX_CELL_PX
}
fn default_auto_step() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_cell_px: default_min_cell_px(),
            max_cell_px: default_max_cell_px(),
            integer_x: false,
            integer_y: false,
            alignment_x: Alignment::default(),
            alignment_y: Alignment::default(),
            auto_step: default_auto_step(),
        }
    }
}

impl GridConfig {
    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        log::debug!("loaded grid config from {}", path.display());
        Ok(config)
    }

    /// Parse from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the offending line.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::ConfigParse {
            line: e.location().map_or(0, |l| l.line()),
            message: e.to_string(),
        })
    }

    /// Load from a file, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("using default grid config, {}: {e}", path.display());
            Self::default()
        })
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| Error::ConfigParse { line: 0, message: e.to_string() })
    }
}
