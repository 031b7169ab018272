//! Canvas and snapping configuration.

use crate::snap::SnapMode;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default number of interior grid divisions (the canvas is split in quarters).
pub const DEFAULT_GRID_LINE_COUNT: u32 = 3;

/// Default snap distance in canvas units.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 5.0;

/// Maximum number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Snapping options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Number of interior vertical divisions. Grid spacing is
    /// `canvas width / (grid_line_count + 1)`.
    pub grid_line_count: u32,
    /// Distance for canvas-center and item-edge snapping.
    pub threshold: f64,
    /// Distance for grid snapping.
    pub grid_threshold: f64,
    /// Which targets are active.
    pub mode: SnapMode,
    /// Maximum number of undo entries.
    pub history_limit: usize,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_line_count: DEFAULT_GRID_LINE_COUNT,
            threshold: DEFAULT_SNAP_THRESHOLD,
            grid_threshold: DEFAULT_SNAP_THRESHOLD,
            mode: SnapMode::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl SnapConfig {
    /// Spacing between grid lines for a canvas of the given width.
    pub fn grid_spacing(&self, canvas_width: f64) -> f64 {
        canvas_width / (self.grid_line_count as f64 + 1.0)
    }

    /// Check thresholds are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("threshold", self.threshold), ("grid_threshold", self.grid_threshold)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}

/// Full configuration for a canvas session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in canvas units.
    pub width: f64,
    /// Canvas height in canvas units.
    pub height: f64,
    /// Snapping options.
    pub snap: SnapConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 300.0,
            snap: SnapConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Canvas dimensions.
    pub fn canvas_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        self.snap.validate()
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded canvas configuration from {}", path.as_ref().display());
        Ok(config)
    }
}
