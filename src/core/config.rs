//! Navigation configuration
//!
//! Tunables for planning and route execution. Supports saving and loading in
//! RON (Rusty Object Notation) and JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Geometry of the serpentine exploration sweep, in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Distance of the two sweep columns from the terrain edges
    pub margin: i32,
    /// Z distance between consecutive lanes
    pub lane_spacing: i32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            margin: 26,
            lane_spacing: 52,
        }
    }
}

/// Navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Grid cell spacing in world units
    pub spacing: f32,
    /// Terrain cells per side
    pub range: i32,
    /// Planar distance at which a checkpoint counts as reached
    pub snap_distance: f32,
    /// Distance at which an untagged treasure is noticed
    pub detect_radius: f32,
    /// Distance the agent walks per tick
    pub step_size: f32,
    /// Grid cell of the treasure that gets a return leg
    pub home_treasure: Option<(i32, i32)>,
    /// Exploration sweep geometry
    pub sweep: SweepConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            spacing: 150.0,
            range: 512,
            snap_distance: 10.0,
            detect_radius: 4000.0,
            step_size: 10.0,
            home_treasure: Some((298, 451)),
            sweep: SweepConfig::default(),
        }
    }
}

impl NavConfig {
    /// Set the grid spacing
    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the terrain range
    #[must_use]
    pub fn with_range(mut self, range: i32) -> Self {
        self.range = range;
        self
    }

    /// Set the snap threshold
    #[must_use]
    pub fn with_snap_distance(mut self, snap_distance: f32) -> Self {
        self.snap_distance = snap_distance;
        self
    }

    /// Set the treasure detection radius
    #[must_use]
    pub fn with_detect_radius(mut self, detect_radius: f32) -> Self {
        self.detect_radius = detect_radius;
        self
    }

    /// Set the per-tick step size
    #[must_use]
    pub fn with_step_size(mut self, step_size: f32) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set (or clear) the home treasure cell
    #[must_use]
    pub fn with_home_treasure(mut self, cell: Option<(i32, i32)>) -> Self {
        self.home_treasure = cell;
        self
    }

    /// Set the sweep geometry
    #[must_use]
    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    /// Check that every tunable is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spacing > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spacing must be positive, got {}",
                self.spacing
            )));
        }
        if self.range <= 0 {
            return Err(ConfigError::Invalid(format!(
                "range must be positive, got {}",
                self.range
            )));
        }
        if !(self.snap_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_distance must be positive, got {}",
                self.snap_distance
            )));
        }
        if !(self.detect_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "detect_radius must be positive, got {}",
                self.detect_radius
            )));
        }
        if !(self.step_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "step_size must be positive, got {}",
                self.step_size
            )));
        }
        if self.sweep.margin < 0 || self.sweep.lane_spacing <= 0 {
            return Err(ConfigError::Invalid(format!(
                "sweep needs margin >= 0 and lane_spacing > 0, got {:?}",
                self.sweep
            )));
        }
        Ok(())
    }

    /// Parse and validate a RON document
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: NavConfig =
            ron::from_str(source).map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: NavConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// A value is out of its allowed range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
