//! Simulation configuration
//!
//! Loaded from RON; every field has a default so partial files work.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::SteeringTuning;
use crate::math::Bounds;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World rectangle agents wrap around
    pub bounds: Bounds,
    /// Seed for the world's random source
    pub seed: u64,
    /// Fixed timestep used by headless runs, in seconds
    pub tick_seconds: f32,
    /// Number of ticks averaged by the tick statistics
    pub stats_window: usize,
    /// Truncate the combined steering force to each vehicle's `max_force`
    pub clamp_steering_force: bool,
    /// Tuning given to newly spawned vehicles
    pub tuning: SteeringTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            seed: 0x5EED,
            tick_seconds: 1.0 / 60.0,
            stats_window: 120,
            clamp_steering_force: false,
            tuning: SteeringTuning::default(),
        }
    }
}

impl SimConfig {
    /// Set the world bounds
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the random seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the fixed timestep
    #[must_use]
    pub fn with_tick_seconds(mut self, tick_seconds: f32) -> Self {
        self.tick_seconds = tick_seconds;
        self
    }

    /// Enable or disable steering force truncation
    #[must_use]
    pub fn with_force_clamp(mut self, clamp: bool) -> Self {
        self.clamp_steering_force = clamp;
        self
    }

    /// Set the default vehicle tuning
    #[must_use]
    pub fn with_tuning(mut self, tuning: SteeringTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Check values that would break the simulation
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "bounds min {} must be below max {}",
                self.bounds.min, self.bounds.max
            )));
        }
        if !(self.tick_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_seconds must be positive, got {}",
                self.tick_seconds
            )));
        }
        if self.stats_window == 0 {
            return Err(ConfigError::Invalid("stats_window must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a RON document
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Render as pretty RON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Malformed document
    Parse(String),
    /// Serialization error
    Serialize(String),
    /// Well-formed but unusable values
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(e) => write!(f, "Config parse error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
