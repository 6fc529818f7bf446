//! Tracker configuration
//!
//! The historical plugin generations diverged on locking, rotation offsets,
//! and axis handedness. One parameterized configuration covers them all
//! instead of forking components per variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Region name used by the stock producer.
pub const DEFAULT_CHANNEL_NAME: &str = "facetracknoir-wine-shm";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("channel name must not be empty")]
    EmptyChannelName,
    #[error("{name} must be positive, got {value}")]
    NonPositiveInterval { name: &'static str, value: f64 },
    #[error("unit scale must be a nonzero finite number, got {0}")]
    InvalidUnitScale(f64),
}

/// Complete tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Name of the producer's shared memory region.
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
    /// Hold a shared advisory lock for the duration of each read. Disabling
    /// this accepts a torn-read window in exchange for never blocking on the
    /// producer.
    #[serde(default = "default_true")]
    pub advisory_lock: bool,
    /// Consecutive unchanged reads tolerated before the producer is judged
    /// silent.
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_ticks: u32,
    /// Recheck cadence in seconds while the producer is believed idle.
    #[serde(default = "default_throttled_interval")]
    pub throttled_interval_secs: f64,
    /// Retry cadence in seconds while the region cannot be opened.
    #[serde(default = "default_retry_interval")]
    pub retry_interval_secs: f64,
    /// Projection arithmetic settings.
    #[serde(default)]
    pub projection: ProjectionConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            channel_name: default_channel_name(),
            advisory_lock: true,
            idle_threshold_ticks: default_idle_threshold(),
            throttled_interval_secs: default_throttled_interval(),
            retry_interval_secs: default_retry_interval(),
            projection: ProjectionConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Check the configuration for values the tracker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_name.is_empty() {
            return Err(ConfigError::EmptyChannelName);
        }
        if self.throttled_interval_secs <= 0.0 {
            return Err(ConfigError::NonPositiveInterval {
                name: "throttled_interval_secs",
                value: self.throttled_interval_secs,
            });
        }
        if self.retry_interval_secs <= 0.0 {
            return Err(ConfigError::NonPositiveInterval {
                name: "retry_interval_secs",
                value: self.retry_interval_secs,
            });
        }
        self.projection.validate()
    }
}

/// Settings for turning raw poses into host camera values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Converts the producer's translation units to the host's native unit.
    /// The stock producer writes millimeters; hosts measure meters.
    #[serde(default = "default_unit_scale")]
    pub unit_scale: f64,
    /// Apply a captured rotation offset (the richer variant). When false,
    /// raw rotation projects directly.
    #[serde(default)]
    pub rotation_offset: bool,
    /// Per-axis sign flips for hosts with opposite handedness.
    #[serde(default)]
    pub flip: AxisFlips,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            unit_scale: default_unit_scale(),
            rotation_offset: false,
            flip: AxisFlips::default(),
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_scale == 0.0 || !self.unit_scale.is_finite() {
            return Err(ConfigError::InvalidUnitScale(self.unit_scale));
        }
        Ok(())
    }
}

/// Which axes are negated before being pushed to the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AxisFlips {
    #[serde(default)]
    pub x: bool,
    #[serde(default)]
    pub y: bool,
    #[serde(default)]
    pub z: bool,
    #[serde(default)]
    pub yaw: bool,
    #[serde(default)]
    pub pitch: bool,
    #[serde(default)]
    pub roll: bool,
}

fn default_channel_name() -> String {
    DEFAULT_CHANNEL_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_idle_threshold() -> u32 {
    5
}

fn default_throttled_interval() -> f64 {
    2.0
}

fn default_retry_interval() -> f64 {
    1.0
}

fn default_unit_scale() -> f64 {
    1e-3
}
