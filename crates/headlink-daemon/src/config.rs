//! Configuration loading and validation

use anyhow::Result;
use headlink_core::{AxisFlips, ProjectionConfig, TrackerConfig, DEFAULT_CHANNEL_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub projection: ProjectionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Tick cadence in seconds while the tracker asks to be called every
    /// frame (the negative-interval sentinel).
    #[serde(default = "default_frame_interval")]
    pub frame_interval_secs: f64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            frame_interval_secs: default_frame_interval(),
        }
    }
}

fn default_frame_interval() -> f64 {
    1.0 / 60.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Name of the producer's shared memory region
    #[serde(default = "default_channel_name")]
    pub name: String,
    /// Hold a shared advisory lock around each read
    #[serde(default = "default_true")]
    pub advisory_lock: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: default_channel_name(),
            advisory_lock: true,
        }
    }
}

fn default_channel_name() -> String {
    DEFAULT_CHANNEL_NAME.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Unchanged reads tolerated before the producer is judged silent
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_ticks: u32,
    /// Recheck cadence in seconds while the producer is idle
    #[serde(default = "default_throttled_interval")]
    pub throttled_interval_secs: f64,
    /// Retry cadence in seconds while the region cannot be opened
    #[serde(default = "default_retry_interval")]
    pub retry_interval_secs: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            idle_threshold_ticks: default_idle_threshold(),
            throttled_interval_secs: default_throttled_interval(),
            retry_interval_secs: default_retry_interval(),
        }
    }
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSection {
    /// Producer translation units to host units (millimeters to meters)
    #[serde(default = "default_unit_scale")]
    pub unit_scale: f64,
    /// Apply a captured rotation offset on reset-view
    #[serde(default)]
    pub rotation_offset: bool,
    /// Per-axis sign flips for opposite-handed hosts
    #[serde(default)]
    pub flip: AxisFlips,
}

impl Default for ProjectionSection {
    fn default() -> Self {
        Self {
            unit_scale: default_unit_scale(),
            rotation_offset: false,
            flip: AxisFlips::default(),
        }
    }
}

fn default_unit_scale() -> f64 {
    1e-3
}

impl Config {
    /// Convert to the core TrackerConfig
    pub fn to_tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            channel_name: self.channel.name.clone(),
            advisory_lock: self.channel.advisory_lock,
            idle_threshold_ticks: self.tracking.idle_threshold_ticks,
            throttled_interval_secs: self.tracking.throttled_interval_secs,
            retry_interval_secs: self.tracking.retry_interval_secs,
            projection: ProjectionConfig {
                unit_scale: self.projection.unit_scale,
                rotation_offset: self.projection.rotation_offset,
                flip: self.projection.flip,
            },
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        config
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Config::default()
    };
    anyhow::ensure!(
        config.daemon.frame_interval_secs > 0.0,
        "daemon.frame_interval_secs must be positive"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config.channel.name, DEFAULT_CHANNEL_NAME);
        assert!(config.channel.advisory_lock);
        assert_eq!(config.tracking.idle_threshold_ticks, 5);
        assert_eq!(config.projection.unit_scale, 1e-3);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            [channel]
            name = "custom-region"
            advisory_lock = false

            [tracking]
            idle_threshold_ticks = 10

            [projection]
            rotation_offset = true

            [projection.flip]
            roll = true
            "#,
        )
        .expect("parse");

        let tracker = config.to_tracker_config();
        assert_eq!(tracker.channel_name, "custom-region");
        assert!(!tracker.advisory_lock);
        assert_eq!(tracker.idle_threshold_ticks, 10);
        assert!(tracker.projection.rotation_offset);
        assert!(tracker.projection.flip.roll);
        assert!(!tracker.projection.flip.x);
        assert!(tracker.validate().is_ok());
    }
}
