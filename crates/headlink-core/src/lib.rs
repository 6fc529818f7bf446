//! Headlink Core - pose wire types, calibration, projection, and staleness
//!
//! This crate provides the foundational pieces of the Headlink system:
//! - The raw pose record layout shared with the external producer process
//! - Staleness tracking over successive pose reads
//! - Neutral-pose calibration and base-camera capture
//! - Projection of raw poses into host camera values
//! - The host camera trait and the tracker configuration

pub mod calibration;
pub mod camera;
pub mod config;
pub mod pose;
pub mod projection;
pub mod staleness;

pub use calibration::{CalibrationOffset, OffsetCalibrator};
pub use camera::{CameraAxis, HostCamera};
pub use config::{AxisFlips, ConfigError, ProjectionConfig, TrackerConfig, DEFAULT_CHANNEL_NAME};
pub use pose::{Axis, RawPoseRecord, POSE_AXES};
pub use projection::{CameraPose, PoseProjector, DEG_PER_RAD};
pub use staleness::{Freshness, PollInterval, StalenessTracker};
