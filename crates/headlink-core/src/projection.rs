//! Raw pose to host camera projection

use crate::calibration::CalibrationOffset;
use crate::config::ProjectionConfig;
use crate::pose::{Axis, RawPoseRecord};

/// Degrees per radian; the producer writes rotation in radians, hosts take
/// degrees.
pub const DEG_PER_RAD: f64 = 180.0 / std::f64::consts::PI;

/// Values to push to the host camera for one fresh pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Absolute translation values, or `None` when translation projection is
    /// disabled and the host's translation fields are to be left untouched.
    pub translation: Option<[f64; 3]>,
    /// Heading in degrees.
    pub heading: f64,
    /// Pitch in degrees.
    pub pitch: f64,
    /// Roll in degrees.
    pub roll: f64,
}

/// Combines a raw pose with calibration offsets and per-axis transforms.
#[derive(Debug)]
pub struct PoseProjector {
    config: ProjectionConfig,
}

impl PoseProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project a fresh raw pose into host camera values.
    ///
    /// Translation per axis is `(raw - offset) * unit_scale * sign + base`,
    /// gated by `translation_enabled`. Rotation per axis is
    /// `(raw - offset) * 180/π * sign` and is never gated: disabling
    /// translation must not change rotation output.
    pub fn project(
        &self,
        raw: &RawPoseRecord,
        offset: &CalibrationOffset,
        translation_enabled: bool,
    ) -> CameraPose {
        let flip = &self.config.flip;
        let translation = if translation_enabled {
            let t = raw.translation();
            let mut out = [0.0; 3];
            let flips = [flip.x, flip.y, flip.z];
            for axis in 0..3 {
                let delta = (t[axis] - offset.translation[axis]) * self.config.unit_scale;
                out[axis] = delta * sign(flips[axis]) + offset.base_camera[axis];
            }
            Some(out)
        } else {
            None
        };

        CameraPose {
            translation,
            heading: self.rotation_axis(raw, offset, Axis::Yaw, flip.yaw),
            pitch: self.rotation_axis(raw, offset, Axis::Pitch, flip.pitch),
            roll: self.rotation_axis(raw, offset, Axis::Roll, flip.roll),
        }
    }

    fn rotation_axis(
        &self,
        raw: &RawPoseRecord,
        offset: &CalibrationOffset,
        axis: Axis,
        flipped: bool,
    ) -> f64 {
        let offset_index = axis.index() - Axis::Yaw.index();
        (raw.data[axis.index()] - offset.rotation[offset_index]) * DEG_PER_RAD * sign(flipped)
    }
}

fn sign(flipped: bool) -> f64 {
    if flipped {
        -1.0
    } else {
        1.0
    }
}
