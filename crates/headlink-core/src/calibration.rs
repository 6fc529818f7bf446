//! Neutral-pose and base-camera calibration

use crate::pose::RawPoseRecord;
use tracing::debug;

/// The "zero" pose and camera anchor against which raw poses are measured.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationOffset {
    /// Raw translation captured as neutral, in producer units.
    pub translation: [f64; 3],
    /// Raw rotation captured as neutral, in radians.
    pub rotation: [f64; 3],
    /// Host camera position at calibration time; projected translation
    /// deltas are added to this anchor.
    pub base_camera: [f64; 3],
}

/// Captures and holds the calibration offset.
///
/// All operations are pure snapshots of the single pose or position passed
/// in: the calibrator never reads the shared channel and never toggles
/// tracking. The offset is owned here exclusively; consumers get copies.
#[derive(Debug)]
pub struct OffsetCalibrator {
    rotation_offset: bool,
    offset: CalibrationOffset,
}

impl OffsetCalibrator {
    /// `rotation_offset` selects the richer variant in which reset-view also
    /// zeroes rotation; when false the rotation offset stays at zero and raw
    /// rotation projects directly.
    pub fn new(rotation_offset: bool) -> Self {
        Self {
            rotation_offset,
            offset: CalibrationOffset::default(),
        }
    }

    /// Capture the record's translation as the new neutral. Used when
    /// (re-)enabling tracking with translation active, so head translation
    /// is measured relative to "now".
    pub fn calibrate_translation(&mut self, raw: &RawPoseRecord) {
        self.offset.translation = raw.translation();
        debug!(offset = ?self.offset.translation, "Translation offset calibrated");
    }

    /// Explicit reset-view request: re-derive the translation neutral and,
    /// in the rotation-offset variant, the rotation neutral too.
    pub fn reset_view(&mut self, raw: &RawPoseRecord) {
        self.offset.translation = raw.translation();
        if self.rotation_offset {
            self.offset.rotation = raw.rotation();
        }
        debug!(
            translation = ?self.offset.translation,
            rotation = ?self.offset.rotation,
            "View reset"
        );
    }

    /// Record the host camera's own position as the anchor projected
    /// translation deltas are added to. Invoked on enable and on host scene
    /// changes so absolute deltas stay sensible across scene resets.
    pub fn capture_base_camera(&mut self, position: [f64; 3]) {
        self.offset.base_camera = position;
        debug!(base = ?position, "Base camera position captured");
    }

    /// Value snapshot of the current offset.
    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(data: [f64; 6]) -> RawPoseRecord {
        RawPoseRecord {
            data,
            ..Default::default()
        }
    }

    #[test]
    fn test_calibrate_translation_snapshots_translation_only() {
        let mut calibrator = OffsetCalibrator::new(true);
        calibrator.calibrate_translation(&pose([1.0, 2.0, 3.0, 0.4, 0.5, 0.6]));
        let offset = calibrator.offset();
        assert_eq!(offset.translation, [1.0, 2.0, 3.0]);
        assert_eq!(offset.rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reset_view_with_rotation_offset() {
        let mut calibrator = OffsetCalibrator::new(true);
        calibrator.reset_view(&pose([1.0, 2.0, 3.0, 0.4, 0.5, 0.6]));
        let offset = calibrator.offset();
        assert_eq!(offset.translation, [1.0, 2.0, 3.0]);
        assert_eq!(offset.rotation, [0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_reset_view_without_rotation_offset() {
        let mut calibrator = OffsetCalibrator::new(false);
        calibrator.reset_view(&pose([1.0, 2.0, 3.0, 0.4, 0.5, 0.6]));
        let offset = calibrator.offset();
        assert_eq!(offset.translation, [1.0, 2.0, 3.0]);
        assert_eq!(offset.rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_capture_base_camera_leaves_pose_offsets() {
        let mut calibrator = OffsetCalibrator::new(true);
        calibrator.reset_view(&pose([1.0, 2.0, 3.0, 0.4, 0.5, 0.6]));
        calibrator.capture_base_camera([7.0, 8.0, 9.0]);
        let offset = calibrator.offset();
        assert_eq!(offset.base_camera, [7.0, 8.0, 9.0]);
        assert_eq!(offset.translation, [1.0, 2.0, 3.0]);
    }
}
