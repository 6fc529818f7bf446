//! The tracking context driven once per host tick

use anyhow::Result;
use headlink_core::{
    CalibrationOffset, CameraAxis, CameraPose, Freshness, HostCamera, OffsetCalibrator,
    PoseProjector, RawPoseRecord, StalenessTracker, TrackerConfig,
};
use headlink_shm::PoseChannel;
use tracing::{debug, info, warn};

/// Discrete requests forwarded from the host's command/menu/message
/// callbacks. Keeping these as plain values decouples what the host calls
/// from what the tracker does, so every operation is reachable from tests
/// without a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Start tracking; with translation active this re-anchors the view.
    Enable,
    /// Stop tracking and release the channel.
    Disable,
    /// Flip between enabled and disabled.
    ToggleTracking,
    /// Flip translation projection; re-enabling re-anchors the view.
    ToggleTranslation,
    /// Capture the current head pose as the new neutral view.
    ResetView,
    /// Re-zero only the translation neutral at the current head pose.
    SaveViewOffset,
    /// The host reloaded its scene; the camera anchor must be re-captured.
    SceneReloaded,
}

/// Owns the full tracking state: channel lifecycle, staleness, calibration,
/// and projection. One instance per process, passed into every tick and
/// event call; there is no ambient global state.
pub struct Tracker {
    config: TrackerConfig,
    channel: Option<PoseChannel>,
    staleness: StalenessTracker,
    calibrator: OffsetCalibrator,
    projector: PoseProjector,
    last_record: Option<RawPoseRecord>,
    enabled: bool,
    translation_enabled: bool,
    open_failure_logged: bool,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let staleness = StalenessTracker::new(
            config.idle_threshold_ticks,
            config.throttled_interval_secs,
        );
        let calibrator = OffsetCalibrator::new(config.projection.rotation_offset);
        let projector = PoseProjector::new(config.projection.clone());
        Ok(Self {
            config,
            channel: None,
            staleness,
            calibrator,
            projector,
            last_record: None,
            enabled: true,
            translation_enabled: true,
            open_failure_logged: false,
        })
    }

    /// One driver tick: read the latest record and push camera values when
    /// the producer is live. Returns the recommended delay in seconds until
    /// the next tick; negative means "call me every frame".
    pub fn tick(&mut self, camera: &mut dyn HostCamera) -> f64 {
        if !self.enabled {
            self.close_channel();
            return self.config.throttled_interval_secs;
        }

        if let Err(err) = self.ensure_channel() {
            if !self.open_failure_logged {
                debug!(error = %err, "Pose channel unavailable, retrying");
                self.open_failure_logged = true;
            }
            camera.set(CameraAxis::Roll, 0.0);
            return self.config.retry_interval_secs;
        }

        let read_result = match self.channel.as_ref() {
            Some(channel) => channel.read(),
            None => return self.config.retry_interval_secs,
        };
        let record = match read_result {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "Pose read failed, closing channel");
                self.close_channel();
                camera.set(CameraAxis::Roll, 0.0);
                return self.config.retry_interval_secs;
            }
        };

        let freshness = self.staleness.observe(&record);
        self.last_record = Some(record);

        match freshness {
            Freshness::Seeded | Freshness::Holding { .. } => {}
            Freshness::Fresh => {
                let pose = self.projector.project(
                    &record,
                    &self.calibrator.offset(),
                    self.translation_enabled,
                );
                apply_pose(&pose, camera);
            }
            Freshness::Silent {
                idle_ticks,
                just_stopped,
            } => {
                if just_stopped {
                    info!(idle_ticks, "Tracking stopped, throttling polls");
                }
                // Hold the camera at its last pose but zero the roll, which
                // would otherwise stick at a stale angle.
                camera.set(CameraAxis::Roll, 0.0);
                // The producer is judged absent; release the mapping and
                // retry from scratch at the throttled cadence.
                self.close_channel();
            }
        }

        self.staleness.interval().as_secs()
    }

    /// Apply one host command.
    pub fn handle_event(&mut self, event: TrackerEvent, camera: &mut dyn HostCamera) {
        match event {
            TrackerEvent::Enable => self.set_enabled(true, camera),
            TrackerEvent::Disable => self.set_enabled(false, camera),
            TrackerEvent::ToggleTracking => self.set_enabled(!self.enabled, camera),
            TrackerEvent::ToggleTranslation => {
                self.translation_enabled = !self.translation_enabled;
                info!(
                    enabled = self.translation_enabled,
                    "Translation projection toggled"
                );
                if self.translation_enabled {
                    self.recenter_translation(&*camera);
                }
            }
            TrackerEvent::ResetView => {
                let raw = self.last_record.unwrap_or_default();
                self.calibrator.reset_view(&raw);
            }
            TrackerEvent::SaveViewOffset => {
                let raw = self.last_record.unwrap_or_default();
                self.calibrator.calibrate_translation(&raw);
            }
            TrackerEvent::SceneReloaded => {
                self.calibrator.capture_base_camera(camera.position());
            }
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn translation_enabled(&self) -> bool {
        self.translation_enabled
    }

    /// Snapshot of the current calibration offset.
    pub fn offset(&self) -> CalibrationOffset {
        self.calibrator.offset()
    }

    /// Whether the shared channel is currently open.
    pub fn channel_open(&self) -> bool {
        self.channel.is_some()
    }

    fn set_enabled(&mut self, enabled: bool, camera: &mut dyn HostCamera) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            info!("Tracking enabled");
            if self.translation_enabled {
                self.recenter_translation(&*camera);
            }
        } else {
            info!("Tracking disabled");
            self.close_channel();
        }
    }

    /// Re-anchor translation: the camera's current position becomes the
    /// base and the last seen head pose becomes the translation neutral.
    fn recenter_translation(&mut self, camera: &dyn HostCamera) {
        self.calibrator.capture_base_camera(camera.position());
        let raw = self.last_record.unwrap_or_default();
        self.calibrator.calibrate_translation(&raw);
    }

    fn ensure_channel(&mut self) -> Result<(), headlink_shm::ChannelError> {
        if self.channel.is_some() {
            return Ok(());
        }
        let channel = PoseChannel::open(&self.config.channel_name, self.config.advisory_lock)?;
        self.open_failure_logged = false;
        // The first read after opening seeds the comparison instead of
        // counting as a change.
        self.staleness.reset();
        self.channel = Some(channel);
        Ok(())
    }

    fn close_channel(&mut self) {
        if self.channel.take().is_some() {
            self.staleness.reset();
        }
    }
}

fn apply_pose(pose: &CameraPose, camera: &mut dyn HostCamera) {
    if let Some([x, y, z]) = pose.translation {
        camera.set(CameraAxis::X, x);
        camera.set(CameraAxis::Y, y);
        camera.set(CameraAxis::Z, z);
    }
    camera.set(CameraAxis::Heading, pose.heading);
    camera.set(CameraAxis::Pitch, pose.pitch);
    camera.set(CameraAxis::Roll, pose.roll);
}
