//! Synthetic producer for standalone smoke runs

use anyhow::Result;
use headlink_core::RawPoseRecord;
use headlink_shm::PoseWriter;
use std::time::{Duration, Instant};
use tracing::info;

/// Create the region and write a slowly wandering head pose into it until
/// the task is dropped.
pub async fn run(name: &str, advisory_lock: bool) -> Result<()> {
    let mut writer = PoseWriter::create(name, advisory_lock)?;
    info!(name = %name, "Simulated producer started");

    let start = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_millis(16));
    loop {
        interval.tick().await;
        let t = start.elapsed().as_secs_f64();
        let record = RawPoseRecord {
            data: [
                (t * 0.8).sin() * 30.0, // x, millimeters
                (t * 0.6).sin() * 20.0,
                (t * 0.4).sin() * 50.0,
                (t * 0.5).sin() * 0.5, // yaw, radians
                (t * 0.7).sin() * 0.3,
                (t * 0.9).sin() * 0.2,
            ],
            ..Default::default()
        };
        writer.write(&record)?;
    }
}
