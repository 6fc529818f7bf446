//! Producer side of the shared pose region
//!
//! Region creation belongs to the producer; the consumer only ever opens an
//! existing region. This writer backs integration tests, the daemon's
//! simulate mode, and any external producer written in Rust.

use crate::channel::{shm_path, ChannelError, LockGuard};
use headlink_core::RawPoseRecord;
use memmap2::{MmapMut, MmapOptions};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{shm_open, shm_unlink};
use nix::sys::stat::Mode;
use nix::unistd::ftruncate;
use std::fs::File;
use tracing::debug;

/// Writable mapping of the pose region, created on construction.
pub struct PoseWriter {
    name: String,
    advisory_lock: bool,
    file: File,
    map: MmapMut,
}

impl PoseWriter {
    /// Create (or reuse) the named region, size it to one record, and zero
    /// it so consumers seed from a known state.
    pub fn create(name: &str, advisory_lock: bool) -> Result<Self, ChannelError> {
        let path = shm_path(name);
        let create_failed = |source: std::io::Error| ChannelError::CreateFailed {
            name: name.to_string(),
            source,
        };

        let fd = shm_open(
            path.as_str(),
            OFlag::O_CREAT | OFlag::O_RDWR,
            Mode::S_IRUSR | Mode::S_IWUSR,
        )
        .map_err(|errno| create_failed(errno.into()))?;
        let file = File::from(fd);

        ftruncate(&file, RawPoseRecord::SIZE as i64)
            .map_err(|errno| create_failed(errno.into()))?;

        let map = unsafe { MmapOptions::new().len(RawPoseRecord::SIZE).map_mut(&file) }
            .map_err(create_failed)?;

        debug!(name = %name, "Pose region created");
        let mut writer = Self {
            name: name.to_string(),
            advisory_lock,
            file,
            map,
        };
        writer.write(&RawPoseRecord::default())?;
        Ok(writer)
    }

    /// Publish one record as a whole-block store, under an exclusive
    /// advisory lock when enabled.
    pub fn write(&mut self, record: &RawPoseRecord) -> Result<(), ChannelError> {
        let _guard = if self.advisory_lock {
            Some(LockGuard::exclusive(&self.file, &self.name)?)
        } else {
            None
        };
        // Safety: the mapping is RawPoseRecord::SIZE bytes, writable, and
        // page-aligned.
        unsafe { std::ptr::write_volatile(self.map.as_mut_ptr() as *mut RawPoseRecord, *record) };
        Ok(())
    }

    /// Remove the region name from the system. Idempotent: a missing region
    /// is not an error.
    pub fn unlink(name: &str) -> Result<(), ChannelError> {
        match shm_unlink(shm_path(name).as_str()) {
            Ok(()) | Err(Errno::ENOENT) => Ok(()),
            Err(errno) => Err(ChannelError::CreateFailed {
                name: name.to_string(),
                source: errno.into(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
