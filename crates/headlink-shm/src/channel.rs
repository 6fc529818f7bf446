//! Consumer side of the shared pose region

use headlink_core::RawPoseRecord;
use memmap2::{Mmap, MmapOptions};
use nix::errno::Errno;
use nix::fcntl::{flock, FlockArg, OFlag};
use nix::sys::mman::shm_open;
use nix::sys::stat::Mode;
use std::fs::File;
use std::os::fd::AsRawFd;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum ChannelError {
    /// The named region does not exist yet, i.e. the producer is not
    /// running. Recoverable; retry on a later tick.
    #[error("shared region {0} not found")]
    NotFound(String),
    /// The region exists but could not be opened or mapped. Recoverable the
    /// same way.
    #[error("failed to map shared region {name}: {source}")]
    MapFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// Creating or removing the region failed (producer side).
    #[error("failed to create shared region {name}: {source}")]
    CreateFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// Advisory lock acquisition failed.
    #[error("advisory lock on {name} failed: {source}")]
    LockFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Shared-memory names live in a flat namespace rooted at `/`.
pub(crate) fn shm_path(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

/// Advisory lock held for the duration of one region access. Dropping the
/// guard releases the lock, so every exit path unlocks.
pub(crate) struct LockGuard<'a> {
    file: &'a File,
}

impl<'a> LockGuard<'a> {
    pub(crate) fn shared(file: &'a File, name: &str) -> Result<Self, ChannelError> {
        Self::acquire(file, name, FlockArg::LockShared)
    }

    pub(crate) fn exclusive(file: &'a File, name: &str) -> Result<Self, ChannelError> {
        Self::acquire(file, name, FlockArg::LockExclusive)
    }

    fn acquire(file: &'a File, name: &str, arg: FlockArg) -> Result<Self, ChannelError> {
        flock(file.as_raw_fd(), arg).map_err(|errno| ChannelError::LockFailed {
            name: name.to_string(),
            source: errno.into(),
        })?;
        Ok(Self { file })
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        let _ = flock(self.file.as_raw_fd(), FlockArg::Unlock);
    }
}

/// Read-only mapping of the producer's pose region.
///
/// At most one channel is open at a time; the tracker owns it in an `Option`
/// so closing is a drop and double-close is a no-op. A failed open is retried
/// on a later tick.
#[derive(Debug)]
pub struct PoseChannel {
    name: String,
    advisory_lock: bool,
    file: File,
    map: Mmap,
}

impl PoseChannel {
    /// Open and map the named region for reading.
    ///
    /// Returns [`ChannelError::NotFound`] when the region does not exist and
    /// [`ChannelError::MapFailed`] when it exists but cannot be mapped
    /// (including regions smaller than one record). Both are expected while
    /// the producer is down.
    pub fn open(name: &str, advisory_lock: bool) -> Result<Self, ChannelError> {
        let path = shm_path(name);
        let fd = shm_open(path.as_str(), OFlag::O_RDONLY, Mode::empty()).map_err(|errno| {
            match errno {
                Errno::ENOENT => ChannelError::NotFound(name.to_string()),
                other => ChannelError::MapFailed {
                    name: name.to_string(),
                    source: other.into(),
                },
            }
        })?;
        let file = File::from(fd);

        let len = file
            .metadata()
            .map_err(|source| ChannelError::MapFailed {
                name: name.to_string(),
                source,
            })?
            .len() as usize;
        if len < RawPoseRecord::SIZE {
            return Err(ChannelError::MapFailed {
                name: name.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("region is {len} bytes, record needs {}", RawPoseRecord::SIZE),
                ),
            });
        }

        let map = unsafe { MmapOptions::new().len(RawPoseRecord::SIZE).map(&file) }.map_err(
            |source| ChannelError::MapFailed {
                name: name.to_string(),
                source,
            },
        )?;

        debug!(name = %name, advisory_lock, "Pose channel opened");
        Ok(Self {
            name: name.to_string(),
            advisory_lock,
            file,
            map,
        })
    }

    /// Copy the current record out of the region.
    ///
    /// With `advisory_lock` a shared lock is held for exactly the duration
    /// of the copy and released on every exit path. Without it the copy may
    /// race a concurrent producer write and come out torn; that is the
    /// documented weaker-consistency mode, in which callers rely on the
    /// whole-record comparison treating a torn record as a change.
    pub fn read(&self) -> Result<RawPoseRecord, ChannelError> {
        let _guard = if self.advisory_lock {
            Some(LockGuard::shared(&self.file, &self.name)?)
        } else {
            None
        };
        trace!(name = %self.name, "Reading pose record");
        // Safety: the mapping is at least RawPoseRecord::SIZE bytes and
        // page-aligned, and the record type is plain repr(C) data valid for
        // any bit pattern.
        let record =
            unsafe { std::ptr::read_volatile(self.map.as_ptr() as *const RawPoseRecord) };
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for PoseChannel {
    fn drop(&mut self) {
        debug!(name = %self.name, "Pose channel closed");
    }
}
