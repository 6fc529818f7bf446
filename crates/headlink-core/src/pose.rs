//! Pose record layout shared with the external head-tracking producer

/// Number of pose axes carried in a raw record.
pub const POSE_AXES: usize = 6;

/// Index of an axis within a raw record's pose block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y,
    Z,
    Yaw,
    Pitch,
    Roll,
}

impl Axis {
    /// Position of this axis in [`RawPoseRecord::data`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One pose sample as the producer writes it into the shared region.
///
/// Field order, widths, and natural padding form the wire contract with the
/// producer process; the total size is 72 bytes with 8-byte alignment. Layout
/// is asserted by tests and must not change. The bookkeeping fields after the
/// pose block are preserved byte-for-byte but not interpreted.
///
/// A record is always an immutable snapshot copied out of the mapping; when
/// the channel runs without the advisory lock, a copy may race a producer
/// write and come out torn.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawPoseRecord {
    /// x, y, z translation in millimeters, then yaw, pitch, roll in radians.
    pub data: [f64; POSE_AXES],
    /// Producer-side game identifier.
    pub game_id: i32,
    /// Producer-side secondary game identifier.
    pub game_id2: i32,
    /// Producer-side axis table.
    pub table: [u8; 8],
    /// Stop flag byte; nonzero when the producer is shutting down.
    pub stop: u8,
}

impl RawPoseRecord {
    /// Size of the record in bytes, including tail padding.
    pub const SIZE: usize = std::mem::size_of::<RawPoseRecord>();

    /// The translation triple (x, y, z) in producer units.
    pub fn translation(&self) -> [f64; 3] {
        [
            self.data[Axis::X.index()],
            self.data[Axis::Y.index()],
            self.data[Axis::Z.index()],
        ]
    }

    /// The rotation triple (yaw, pitch, roll) in radians.
    pub fn rotation(&self) -> [f64; 3] {
        [
            self.data[Axis::Yaw.index()],
            self.data[Axis::Pitch.index()],
            self.data[Axis::Roll.index()],
        ]
    }

    /// Whether the producer has raised its stop flag.
    pub fn stop_requested(&self) -> bool {
        self.stop != 0
    }

    /// Bit patterns of the six pose doubles, for exact-equality comparison.
    ///
    /// Comparing bits rather than values keeps the comparison equivalent to a
    /// byte-wise compare of the pose block: NaN payloads and signed zeros are
    /// distinguished the same way the producer wrote them.
    pub fn pose_bits(&self) -> [u64; POSE_AXES] {
        let mut bits = [0u64; POSE_AXES];
        for (out, value) in bits.iter_mut().zip(self.data.iter()) {
            *out = value.to_bits();
        }
        bits
    }
}
