//! Logging stand-in for the host camera

use headlink_core::{CameraAxis, HostCamera};
use tracing::trace;

/// Holds the six axis values in memory and logs every push. Stands in for
/// the host application's camera fields when running standalone.
#[derive(Debug, Default)]
pub struct LogCamera {
    axes: [f64; 6],
}

impl LogCamera {
    pub fn axes(&self) -> [f64; 6] {
        self.axes
    }
}

impl HostCamera for LogCamera {
    fn get(&self, axis: CameraAxis) -> f64 {
        self.axes[axis.index()]
    }

    fn set(&mut self, axis: CameraAxis, value: f64) {
        self.axes[axis.index()] = value;
        trace!(axis = ?axis, value, "Camera axis set");
    }
}
