//! Headlink Tracker - per-tick orchestration
//!
//! Ties the shared-memory channel, staleness tracking, calibration, and
//! projection together behind one context object the driver ticks and sends
//! events to.

pub mod tracker;

pub use tracker::{Tracker, TrackerEvent};
