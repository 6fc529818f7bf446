//! Producer staleness detection from repeated unchanged reads

use crate::pose::{RawPoseRecord, POSE_AXES};

/// Polling cadence recommendation handed back to the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollInterval {
    /// Poll on every driver tick (frame).
    EveryTick,
    /// Poll again after this many seconds.
    Throttled(f64),
}

impl PollInterval {
    /// Driver-facing value: negative sentinel means "call me every tick".
    pub fn as_secs(self) -> f64 {
        match self {
            PollInterval::EveryTick => -1.0,
            PollInterval::Throttled(secs) => secs,
        }
    }
}

/// Outcome of comparing one record against the previous read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Freshness {
    /// First read since the channel was (re)opened; seeds the comparison
    /// state without counting as a change or as staleness.
    Seeded,
    /// The pose block changed; the producer is live.
    Fresh,
    /// Unchanged, but still within the idle threshold.
    Holding { idle_ticks: u32 },
    /// Unchanged beyond the idle threshold; the producer is judged silent.
    /// `just_stopped` is set exactly once, on the transition tick.
    Silent { idle_ticks: u32, just_stopped: bool },
}

/// Decides whether the producer is actively updating the shared region.
///
/// Comparison is exact, bit-for-bit over the six pose doubles, matching a
/// byte-wise compare of the pose block. No epsilon is applied: the producer
/// writes the whole block per update, so any bit difference means an update
/// (and a torn read in the lock-free mode is treated as one).
#[derive(Debug)]
pub struct StalenessTracker {
    idle_threshold_ticks: u32,
    throttled_interval_secs: f64,
    last: Option<[u64; POSE_AXES]>,
    unchanged_ticks: u32,
    interval: PollInterval,
}

impl StalenessTracker {
    pub fn new(idle_threshold_ticks: u32, throttled_interval_secs: f64) -> Self {
        Self {
            idle_threshold_ticks,
            throttled_interval_secs,
            last: None,
            unchanged_ticks: 0,
            interval: PollInterval::EveryTick,
        }
    }

    /// Compare `record` against the previous read and update the idle state.
    pub fn observe(&mut self, record: &RawPoseRecord) -> Freshness {
        let bits = record.pose_bits();
        match self.last {
            None => {
                self.last = Some(bits);
                self.unchanged_ticks = 0;
                Freshness::Seeded
            }
            Some(previous) if previous != bits => {
                self.last = Some(bits);
                self.unchanged_ticks = 0;
                self.interval = PollInterval::EveryTick;
                Freshness::Fresh
            }
            Some(_) => {
                self.unchanged_ticks += 1;
                if self.unchanged_ticks <= self.idle_threshold_ticks {
                    Freshness::Holding {
                        idle_ticks: self.unchanged_ticks,
                    }
                } else {
                    let just_stopped = self.interval == PollInterval::EveryTick;
                    self.interval = PollInterval::Throttled(self.throttled_interval_secs);
                    Freshness::Silent {
                        idle_ticks: self.unchanged_ticks,
                        just_stopped,
                    }
                }
            }
        }
    }

    /// Forget the previous record so the next read seeds instead of
    /// comparing. The polling recommendation is left as-is: an absent
    /// producer recreating the region must not drag the driver back to
    /// per-frame polling on its own.
    pub fn reset(&mut self) {
        self.last = None;
        self.unchanged_ticks = 0;
    }

    /// The current polling recommendation.
    pub fn interval(&self) -> PollInterval {
        self.interval
    }

    /// Consecutive unchanged reads since the last change.
    pub fn idle_ticks(&self) -> u32 {
        self.unchanged_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f64) -> RawPoseRecord {
        RawPoseRecord {
            data: [x, 0.0, 0.0, 0.0, 0.0, 0.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_first_read_seeds() {
        let mut tracker = StalenessTracker::new(5, 2.0);
        assert_eq!(tracker.observe(&record(1.0)), Freshness::Seeded);
        assert_eq!(tracker.interval(), PollInterval::EveryTick);
        assert_eq!(tracker.idle_ticks(), 0);
    }

    #[test]
    fn test_change_resets_counter() {
        let mut tracker = StalenessTracker::new(5, 2.0);
        tracker.observe(&record(1.0));
        tracker.observe(&record(1.0));
        assert_eq!(tracker.idle_ticks(), 1);
        assert_eq!(tracker.observe(&record(2.0)), Freshness::Fresh);
        assert_eq!(tracker.idle_ticks(), 0);
        assert_eq!(tracker.interval(), PollInterval::EveryTick);
    }

    #[test]
    fn test_single_axis_change_is_fresh() {
        let mut tracker = StalenessTracker::new(5, 2.0);
        let mut a = RawPoseRecord {
            data: [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            ..Default::default()
        };
        tracker.observe(&a);
        a.data[4] = 5.5;
        assert_eq!(tracker.observe(&a), Freshness::Fresh);
    }

    #[test]
    fn test_unchanged_increments_by_one() {
        let mut tracker = StalenessTracker::new(5, 2.0);
        tracker.observe(&record(1.0));
        for expected in 1..=5 {
            assert_eq!(
                tracker.observe(&record(1.0)),
                Freshness::Holding {
                    idle_ticks: expected
                }
            );
        }
    }

    #[test]
    fn test_silent_transition_fires_once() {
        let mut tracker = StalenessTracker::new(5, 2.0);
        tracker.observe(&record(1.0));
        for _ in 0..5 {
            tracker.observe(&record(1.0));
        }
        // Sixth unchanged tick crosses the threshold.
        assert_eq!(
            tracker.observe(&record(1.0)),
            Freshness::Silent {
                idle_ticks: 6,
                just_stopped: true
            }
        );
        assert_eq!(tracker.interval(), PollInterval::Throttled(2.0));
        assert_eq!(
            tracker.observe(&record(1.0)),
            Freshness::Silent {
                idle_ticks: 7,
                just_stopped: false
            }
        );
    }

    #[test]
    fn test_reset_seeds_without_touching_interval() {
        let mut tracker = StalenessTracker::new(5, 2.0);
        tracker.observe(&record(1.0));
        for _ in 0..6 {
            tracker.observe(&record(1.0));
        }
        assert_eq!(tracker.interval(), PollInterval::Throttled(2.0));

        tracker.reset();
        assert_eq!(tracker.observe(&record(9.0)), Freshness::Seeded);
        // Seeding after a reopen keeps the throttled recommendation.
        assert_eq!(tracker.interval(), PollInterval::Throttled(2.0));

        // A real change brings the cadence back to every tick.
        assert_eq!(tracker.observe(&record(10.0)), Freshness::Fresh);
        assert_eq!(tracker.interval(), PollInterval::EveryTick);
    }

    #[test]
    fn test_interval_sentinel_values() {
        assert_eq!(PollInterval::EveryTick.as_secs(), -1.0);
        assert_eq!(PollInterval::Throttled(2.0).as_secs(), 2.0);
    }
}
