//! Integration tests against real POSIX shared-memory regions.

use headlink_core::RawPoseRecord;
use headlink_shm::{ChannelError, PoseChannel, PoseWriter};
use std::sync::atomic::{AtomicUsize, Ordering};

static NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Per-test unique region name so parallel tests never collide.
fn unique_name(tag: &str) -> String {
    let n = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("headlink-test-{}-{}-{}", std::process::id(), tag, n)
}

fn record(data: [f64; 6]) -> RawPoseRecord {
    RawPoseRecord {
        data,
        game_id: 7,
        game_id2: 42,
        table: [1, 2, 3, 4, 5, 6, 7, 8],
        stop: 0,
    }
}

#[test]
fn test_open_missing_region_is_not_found() {
    let name = unique_name("missing");
    match PoseChannel::open(&name, true) {
        Err(ChannelError::NotFound(reported)) => assert_eq!(reported, name),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_round_trip_preserves_all_fields() {
    let name = unique_name("roundtrip");
    let mut writer = PoseWriter::create(&name, true).expect("create region");
    let sent = record([10.0, -20.0, 30.0, 0.1, 0.2, 0.3]);
    writer.write(&sent).expect("write record");

    let channel = PoseChannel::open(&name, true).expect("open region");
    let got = channel.read().expect("read record");
    assert_eq!(got, sent);
    assert_eq!(got.game_id, 7);
    assert_eq!(got.table, [1, 2, 3, 4, 5, 6, 7, 8]);

    PoseWriter::unlink(&name).expect("unlink");
}

#[test]
fn test_fresh_region_reads_zeroed() {
    let name = unique_name("zeroed");
    let _writer = PoseWriter::create(&name, false).expect("create region");

    let channel = PoseChannel::open(&name, false).expect("open region");
    let got = channel.read().expect("read record");
    assert_eq!(got, RawPoseRecord::default());
    assert!(!got.stop_requested());

    PoseWriter::unlink(&name).expect("unlink");
}

#[test]
fn test_lockless_read_sees_latest_write() {
    let name = unique_name("lockless");
    let mut writer = PoseWriter::create(&name, false).expect("create region");
    let channel = PoseChannel::open(&name, false).expect("open region");

    for i in 1..=3 {
        let sent = record([i as f64, 0.0, 0.0, 0.0, 0.0, 0.0]);
        writer.write(&sent).expect("write record");
        assert_eq!(channel.read().expect("read record"), sent);
    }

    PoseWriter::unlink(&name).expect("unlink");
}

#[test]
fn test_unlink_is_idempotent() {
    let name = unique_name("unlink");
    let _writer = PoseWriter::create(&name, true).expect("create region");
    PoseWriter::unlink(&name).expect("first unlink");
    PoseWriter::unlink(&name).expect("second unlink is a no-op");
}

#[test]
fn test_unlinked_region_stays_readable_until_drop() {
    // Established POSIX behavior the channel lifecycle relies on: unlinking
    // removes the name, not the live mapping.
    let name = unique_name("unlinked-live");
    let mut writer = PoseWriter::create(&name, true).expect("create region");
    let channel = PoseChannel::open(&name, true).expect("open region");
    PoseWriter::unlink(&name).expect("unlink");

    let sent = record([5.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    writer.write(&sent).expect("write after unlink");
    assert_eq!(channel.read().expect("read after unlink"), sent);

    // The name is gone, so a new open must fail.
    assert!(matches!(
        PoseChannel::open(&name, true),
        Err(ChannelError::NotFound(_))
    ));
}
