//! Headlink SHM - shared-memory pose transport
//!
//! Lifecycle of the named POSIX region the producer writes pose records
//! into: the consumer-side [`PoseChannel`] (open, locked read, close-on-drop)
//! and the producer-side [`PoseWriter`] (create, publish, unlink).

pub mod channel;
pub mod writer;

pub use channel::{ChannelError, PoseChannel};
pub use writer::PoseWriter;
