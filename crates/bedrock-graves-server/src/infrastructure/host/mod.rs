//! In-memory host adapter.
//!
//! The real game server is reached through the application ports.  This
//! module provides implementations that keep everything in process: a world
//! with graves and viewers, a static capability oracle, clocks, and a sink
//! that records what would have been sent.

pub mod clock;
pub mod oracle;
pub mod recording;
pub mod world;

pub use clock::{ManualClock, SystemClock};
pub use oracle::StaticOracle;
pub use recording::RecordingSink;
pub use world::{place_grave_with_retry, InMemoryWorld};
