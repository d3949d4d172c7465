//! Cassette format for recording and replaying port interactions.
//!
//! Cassettes let a certificate session against a real store be captured
//! once and replayed offline, call for call.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
