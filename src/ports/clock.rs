//! Clock port for stamping certificates.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Certificate creation reads the clock twice over: once for the
/// `createdAt` stamp and once for the default issue year. Tests and
/// cassette playback substitute a fixed clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
