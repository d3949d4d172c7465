//! Wall-clock time for `createdAt` stamps and ID year prefixes.

use chrono::{DateTime, SubsecRound, Utc};

use crate::ports::clock::Clock;

/// System clock truncated to whole milliseconds.
///
/// `createdAt` is stored with millisecond precision, so a reading from
/// this clock equals the timestamp read back from the store.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
