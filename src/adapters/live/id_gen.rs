//! Live adapter for the `IdGenerator` port.

use chrono::Datelike;

use super::clock::LiveClock;
use crate::id::certificate_id;
use crate::ports::{Clock, IdGenerator};

/// Live ID generator producing `YY-XXXXXX` certificate IDs from the
/// clock's current year and the thread-local RNG.
pub struct LiveIdGenerator {
    clock: Box<dyn Clock>,
}

impl LiveIdGenerator {
    /// Creates a generator reading the year from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Box::new(LiveClock))
    }

    /// Creates a generator reading the year from `clock`.
    #[must_use]
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for LiveIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        certificate_id(self.clock.now().year(), &mut rand::thread_rng())
    }
}
