//! One-second session ticker.
//!
//! Emits a strictly increasing tick once per elapsed second. A late poll
//! (terminal suspended, slow frame) produces a single tick and re-arms from
//! "now", so missed seconds are dropped rather than replayed in a burst.
//! Acceptable for a display-only driver.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Ticker {
    tick: u64,
    deadline: Instant,
}

impl Ticker {
    pub fn new(initial: u64, now: Instant) -> Self {
        Ticker {
            tick: initial,
            deadline: now + TICK,
        }
    }

    pub fn current(&self) -> u64 {
        self.tick
    }

    /// At most one tick per call. Returns the new tick when the deadline has
    /// passed, `None` otherwise.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        if now < self.deadline {
            return None;
        }
        self.tick += 1;
        // Re-arm from now, not from the old deadline: no catch-up bursts.
        self.deadline = now + TICK;
        Some(self.tick)
    }
}
