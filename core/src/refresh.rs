//! Auto-refresh cadence.
//!
//! The driver owns the timer and nothing else: each tick it calls back
//! into whatever render cycle the host supplies, so rendering stays
//! testable without a clock.

use std::thread;
use std::time::Duration;

use log::info;

pub struct RefreshDriver {
    interval: Duration,
}

impl RefreshDriver {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run `cycle` until it returns `false`. Cycle indices start at 0 and
    /// the driver sleeps between cycles, never before the first one.
    pub fn run<F>(&self, mut cycle: F)
    where
        F: FnMut(u64) -> bool,
    {
        let mut index = 0u64;
        loop {
            if !cycle(index) {
                info!("Refresh driver stopped after cycle {index}");
                return;
            }
            index += 1;
            thread::sleep(self.interval);
        }
    }
}
