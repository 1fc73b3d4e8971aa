//! Wall-clock delay provider (std only).

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// Blocks the calling thread for each requested delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl StdDelay {
    /// Create a delay provider.
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
