//! Delay/speed conversions.
//!
//! An actuator's speed and its per-operation delay are two views of the same
//! setting: `speed = 60_000_000 / (delay_us * steps_per_unit)` per minute.

use libm::round;

/// Microseconds in one minute.
pub const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Paired delay and speed of one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timing {
    /// Pause after each operation, in microseconds.
    delay_us: u32,
    /// Operations (or units) per minute.
    speed: f64,
}

impl Timing {
    /// Derive the speed from a delay.
    ///
    /// A zero delay means no settling pause and reports a speed of zero.
    pub fn from_delay(delay_us: u32, steps_per_unit: u32) -> Self {
        let per_unit = f64::from(delay_us) * f64::from(steps_per_unit.max(1));
        let speed = if delay_us == 0 {
            0.0
        } else {
            MICROS_PER_MINUTE / per_unit
        };
        Self { delay_us, speed }
    }

    /// Derive the delay from a speed, rounded to the nearest microsecond.
    ///
    /// Zero, negative or NaN speeds yield zero speed and zero delay.
    pub fn from_speed(speed: f64, steps_per_unit: u32) -> Self {
        if speed.is_nan() || speed <= 0.0 {
            return Self::default();
        }
        let delay = round(MICROS_PER_MINUTE / (speed * f64::from(steps_per_unit.max(1))));
        let delay_us = if delay >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            delay as u32
        };
        Self { delay_us, speed }
    }

    /// Get the delay in microseconds.
    #[inline]
    pub fn delay_us(&self) -> u32 {
        self.delay_us
    }

    /// Get the speed per minute.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }
}
