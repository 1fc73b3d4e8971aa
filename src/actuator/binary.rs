//! Single-pin on/off actuator.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::error::{ConfigError, ConfigWarning, PortResult};
use crate::port::{ParportBackend, PortHandle};

use super::timing::Timing;
use super::{actuator_name, validate_offset, Actuator, ActuatorKind, Warnings, MAX_NAME};

/// On/off actuator driving one bit of the data register.
#[derive(Debug, Clone)]
pub struct BinaryActuator {
    /// Display name.
    name: String<MAX_NAME>,
    /// Data bit driven (0..=7, or detached).
    offset: u8,
    /// Last state driven.
    state: bool,
    /// Pause after each `set`.
    timing: Timing,
    /// Corrections made at construction.
    warnings: Warnings,
}

impl BinaryActuator {
    /// Create an actuator on data bit `offset`, initially off.
    ///
    /// An offset above 7 is replaced with
    /// [`DETACHED_OFFSET`](super::DETACHED_OFFSET) and recorded as a warning.
    ///
    /// # Errors
    ///
    /// Returns `NameTooLong` if `name` exceeds 32 bytes.
    pub fn new(name: &str, offset: u8) -> Result<Self, ConfigError> {
        let mut warnings = Warnings::new();
        let offset = validate_offset(offset, ActuatorKind::Binary, &mut warnings);
        Ok(Self {
            name: actuator_name(name)?,
            offset,
            state: false,
            timing: Timing::default(),
            warnings,
        })
    }

    /// Drive the pin to `state`, then pause for the configured delay.
    ///
    /// Returns the new state.
    pub fn set<B, D>(
        &mut self,
        state: bool,
        port: &mut PortHandle<B>,
        delay: &mut D,
    ) -> PortResult<bool>
    where
        B: ParportBackend,
        D: DelayNs,
    {
        let mask = self.pin_mask();
        port.modify_data(mask, if state { mask } else { 0 })?;
        self.state = state;
        debug!(
            "{} ({}): {}",
            self.name.as_str(),
            self.offset,
            if state { "on" } else { "off" }
        );
        if self.timing.delay_us() > 0 {
            delay.delay_us(self.timing.delay_us());
        }
        Ok(state)
    }

    /// Invert the pin; returns the new state.
    pub fn toggle<B, D>(&mut self, port: &mut PortHandle<B>, delay: &mut D) -> PortResult<bool>
    where
        B: ParportBackend,
        D: DelayNs,
    {
        self.set(!self.state, port, delay)
    }

    /// Get the last state driven, without touching the hardware.
    #[inline]
    pub fn get(&self) -> bool {
        self.state
    }
}

impl Actuator for BinaryActuator {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Binary
    }

    fn offset(&self) -> u8 {
        self.offset
    }

    fn delay_us(&self) -> u32 {
        self.timing.delay_us()
    }

    fn speed(&self) -> f64 {
        self.timing.speed()
    }

    fn set_delay(&mut self, delay_us: u32) -> u32 {
        self.timing = Timing::from_delay(delay_us, 1);
        delay_us
    }

    fn set_speed(&mut self, speed: f64) -> f64 {
        self.timing = Timing::from_speed(speed, 1);
        self.timing.speed()
    }

    fn merge_into(&self, register: u8) -> u8 {
        let mask = self.pin_mask();
        (register & !mask) | if self.state { mask } else { 0 }
    }

    fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }
}
