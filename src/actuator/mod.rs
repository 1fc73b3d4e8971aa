//! Actuators driven through bits of the data register.
//!
//! Two variants share the [`Actuator`] interface: [`BinaryActuator`] owns one
//! pin, [`SteppedActuator`] owns two adjacent pins carrying a gray-code phase.
//! Neither holds the port; every command borrows the
//! [`PortHandle`](crate::port::PortHandle) for its duration.

mod binary;
mod phase;
mod stepped;
mod timing;

pub use binary::BinaryActuator;
pub use phase::{Phase, StepDirection, GRAY_CODE};
pub use stepped::{SteppedActuator, DEFAULT_STEPS_PER_UNIT, MAX_UNIT};
pub use timing::{Timing, MICROS_PER_MINUTE};

use heapless::{String, Vec};

use crate::error::{ConfigError, ConfigWarning, PortResult};
use crate::port::{ParportBackend, PortHandle};

/// Offset assigned when the configured one is invalid.
///
/// It lies outside the 8-bit data register, so the actuator's pin mask is
/// empty and its commands leave every physical pin untouched.
pub const DETACHED_OFFSET: u8 = 0x10;

/// Maximum length of an actuator name.
pub const MAX_NAME: usize = 32;

/// Warnings one actuator can accumulate at construction.
pub type Warnings = Vec<ConfigWarning, 2>;

/// Kind of actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorKind {
    /// Single on/off output pin.
    Binary,
    /// Two-pin gray-code stepper.
    Stepped,
}

impl ActuatorKind {
    /// Number of consecutive data pins used.
    #[inline]
    pub const fn width(self) -> u8 {
        match self {
            ActuatorKind::Binary => 1,
            ActuatorKind::Stepped => 2,
        }
    }

    /// Highest valid bit offset.
    #[inline]
    pub const fn max_offset(self) -> u8 {
        8 - self.width()
    }
}

/// Common interface of actuators bound to a data register.
pub trait Actuator {
    /// Get the actuator name.
    fn name(&self) -> &str;

    /// Get the actuator kind.
    fn kind(&self) -> ActuatorKind;

    /// Get the lowest data bit used ([`DETACHED_OFFSET`] if none).
    fn offset(&self) -> u8;

    /// Get the mask of data bits owned by this actuator.
    fn pin_mask(&self) -> u8 {
        pin_mask(self.offset(), self.kind().width())
    }

    /// Get the pause after each operation, in microseconds.
    fn delay_us(&self) -> u32;

    /// Get the speed per minute (toggles, or units of travel).
    fn speed(&self) -> f64;

    /// Set the pause after each operation; returns the delay.
    fn set_delay(&mut self, delay_us: u32) -> u32;

    /// Set the speed per minute; returns the speed.
    fn set_speed(&mut self, speed: f64) -> f64;

    /// Replace this actuator's bits in `register` with its current state.
    fn merge_into(&self, register: u8) -> u8;

    /// Warnings recorded when the configuration was corrected.
    fn warnings(&self) -> &[ConfigWarning];

    /// Drive the current state onto the port without pausing.
    ///
    /// Returns the data register value written.
    fn sync<B: ParportBackend>(&self, port: &mut PortHandle<B>) -> PortResult<u8>
    where
        Self: Sized,
    {
        port.modify_data(self.pin_mask(), self.merge_into(0))
    }
}

/// Mask of `width` bits starting at `offset`, clipped to the data register.
pub fn pin_mask(offset: u8, width: u8) -> u8 {
    let bits = (1u32 << width) - 1;
    (bits.checked_shl(u32::from(offset)).unwrap_or(0) & 0xFF) as u8
}

/// Check an offset for `kind`, falling back to [`DETACHED_OFFSET`].
pub(crate) fn validate_offset(offset: u8, kind: ActuatorKind, warnings: &mut Warnings) -> u8 {
    if offset > kind.max_offset() {
        warn!("Bad offset: {}", offset);
        let _ = warnings.push(ConfigWarning::InvalidOffset(offset));
        DETACHED_OFFSET
    } else {
        offset
    }
}

pub(crate) fn actuator_name(name: &str) -> Result<String<MAX_NAME>, ConfigError> {
    String::try_from(name).map_err(|_| ConfigError::NameTooLong)
}

/// Borrowed actuator of either kind.
#[derive(Debug, Clone, Copy)]
pub enum ActuatorRef<'a> {
    /// On/off actuator.
    Binary(&'a BinaryActuator),
    /// Stepper.
    Stepped(&'a SteppedActuator),
}

impl<'a> ActuatorRef<'a> {
    /// View through the common interface.
    pub fn as_actuator(&self) -> &'a dyn Actuator {
        match *self {
            ActuatorRef::Binary(a) => a,
            ActuatorRef::Stepped(a) => a,
        }
    }
}
