//! Two-pin gray-code stepper.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::error::{ConfigError, ConfigWarning, PortResult};
use crate::port::{ParportBackend, PortHandle};

use super::phase::{Phase, StepDirection};
use super::timing::Timing;
use super::{actuator_name, validate_offset, Actuator, ActuatorKind, Warnings, MAX_NAME};

/// Steps per unit used when the configured count is invalid.
pub const DEFAULT_STEPS_PER_UNIT: u32 = 4;

/// Maximum length of a unit label.
pub const MAX_UNIT: usize = 16;

/// Stepper motor driven by a 2-bit gray-code phase on two adjacent data bits.
///
/// Tracks its absolute position in steps. The phase is always a function of
/// the position, so the software model and the coils cannot drift apart
/// while every write succeeds.
#[derive(Debug, Clone)]
pub struct SteppedActuator {
    /// Display name.
    name: String<MAX_NAME>,
    /// Lower of the two data bits (0..=6, or detached).
    offset: u8,
    /// Physical steps per declared unit (multiple of 4).
    steps_per_unit: u32,
    /// Unit label for reporting.
    unit: String<MAX_UNIT>,
    /// Code currently driven onto the coils.
    phase: Phase,
    /// Absolute position in steps.
    position: i64,
    /// Pause after each step.
    timing: Timing,
    /// Corrections made at construction.
    warnings: Warnings,
}

impl SteppedActuator {
    /// Create a stepper on data bits `offset` and `offset + 1`.
    ///
    /// Offsets above 6 fall back to
    /// [`DETACHED_OFFSET`](super::DETACHED_OFFSET); step counts below 4 or not
    /// divisible by 4 fall back to [`DEFAULT_STEPS_PER_UNIT`]. Each correction
    /// is recorded as a warning.
    ///
    /// # Errors
    ///
    /// Returns `NameTooLong` if `name` exceeds 32 bytes or `unit` exceeds 16.
    pub fn new(
        name: &str,
        offset: u8,
        steps_per_unit: u32,
        unit: &str,
    ) -> Result<Self, ConfigError> {
        let mut warnings = Warnings::new();
        let offset = validate_offset(offset, ActuatorKind::Stepped, &mut warnings);

        let steps_per_unit = if !Self::accepts_steps_per_unit(steps_per_unit) {
            warn!("Bad stepper amount: {}", steps_per_unit);
            let _ = warnings.push(ConfigWarning::InvalidStepCount(steps_per_unit));
            DEFAULT_STEPS_PER_UNIT
        } else {
            steps_per_unit
        };

        Ok(Self {
            name: actuator_name(name)?,
            offset,
            steps_per_unit,
            unit: String::try_from(unit).map_err(|_| ConfigError::NameTooLong)?,
            phase: Phase::ZERO,
            position: 0,
            timing: Timing::default(),
            warnings,
        })
    }

    /// Check whether a step count is a positive multiple of 4.
    ///
    /// Any other count cannot complete a whole number of electrical cycles per unit.
    pub fn accepts_steps_per_unit(steps_per_unit: u32) -> bool {
        steps_per_unit >= 4 && steps_per_unit % 4 == 0
    }

    /// Move by `steps` physical steps (negative reverses).
    ///
    /// Each step writes the next phase to the port and then pauses for the
    /// configured delay. On a port error the position reflects the last step
    /// actually written. Travel stops at the ends of the `i64` range.
    pub fn step<B, D>(&mut self, steps: i64, port: &mut PortHandle<B>, delay: &mut D) -> PortResult<()>
    where
        B: ParportBackend,
        D: DelayNs,
    {
        let direction = StepDirection::of(steps);
        for _ in 0..steps.unsigned_abs() {
            if !self.step_once(direction, port, delay)? {
                break;
            }
        }
        Ok(())
    }

    /// Move to an absolute position in steps.
    pub fn goto<B, D>(&mut self, target: i64, port: &mut PortHandle<B>, delay: &mut D) -> PortResult<()>
    where
        B: ParportBackend,
        D: DelayNs,
    {
        while self.position != target {
            let direction = if target > self.position {
                StepDirection::Forward
            } else {
                StepDirection::Reverse
            };
            if !self.step_once(direction, port, delay)? {
                break;
            }
        }
        Ok(())
    }

    /// Declare the current physical position without moving.
    ///
    /// The phase is recomputed for the new position but not written; call
    /// [`sync`](Actuator::sync) to drive it.
    pub fn set_position(&mut self, position: i64) -> i64 {
        self.position = position;
        self.phase = Phase::at(position);
        position
    }

    /// Get the absolute position in steps.
    #[inline]
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Get the phase currently driven.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the physical steps per unit.
    #[inline]
    pub fn steps_per_unit(&self) -> u32 {
        self.steps_per_unit
    }

    /// Get the unit label.
    #[inline]
    pub fn unit(&self) -> &str {
        self.unit.as_str()
    }

    /// Write the phase of the next position; `false` at the end of travel.
    fn step_once<B, D>(
        &mut self,
        direction: StepDirection,
        port: &mut PortHandle<B>,
        delay: &mut D,
    ) -> PortResult<bool>
    where
        B: ParportBackend,
        D: DelayNs,
    {
        let Some(position) = self.position.checked_add(direction.sign()) else {
            warn!("{}: end of travel at {}", self.name.as_str(), self.position);
            return Ok(false);
        };
        let phase = Phase::for_step(position, direction);

        port.modify_data(self.pin_mask(), self.phase_bits(phase))?;
        self.position = position;
        self.phase = phase;

        debug!(
            "{} ({},{}): {} {}",
            self.name.as_str(),
            self.offset,
            self.offset.saturating_add(1),
            phase.bits(),
            position
        );
        if self.timing.delay_us() > 0 {
            delay.delay_us(self.timing.delay_us());
        }
        Ok(true)
    }

    fn phase_bits(&self, phase: Phase) -> u8 {
        let bits = u32::from(phase.bits())
            .checked_shl(u32::from(self.offset))
            .unwrap_or(0);
        (bits & u32::from(self.pin_mask())) as u8
    }
}

impl Actuator for SteppedActuator {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Stepped
    }

    fn offset(&self) -> u8 {
        self.offset
    }

    fn delay_us(&self) -> u32 {
        self.timing.delay_us()
    }

    /// Speed in units per minute.
    fn speed(&self) -> f64 {
        self.timing.speed()
    }

    fn set_delay(&mut self, delay_us: u32) -> u32 {
        self.timing = Timing::from_delay(delay_us, self.steps_per_unit);
        delay_us
    }

    fn set_speed(&mut self, speed: f64) -> f64 {
        self.timing = Timing::from_speed(speed, self.steps_per_unit);
        self.timing.speed()
    }

    fn merge_into(&self, register: u8) -> u8 {
        (register & !self.pin_mask()) | self.phase_bits(self.phase)
    }

    fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }
}
