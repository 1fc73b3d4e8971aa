//! Actuator group facade.
//!
//! Provides a high-level API over the actuators wired to one port.

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};

use crate::actuator::{Actuator, ActuatorRef, BinaryActuator, SteppedActuator, MAX_NAME};
use crate::config::MachineConfig;
use crate::error::{ConfigError, Error, PortResult, Result};
use crate::port::{ParportBackend, PortHandle};

/// Maximum number of actuators of each kind in one group.
pub const MAX_ACTUATORS: usize = 8;

/// Speed given to steppers built from configuration, in units per minute.
pub const DEFAULT_STEPPER_SPEED: f64 = 1.0;

/// Speed given to on/off actuators built from configuration, in toggles per minute.
pub const DEFAULT_BINARY_SPEED: f64 = 60.0;

/// The actuators wired to one parallel port.
///
/// The group borrows the port; it never opens or closes it. Every actuator
/// command is issued through the bound port and paused with the group's
/// delay provider.
///
/// # Example
///
/// ```rust
/// use embedded_hal_mock::eh1::delay::NoopDelay;
/// use parport_actuators::actuator::{BinaryActuator, SteppedActuator};
/// use parport_actuators::group::ActuatorGroup;
/// use parport_actuators::port::{PortHandle, SimulatedPort};
///
/// let mut port = PortHandle::new(SimulatedPort::new());
/// port.open("/dev/parport0")?;
///
/// let mut group = ActuatorGroup::new("mill", &mut port, NoopDelay::new())?;
/// group.add_stepper(SteppedActuator::new("X axis", 0, 200, "mm")?)?;
/// group.add_binary(BinaryActuator::new("Spindle", 7)?)?;
///
/// group.zero()?;
/// group.step(0, 4)?;
/// group.set(0, true)?;
/// assert_eq!(group.steppers()[0].position(), 4);
/// # Ok::<(), parport_actuators::Error>(())
/// ```
pub struct ActuatorGroup<'p, B: ParportBackend, D: DelayNs> {
    /// Group name for reporting.
    name: String<MAX_NAME>,
    /// Port every command goes through.
    port: &'p mut PortHandle<B>,
    /// Pause provider for step and toggle delays.
    delay: D,
    /// Steppers in declaration order.
    steppers: Vec<SteppedActuator, MAX_ACTUATORS>,
    /// On/off actuators in declaration order.
    binaries: Vec<BinaryActuator, MAX_ACTUATORS>,
}

impl<'p, B: ParportBackend, D: DelayNs> ActuatorGroup<'p, B, D> {
    /// Create an empty group bound to `port`.
    ///
    /// # Errors
    ///
    /// Returns `NameTooLong` if `name` exceeds 32 bytes.
    pub fn new(name: &str, port: &'p mut PortHandle<B>, delay: D) -> Result<Self> {
        let name = String::try_from(name).map_err(|_| Error::Config(ConfigError::NameTooLong))?;
        Ok(Self {
            name,
            port,
            delay,
            steppers: Vec::new(),
            binaries: Vec::new(),
        })
    }

    /// Build a group from a parsed configuration.
    ///
    /// Steppers start at [`DEFAULT_STEPPER_SPEED`] and on/off actuators at
    /// [`DEFAULT_BINARY_SPEED`]. Out-of-range offsets and step counts are
    /// corrected by the actuator constructors and recorded as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is too long or a kind exceeds
    /// [`MAX_ACTUATORS`].
    pub fn from_config(config: &MachineConfig, port: &'p mut PortHandle<B>, delay: D) -> Result<Self> {
        let mut group = Self::new(config.name.as_str(), port, delay)?;

        for s in config.steppers.iter() {
            let mut stepper =
                SteppedActuator::new(s.name.as_str(), s.offset, s.steps_per_unit, s.unit.as_str())?;
            stepper.set_speed(DEFAULT_STEPPER_SPEED);
            group.add_stepper(stepper)?;
        }

        for o in config.onoffs.iter() {
            let mut binary = BinaryActuator::new(o.name.as_str(), o.offset)?;
            binary.set_speed(DEFAULT_BINARY_SPEED);
            group.add_binary(binary)?;
        }

        Ok(group)
    }

    /// Get the group name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Add a stepper.
    ///
    /// # Errors
    ///
    /// Returns `TooManyDevices` if the group already holds [`MAX_ACTUATORS`] steppers.
    pub fn add_stepper(&mut self, stepper: SteppedActuator) -> Result<()> {
        self.steppers
            .push(stepper)
            .map_err(|_| Error::Config(ConfigError::TooManyDevices))
    }

    /// Add an on/off actuator.
    ///
    /// # Errors
    ///
    /// Returns `TooManyDevices` if the group already holds [`MAX_ACTUATORS`] of them.
    pub fn add_binary(&mut self, binary: BinaryActuator) -> Result<()> {
        self.binaries
            .push(binary)
            .map_err(|_| Error::Config(ConfigError::TooManyDevices))
    }

    /// Bind every actuator to another port; returns the previous one.
    pub fn bind(&mut self, port: &'p mut PortHandle<B>) -> &'p mut PortHandle<B> {
        core::mem::replace(&mut self.port, port)
    }

    /// Get the bound port.
    #[inline]
    pub fn port(&self) -> &PortHandle<B> {
        &*self.port
    }

    /// Get the bound port mutably, for direct register access.
    #[inline]
    pub fn port_mut(&mut self) -> &mut PortHandle<B> {
        &mut *self.port
    }

    /// Get the delay provider.
    #[inline]
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Get the steppers.
    #[inline]
    pub fn steppers(&self) -> &[SteppedActuator] {
        &self.steppers
    }

    /// Get the on/off actuators.
    #[inline]
    pub fn binaries(&self) -> &[BinaryActuator] {
        &self.binaries
    }

    /// Get a stepper mutably, e.g. to change its speed.
    pub fn stepper_mut(&mut self, index: usize) -> Option<&mut SteppedActuator> {
        self.steppers.get_mut(index)
    }

    /// Get an on/off actuator mutably.
    pub fn binary_mut(&mut self, index: usize) -> Option<&mut BinaryActuator> {
        self.binaries.get_mut(index)
    }

    /// Find an actuator of either kind by name.
    pub fn actuator(&self, name: &str) -> Option<ActuatorRef<'_>> {
        self.actuators().find(|a| a.as_actuator().name() == name)
    }

    /// Iterate over all actuators, steppers first.
    pub fn actuators(&self) -> impl Iterator<Item = ActuatorRef<'_>> {
        self.steppers
            .iter()
            .map(ActuatorRef::Stepped)
            .chain(self.binaries.iter().map(ActuatorRef::Binary))
    }

    /// Move stepper `index` by `steps`.
    ///
    /// An unknown index is a no-op.
    pub fn step(&mut self, index: usize, steps: i64) -> PortResult<()> {
        match self.steppers.get_mut(index) {
            Some(stepper) => stepper.step(steps, self.port, &mut self.delay),
            None => Ok(()),
        }
    }

    /// Move stepper `index` to an absolute position.
    ///
    /// An unknown index is a no-op.
    pub fn goto(&mut self, index: usize, target: i64) -> PortResult<()> {
        match self.steppers.get_mut(index) {
            Some(stepper) => stepper.goto(target, self.port, &mut self.delay),
            None => Ok(()),
        }
    }

    /// Drive on/off actuator `index`; returns the new state.
    ///
    /// An unknown index reports `false` without touching the port.
    pub fn set(&mut self, index: usize, state: bool) -> PortResult<bool> {
        match self.binaries.get_mut(index) {
            Some(binary) => binary.set(state, self.port, &mut self.delay),
            None => Ok(false),
        }
    }

    /// Invert on/off actuator `index`; returns the new state.
    pub fn toggle(&mut self, index: usize) -> PortResult<bool> {
        match self.binaries.get_mut(index) {
            Some(binary) => binary.toggle(self.port, &mut self.delay),
            None => Ok(false),
        }
    }

    /// Force the safe state.
    ///
    /// Clears the data register, declares every stepper at position 0 and
    /// drives its zero phase, then switches every on/off actuator off. Nothing
    /// is physically moved: the actuators are assumed to be at home already.
    pub fn zero(&mut self) -> PortResult<()> {
        self.port.write_data(0)?;

        for stepper in self.steppers.iter_mut() {
            stepper.set_position(0);
            stepper.sync(self.port)?;
            if stepper.delay_us() > 0 {
                self.delay.delay_us(stepper.delay_us());
            }
        }

        for binary in self.binaries.iter_mut() {
            binary.set(false, self.port, &mut self.delay)?;
        }

        debug!("zeroed group {}", self.name.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::SimulatedPort;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn open_port() -> PortHandle<SimulatedPort> {
        let mut port = PortHandle::new(SimulatedPort::new());
        port.open("/dev/parport0").unwrap();
        port
    }

    #[test]
    fn test_capacity() {
        let mut port = open_port();
        let mut group = ActuatorGroup::new("full", &mut port, NoopDelay::new()).unwrap();
        for i in 0..MAX_ACTUATORS {
            group.add_binary(BinaryActuator::new("b", i as u8).unwrap()).unwrap();
        }
        assert_eq!(
            group.add_binary(BinaryActuator::new("b", 0).unwrap()),
            Err(Error::Config(ConfigError::TooManyDevices))
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let mut port = open_port();
        let mut group = ActuatorGroup::new("g", &mut port, NoopDelay::new()).unwrap();
        group.add_stepper(SteppedActuator::new("X axis", 0, 4, "mm").unwrap()).unwrap();
        group.add_binary(BinaryActuator::new("Pump", 4).unwrap()).unwrap();

        assert!(matches!(group.actuator("X axis"), Some(ActuatorRef::Stepped(_))));
        assert!(matches!(group.actuator("Pump"), Some(ActuatorRef::Binary(_))));
        assert!(group.actuator("Y axis").is_none());
        assert_eq!(group.actuators().count(), 2);
    }

    #[test]
    fn test_unknown_index_is_noop() {
        let mut port = open_port();
        let mut group = ActuatorGroup::new("g", &mut port, NoopDelay::new()).unwrap();
        assert!(group.step(3, 10).is_ok());
        assert_eq!(group.set(3, true), Ok(false));
        assert_eq!(group.port().backend().data_writes().count(), 0);
    }

    #[test]
    fn test_bind_switches_port() {
        let mut first = open_port();
        let mut second = open_port();
        let mut group = ActuatorGroup::new("g", &mut first, NoopDelay::new()).unwrap();
        group.add_binary(BinaryActuator::new("Lamp", 0).unwrap()).unwrap();

        let previous = group.bind(&mut second);
        assert!(previous.is_open());
        group.set(0, true).unwrap();
        drop(group);

        assert_eq!(second.read_data().unwrap(), 1);
        assert_eq!(first.read_data().unwrap(), 0);
    }

    #[test]
    fn test_commands_on_closed_port_fail() {
        let mut port = PortHandle::new(SimulatedPort::new());
        let mut group = ActuatorGroup::new("g", &mut port, NoopDelay::new()).unwrap();
        group.add_stepper(SteppedActuator::new("X", 0, 4, "mm").unwrap()).unwrap();
        assert_eq!(group.zero(), Err(crate::error::PortError::NotOpen));
        assert_eq!(group.step(0, 1), Err(crate::error::PortError::NotOpen));
        assert_eq!(group.steppers()[0].position(), 0);
    }
}
