//! In-memory parallel port for tests and dry runs.

use heapless::Vec;

use super::backend::{Direction, ParportBackend, Register};

/// Maximum number of register writes kept in the log.
///
/// Later writes are counted by [`SimulatedPort::dropped_writes`] but not kept.
pub const WRITE_LOG_CAPACITY: usize = 256;

/// Device operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Opening the device node.
    Open,
    /// Claiming the port.
    Claim,
    /// Releasing the port.
    Release,
    /// Closing the device node.
    Close,
    /// Changing the data direction.
    Direction,
    /// Any register read.
    Read,
    /// Any register write.
    Write,
}

impl Fault {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Failure reported by [`SimulatedPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimulatedFault {
    /// An injected fault fired.
    Injected(Fault),
    /// The port is claimed by another owner.
    Busy,
    /// The device node is not open.
    NotOpen,
}

/// A register write recorded by [`SimulatedPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    /// Register written.
    pub register: Register,
    /// Value written.
    pub value: u8,
}

/// Simulated parallel port.
///
/// Keeps the three registers in memory, logs every register write, counts
/// every device operation and can be told to fail any of them.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPort {
    data: u8,
    status: u8,
    control: u8,
    /// Value seen on the data pins while they are inputs.
    external_data: u8,
    direction: Direction,
    device_open: bool,
    claimed: bool,
    claimed_elsewhere: bool,
    faults: u8,
    io_count: u32,
    writes: Vec<RegisterWrite, WRITE_LOG_CAPACITY>,
    dropped_writes: u32,
}

impl SimulatedPort {
    /// Create a simulated port with all registers at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an operation fail until [`clear_faults`](Self::clear_faults).
    pub fn inject(&mut self, fault: Fault) {
        self.faults |= fault.bit();
    }

    /// Stop failing operations.
    pub fn clear_faults(&mut self) {
        self.faults = 0;
    }

    /// Pretend another process holds the claim on this port.
    pub fn claim_elsewhere(&mut self) {
        self.claimed_elsewhere = true;
    }

    /// Set a register directly, bypassing the log and counter.
    pub fn set_register(&mut self, register: Register, value: u8) {
        match register {
            Register::Data => self.data = value,
            Register::Status => self.status = value,
            Register::Control => self.control = value,
        }
    }

    /// Current value of a register.
    pub fn register(&self, register: Register) -> u8 {
        match register {
            Register::Data => self.data,
            Register::Status => self.status,
            Register::Control => self.control,
        }
    }

    /// Set the value driven onto the data pins from outside.
    pub fn set_external_data(&mut self, value: u8) {
        self.external_data = value;
    }

    /// Current data pin direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the device node is open.
    pub fn is_device_open(&self) -> bool {
        self.device_open
    }

    /// Whether this port holds the claim.
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Number of device operations performed.
    pub fn io_count(&self) -> u32 {
        self.io_count
    }

    /// Logged register writes, oldest first.
    ///
    /// Holds the first [`WRITE_LOG_CAPACITY`] writes since the log was last
    /// cleared; check [`overflowed`](Self::overflowed) before treating it as
    /// complete.
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Values written to the data register, oldest first.
    pub fn data_writes(&self) -> impl Iterator<Item = u8> + '_ {
        self.writes
            .iter()
            .filter(|w| w.register == Register::Data)
            .map(|w| w.value)
    }

    /// Number of writes that did not fit in the log.
    pub fn dropped_writes(&self) -> u32 {
        self.dropped_writes
    }

    /// Whether any write was left out of the log.
    pub fn overflowed(&self) -> bool {
        self.dropped_writes > 0
    }

    /// Forget all logged writes.
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.dropped_writes = 0;
    }

    fn check(&mut self, fault: Fault) -> Result<(), SimulatedFault> {
        self.io_count += 1;
        if self.faults & fault.bit() != 0 {
            Err(SimulatedFault::Injected(fault))
        } else {
            Ok(())
        }
    }

    fn check_register(&mut self, fault: Fault) -> Result<(), SimulatedFault> {
        self.check(fault)?;
        if self.device_open {
            Ok(())
        } else {
            Err(SimulatedFault::NotOpen)
        }
    }

    fn log(&mut self, register: Register, value: u8) {
        if self.writes.push(RegisterWrite { register, value }).is_err() {
            self.dropped_writes = self.dropped_writes.saturating_add(1);
        }
    }
}

impl ParportBackend for SimulatedPort {
    type Error = SimulatedFault;

    fn open(&mut self, _path: &str) -> Result<(), Self::Error> {
        self.check(Fault::Open)?;
        self.device_open = true;
        Ok(())
    }

    fn claim(&mut self) -> Result<(), Self::Error> {
        self.check_register(Fault::Claim)?;
        if self.claimed_elsewhere {
            return Err(SimulatedFault::Busy);
        }
        self.claimed = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.check_register(Fault::Release)?;
        self.claimed = false;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.check_register(Fault::Close)?;
        self.device_open = false;
        Ok(())
    }

    fn set_data_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        self.check_register(Fault::Direction)?;
        self.direction = direction;
        Ok(())
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        self.check_register(Fault::Read)?;
        Ok(match self.direction {
            Direction::Out => self.data,
            Direction::In => self.external_data,
        })
    }

    fn write_data(&mut self, value: u8) -> Result<(), Self::Error> {
        self.check_register(Fault::Write)?;
        self.data = value;
        self.log(Register::Data, value);
        Ok(())
    }

    fn read_status(&mut self) -> Result<u8, Self::Error> {
        self.check_register(Fault::Read)?;
        Ok(self.status)
    }

    fn read_control(&mut self) -> Result<u8, Self::Error> {
        self.check_register(Fault::Read)?;
        Ok(self.control)
    }

    fn write_control(&mut self, value: u8) -> Result<(), Self::Error> {
        self.check_register(Fault::Write)?;
        self.control = value;
        self.log(Register::Control, value);
        Ok(())
    }
}
