//! Exclusive handle to one parallel port.

use heapless::String;

use crate::error::{PortError, PortResult};

use super::backend::{Direction, ParportBackend};

/// Maximum length of a port device path.
pub const MAX_PORT_NAME: usize = 64;

/// Exclusive owner of one parallel port.
///
/// Opening claims the port for this process, captures the data and control
/// registers and forces the data pins to output. Closing writes the captured
/// values back before releasing the claim. A handle left open is closed when
/// dropped.
///
/// `PortHandle` is deliberately neither `Clone` nor `Copy`: two owners could
/// interleave register writes on the same device.
///
/// # Example
///
/// ```rust
/// use parport_actuators::port::{PortHandle, SimulatedPort};
///
/// let mut port = PortHandle::new(SimulatedPort::new());
/// port.open("/dev/parport0")?;
/// port.write_data(0b0000_0101)?;
/// assert_eq!(port.read_data()?, 0b0000_0101);
/// port.close()?;
/// # Ok::<(), parport_actuators::PortError>(())
/// ```
#[derive(Debug)]
pub struct PortHandle<B: ParportBackend> {
    /// Device backend performing the register I/O.
    backend: B,
    /// Path of the opened device (empty while closed).
    name: String<MAX_PORT_NAME>,
    /// Whether the port is open and claimed.
    is_open: bool,
    /// Data register value captured on open.
    saved_data: u8,
    /// Control register value captured on open.
    saved_control: u8,
    /// Configured data pin direction.
    direction: Direction,
}

impl<B: ParportBackend + Default> Default for PortHandle<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: ParportBackend> PortHandle<B> {
    /// Create a closed handle around a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            name: String::new(),
            is_open: false,
            saved_data: 0,
            saved_control: 0,
            direction: Direction::Out,
        }
    }

    /// Open and claim the port at `name`.
    ///
    /// # Errors
    ///
    /// - `AlreadyOpen` if this handle is already open (state is unchanged)
    /// - `OpenFailed` if the device cannot be opened
    /// - `PermissionDenied` if the exclusive claim is refused
    /// - `ReadFailed` if the current registers cannot be captured
    pub fn open(&mut self, name: &str) -> PortResult<()> {
        if self.is_open {
            return Err(PortError::AlreadyOpen);
        }

        let name = String::try_from(name).map_err(|_| PortError::OpenFailed)?;

        if self.backend.open(name.as_str()).is_err() {
            warn!("cannot open port {}", name.as_str());
            return Err(PortError::OpenFailed);
        }

        if self.backend.claim().is_err() {
            warn!("cannot claim port {}", name.as_str());
            let _ = self.backend.close();
            return Err(PortError::PermissionDenied);
        }

        let saved = self
            .backend
            .read_data()
            .and_then(|data| self.backend.read_control().map(|control| (data, control)));
        let (saved_data, saved_control) = match saved {
            Ok(regs) => regs,
            Err(_) => {
                warn!("cannot capture registers of port {}", name.as_str());
                let _ = self.backend.release();
                let _ = self.backend.close();
                return Err(PortError::ReadFailed);
            }
        };

        if self.backend.set_data_direction(Direction::Out).is_err() {
            warn!("cannot set data direction of port {}", name.as_str());
        }

        info!("opened port {}", name.as_str());
        self.name = name;
        self.saved_data = saved_data;
        self.saved_control = saved_control;
        self.direction = Direction::Out;
        self.is_open = true;
        Ok(())
    }

    /// Restore the captured registers, release the claim and close the device.
    ///
    /// Restoring the registers is best-effort: a failed restore write is
    /// logged and the release still proceeds.
    ///
    /// # Errors
    ///
    /// - `NotOpen` if the handle is closed
    /// - `PermissionDenied` if the claim cannot be released (the handle stays
    ///   open so the release can be retried)
    /// - `CloseFailed` if the device cannot be closed (the handle is reset
    ///   regardless, since the descriptor is gone)
    pub fn close(&mut self) -> PortResult<()> {
        if !self.is_open {
            return Err(PortError::NotOpen);
        }

        if self.backend.write_data(self.saved_data).is_err() {
            warn!("cannot restore data register of port {}", self.name.as_str());
        }
        if self.backend.write_control(self.saved_control).is_err() {
            warn!("cannot restore control register of port {}", self.name.as_str());
        }

        if self.backend.release().is_err() {
            return Err(PortError::PermissionDenied);
        }

        let closed = self.backend.close();
        info!("closed port {}", self.name.as_str());
        self.reset();
        closed.map_err(|_| PortError::CloseFailed)
    }

    /// Check if the port is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Check if the port is closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.is_open
    }

    /// Get the path of the opened port.
    pub fn name(&self) -> PortResult<&str> {
        self.ensure_open()?;
        Ok(self.name.as_str())
    }

    /// Read the data register.
    pub fn read_data(&mut self) -> PortResult<u8> {
        self.ensure_open()?;
        self.backend.read_data().map_err(|_| PortError::ReadFailed)
    }

    /// Write the data register.
    pub fn write_data(&mut self, value: u8) -> PortResult<()> {
        self.ensure_open()?;
        self.backend
            .write_data(value)
            .map_err(|_| PortError::WriteFailed)
    }

    /// Read the status register.
    ///
    /// Some status pins are inverted by the hardware; the raw value is returned.
    pub fn read_status(&mut self) -> PortResult<u8> {
        self.ensure_open()?;
        self.backend.read_status().map_err(|_| PortError::ReadFailed)
    }

    /// Read the control register.
    ///
    /// This is the last value written in software, not necessarily the
    /// physical pin state.
    pub fn read_control(&mut self) -> PortResult<u8> {
        self.ensure_open()?;
        self.backend
            .read_control()
            .map_err(|_| PortError::ReadFailed)
    }

    /// Write the control register.
    ///
    /// Bit 5 also switches the data pin direction on many ports; prefer
    /// [`set_direction`](Self::set_direction) for that.
    pub fn write_control(&mut self, value: u8) -> PortResult<()> {
        self.ensure_open()?;
        self.backend
            .write_control(value)
            .map_err(|_| PortError::WriteFailed)
    }

    /// Get the configured data pin direction.
    pub fn direction(&self) -> PortResult<Direction> {
        self.ensure_open()?;
        Ok(self.direction)
    }

    /// Set the data pins to output (`true`) or input (`false`).
    pub fn set_direction(&mut self, out: bool) -> PortResult<()> {
        self.ensure_open()?;
        let direction = Direction::from_out(out);
        self.backend
            .set_data_direction(direction)
            .map_err(|_| PortError::PermissionDenied)?;
        self.direction = direction;
        Ok(())
    }

    /// Read-modify-write the bits selected by `mask` in the data register.
    ///
    /// Returns the byte written.
    pub fn modify_data(&mut self, mask: u8, bits: u8) -> PortResult<u8> {
        let value = (self.read_data()? & !mask) | (bits & mask);
        self.write_data(value)?;
        Ok(value)
    }

    /// Get the backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the backend mutably.
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    fn ensure_open(&self) -> PortResult<()> {
        if self.is_open {
            Ok(())
        } else {
            Err(PortError::NotOpen)
        }
    }

    fn reset(&mut self) {
        self.name.clear();
        self.is_open = false;
        self.saved_data = 0;
        self.saved_control = 0;
        self.direction = Direction::Out;
    }
}

impl<B: ParportBackend> Drop for PortHandle<B> {
    fn drop(&mut self) {
        if self.is_open {
            if let Err(e) = self.close() {
                warn!("implicit close of port failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::backend::Register;
    use crate::port::simulated::{Fault, SimulatedPort};

    fn open_port() -> PortHandle<SimulatedPort> {
        let mut port = PortHandle::new(SimulatedPort::new());
        port.open("/dev/parport0").unwrap();
        port
    }

    #[test]
    fn test_open_captures_registers() {
        let mut sim = SimulatedPort::new();
        sim.set_register(Register::Data, 0xA5);
        sim.set_register(Register::Control, 0x0C);
        let mut port = PortHandle::new(sim);

        port.open("/dev/parport0").unwrap();
        assert!(port.is_open());
        assert_eq!(port.name().unwrap(), "/dev/parport0");
        assert_eq!(port.direction().unwrap(), Direction::Out);
        assert!(port.backend().is_claimed());

        port.write_data(0).unwrap();
        port.write_control(0).unwrap();
        port.close().unwrap();

        assert!(port.is_closed());
        assert_eq!(port.backend().register(Register::Data), 0xA5);
        assert_eq!(port.backend().register(Register::Control), 0x0C);
        assert!(!port.backend().is_claimed());
        assert!(!port.backend().is_device_open());
    }

    #[test]
    fn test_open_twice_keeps_first_open() {
        let mut port = open_port();
        assert_eq!(port.open("/dev/parport1"), Err(PortError::AlreadyOpen));
        assert_eq!(port.name().unwrap(), "/dev/parport0");
        assert!(port.is_open());
    }

    #[test]
    fn test_open_failed() {
        let mut sim = SimulatedPort::new();
        sim.inject(Fault::Open);
        let mut port = PortHandle::new(sim);
        assert_eq!(port.open("/dev/parport0"), Err(PortError::OpenFailed));
        assert!(port.is_closed());
    }

    #[test]
    fn test_claim_refused_closes_device() {
        let mut sim = SimulatedPort::new();
        sim.claim_elsewhere();
        let mut port = PortHandle::new(sim);
        assert_eq!(port.open("/dev/parport0"), Err(PortError::PermissionDenied));
        assert!(port.is_closed());
        assert!(!port.backend().is_device_open());
    }

    #[test]
    fn test_closed_port_performs_no_io() {
        let mut port = PortHandle::new(SimulatedPort::new());
        assert_eq!(port.read_data(), Err(PortError::NotOpen));
        assert_eq!(port.write_data(1), Err(PortError::NotOpen));
        assert_eq!(port.read_status(), Err(PortError::NotOpen));
        assert_eq!(port.read_control(), Err(PortError::NotOpen));
        assert_eq!(port.write_control(1), Err(PortError::NotOpen));
        assert_eq!(port.set_direction(false), Err(PortError::NotOpen));
        assert_eq!(port.name(), Err(PortError::NotOpen));
        assert_eq!(port.close(), Err(PortError::NotOpen));
        assert_eq!(port.backend().io_count(), 0);
    }

    #[test]
    fn test_read_and_write_failures() {
        let mut port = open_port();
        port.backend_mut().inject(Fault::Read);
        assert_eq!(port.read_data(), Err(PortError::ReadFailed));
        assert_eq!(port.read_status(), Err(PortError::ReadFailed));

        port.backend_mut().clear_faults();
        port.backend_mut().inject(Fault::Write);
        assert_eq!(port.write_data(3), Err(PortError::WriteFailed));
        assert_eq!(port.write_control(3), Err(PortError::WriteFailed));
    }

    #[test]
    fn test_set_direction() {
        let mut port = open_port();
        port.set_direction(false).unwrap();
        assert_eq!(port.direction().unwrap(), Direction::In);

        port.backend_mut().inject(Fault::Direction);
        assert_eq!(port.set_direction(true), Err(PortError::PermissionDenied));
        assert_eq!(port.direction().unwrap(), Direction::In);
    }

    #[test]
    fn test_release_failure_keeps_port_open() {
        let mut port = open_port();
        port.backend_mut().inject(Fault::Release);
        assert_eq!(port.close(), Err(PortError::PermissionDenied));
        assert!(port.is_open());

        port.backend_mut().clear_faults();
        port.close().unwrap();
        assert!(port.is_closed());
    }

    #[test]
    fn test_close_failure_resets_handle() {
        let mut port = open_port();
        port.backend_mut().inject(Fault::Close);
        assert_eq!(port.close(), Err(PortError::CloseFailed));
        assert!(port.is_closed());
    }

    #[test]
    fn test_restore_failure_is_not_fatal() {
        let mut port = open_port();
        port.backend_mut().inject(Fault::Write);
        assert!(port.close().is_ok());
        assert!(port.is_closed());
    }

    #[test]
    fn test_modify_data_preserves_other_bits() {
        let mut port = open_port();
        port.write_data(0b1111_0000).unwrap();
        let written = port.modify_data(0b0000_0011, 0b0000_0010).unwrap();
        assert_eq!(written, 0b1111_0010);
        assert_eq!(port.read_data().unwrap(), 0b1111_0010);
    }

    #[test]
    fn test_register_capture_failure_releases_port() {
        let mut sim = SimulatedPort::new();
        sim.inject(Fault::Read);
        let mut port = PortHandle::new(sim);

        assert_eq!(port.open("/dev/parport0"), Err(PortError::ReadFailed));
        assert!(port.is_closed());
        assert!(!port.backend().is_claimed());
        assert!(!port.backend().is_device_open());
    }

    #[test]
    fn test_direction_failure_on_open_is_ignored() {
        let mut sim = SimulatedPort::new();
        sim.inject(Fault::Direction);
        let mut port = PortHandle::new(sim);

        assert_eq!(port.open("/dev/parport0"), Ok(()));
        assert!(port.is_open());
        assert!(port.backend().is_claimed());
        assert_eq!(port.direction(), Ok(Direction::Out));
    }

    #[test]
    fn test_drop_closes_open_port() {
        let mut sim = SimulatedPort::new();
        sim.set_register(Register::Data, 0x3C);
        sim.set_register(Register::Control, 0x04);

        {
            let mut port = PortHandle::new(&mut sim);
            port.open("/dev/parport0").unwrap();
            port.write_data(0xFF).unwrap();
            port.write_control(0x0B).unwrap();
        }

        assert_eq!(sim.register(Register::Data), 0x3C);
        assert_eq!(sim.register(Register::Control), 0x04);
        assert!(!sim.is_claimed());
        assert!(!sim.is_device_open());
    }

    #[test]
    fn test_drop_of_closed_port_performs_no_io() {
        let mut sim = SimulatedPort::new();
        {
            let mut port = PortHandle::new(&mut sim);
            port.open("/dev/parport0").unwrap();
            port.close().unwrap();
        }
        let after_close = sim.io_count();
        drop(PortHandle::new(&mut sim));
        assert_eq!(sim.io_count(), after_close);
    }
}
