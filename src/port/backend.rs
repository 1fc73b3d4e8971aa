//! Hardware backend seam for the parallel port registers.

use core::fmt;

/// Direction of the data pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Data pins drive the outputs.
    #[default]
    Out,
    /// Data pins are high-impedance inputs.
    In,
}

impl Direction {
    /// Create from the `out` flag used by the port API.
    #[inline]
    pub const fn from_out(out: bool) -> Self {
        if out {
            Direction::Out
        } else {
            Direction::In
        }
    }

    /// Check if the data pins are outputs.
    #[inline]
    pub const fn is_out(self) -> bool {
        matches!(self, Direction::Out)
    }
}

/// The three 8-bit registers exposed by a parallel port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Data register (pins 2-9).
    Data,
    /// Status register (read-only).
    Status,
    /// Control register.
    Control,
}

/// Raw access to one parallel port device.
///
/// Implementations perform exactly one device operation per call and do not
/// track open state; [`PortHandle`](super::PortHandle) owns the lifecycle and
/// maps failures onto [`PortError`](crate::error::PortError).
pub trait ParportBackend {
    /// Backend-specific failure detail.
    type Error: fmt::Debug;

    /// Open the device node.
    fn open(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Claim exclusive access to the port.
    fn claim(&mut self) -> Result<(), Self::Error>;

    /// Release exclusive access to the port.
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Close the device node.
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Set the direction of the data pins.
    fn set_data_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Read the data register.
    fn read_data(&mut self) -> Result<u8, Self::Error>;

    /// Write the data register.
    fn write_data(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Read the status register.
    fn read_status(&mut self) -> Result<u8, Self::Error>;

    /// Read the control register (last value written, on most drivers).
    fn read_control(&mut self) -> Result<u8, Self::Error>;

    /// Write the control register.
    fn write_control(&mut self, value: u8) -> Result<(), Self::Error>;
}

impl<T: ParportBackend + ?Sized> ParportBackend for &mut T {
    type Error = T::Error;

    fn open(&mut self, path: &str) -> Result<(), Self::Error> {
        T::open(self, path)
    }

    fn claim(&mut self) -> Result<(), Self::Error> {
        T::claim(self)
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        T::release(self)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        T::close(self)
    }

    fn set_data_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        T::set_data_direction(self, direction)
    }

    fn read_data(&mut self) -> Result<u8, Self::Error> {
        T::read_data(self)
    }

    fn write_data(&mut self, value: u8) -> Result<(), Self::Error> {
        T::write_data(self, value)
    }

    fn read_status(&mut self) -> Result<u8, Self::Error> {
        T::read_status(self)
    }

    fn read_control(&mut self) -> Result<u8, Self::Error> {
        T::read_control(self)
    }

    fn write_control(&mut self, value: u8) -> Result<(), Self::Error> {
        T::write_control(self, value)
    }
}
