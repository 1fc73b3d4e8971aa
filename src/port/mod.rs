//! Parallel port access.
//!
//! [`PortHandle`] owns one port exclusively and exposes its registers; the
//! device I/O itself goes through a [`ParportBackend`].

mod backend;
mod handle;
#[cfg(all(feature = "std", target_os = "linux"))]
mod ppdev;
mod simulated;

pub use backend::{Direction, ParportBackend, Register};
pub use handle::{PortHandle, MAX_PORT_NAME};
pub use simulated::{Fault, RegisterWrite, SimulatedFault, SimulatedPort, WRITE_LOG_CAPACITY};

#[cfg(all(feature = "std", target_os = "linux"))]
pub use ppdev::{Ppdev, DEFAULT_PORT};
