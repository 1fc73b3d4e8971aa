//! # parport-actuators
//!
//! Stepper motor and on/off actuator sequencing over the registers of a
//! parallel port.
//!
//! ## Features
//!
//! - **Exclusive port ownership**: `PortHandle` claims the port, captures its
//!   registers and restores them on release
//! - **Gray-code steppers**: two data bits per motor, phase derived from the
//!   absolute position so reversing retraces the sequence exactly
//! - **On/off actuators**: one data bit each, with a settling delay
//! - **Speed/delay bookkeeping**: per-minute speeds converted to per-step delays
//! - **Configuration-driven**: plain-text device lists or TOML files
//! - **embedded-hal 1.0**: all pauses go through `DelayNs`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parport_actuators::{ActuatorGroup, PortHandle, Ppdev, StdDelay};
//!
//! let config = parport_actuators::load_config("conf")?;
//!
//! let mut port = PortHandle::new(Ppdev::new());
//! port.open("/dev/parport0")?;
//!
//! let mut group = ActuatorGroup::from_config(&config, &mut port, StdDelay::new())?;
//! group.zero()?;
//! group.step(0, -4)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Linux `ppdev` backend, file/TOML loading, `log` output
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[macro_use]
mod fmt;

// Core modules
pub mod actuator;
pub mod config;
#[cfg(feature = "std")]
pub mod delay;
pub mod error;
pub mod group;
pub mod port;

// Re-exports for ergonomic API
pub use actuator::{Actuator, ActuatorKind, BinaryActuator, Phase, SteppedActuator};
pub use config::{parse_device_list, validate_config, MachineConfig};
pub use error::{ConfigError, ConfigWarning, Error, PortError, PortResult, Result};
pub use group::ActuatorGroup;
pub use port::{Direction, ParportBackend, PortHandle, SimulatedPort};

// Configuration loading and wall-clock delays (std only)
#[cfg(feature = "std")]
pub use config::load_config;
#[cfg(feature = "std")]
pub use delay::StdDelay;

#[cfg(all(feature = "std", target_os = "linux"))]
pub use port::Ppdev;
