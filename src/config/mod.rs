//! Configuration module for parport-actuators.
//!
//! Provides the machine description consumed by
//! [`ActuatorGroup::from_config`](crate::group::ActuatorGroup::from_config):
//! parsed from a plain-text device list, from TOML (with `std` feature), or
//! built directly.

mod device_list;
#[cfg(feature = "std")]
mod loader;
mod machine;
mod validation;

pub use device_list::{parse_device_list, unescape_name};
pub use machine::{MachineConfig, OnoffConfig, StepperConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
