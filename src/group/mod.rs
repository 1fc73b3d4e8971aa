//! Groups of actuators sharing one parallel port.

mod actuator_group;
mod report;

pub use actuator_group::{ActuatorGroup, DEFAULT_BINARY_SPEED, DEFAULT_STEPPER_SPEED, MAX_ACTUATORS};
