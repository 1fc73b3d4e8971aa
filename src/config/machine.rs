//! Machine configuration - root configuration structure.

use heapless::{String, Vec};
use serde::Deserialize;

use crate::actuator::{MAX_NAME, MAX_UNIT};
use crate::group::MAX_ACTUATORS;

/// One stepper entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepperConfig {
    /// Display name.
    pub name: String<MAX_NAME>,
    /// Lower of the two data bits.
    pub offset: u8,
    /// Physical steps per unit.
    pub steps_per_unit: u32,
    /// Unit label (e.g. "mm").
    pub unit: String<MAX_UNIT>,
}

/// One on/off entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnoffConfig {
    /// Display name.
    pub name: String<MAX_NAME>,
    /// Data bit driven.
    pub offset: u8,
}

/// Root configuration: a named machine and its devices.
///
/// TOML form:
///
/// ```toml
/// name = "Mill"
///
/// [[steppers]]
/// name = "X axis"
/// offset = 0
/// steps_per_unit = 200
/// unit = "mm"
///
/// [[onoffs]]
/// name = "Spindle"
/// offset = 7
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MachineConfig {
    /// Machine name.
    pub name: String<MAX_NAME>,

    /// Steppers in declaration order.
    #[serde(default)]
    pub steppers: Vec<StepperConfig, MAX_ACTUATORS>,

    /// On/off devices in declaration order.
    #[serde(default)]
    pub onoffs: Vec<OnoffConfig, MAX_ACTUATORS>,
}

impl MachineConfig {
    /// Get a stepper configuration by name.
    pub fn stepper(&self, name: &str) -> Option<&StepperConfig> {
        self.steppers.iter().find(|s| s.name.as_str() == name)
    }

    /// Get an on/off configuration by name.
    pub fn onoff(&self, name: &str) -> Option<&OnoffConfig> {
        self.onoffs.iter().find(|o| o.name.as_str() == name)
    }

    /// List all device names, steppers first.
    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.steppers
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.onoffs.iter().map(|o| o.name.as_str()))
    }

    /// Total number of devices.
    pub fn device_count(&self) -> usize {
        self.steppers.len() + self.onoffs.len()
    }
}
