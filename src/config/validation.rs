//! Configuration validation.

use heapless::{String, Vec};

use crate::actuator::{pin_mask, ActuatorKind, MAX_NAME};
use crate::error::{ConfigError, Error, Result};
use crate::group::MAX_ACTUATORS;

use super::MachineConfig;

/// Validate a machine configuration.
///
/// Checks:
/// - Device names are unique across both kinds
/// - No two devices drive the same data bit
///
/// Offsets outside the data register and invalid step counts are not errors
/// here: the actuator constructors replace them with safe defaults and record
/// a warning.
pub fn validate_config(config: &MachineConfig) -> Result<()> {
    let mut seen: Vec<(&str, u8), { 2 * MAX_ACTUATORS }> = Vec::new();

    let devices = config
        .steppers
        .iter()
        .map(|s| (s.name.as_str(), s.offset, ActuatorKind::Stepped))
        .chain(
            config
                .onoffs
                .iter()
                .map(|o| (o.name.as_str(), o.offset, ActuatorKind::Binary)),
        );

    for (name, offset, kind) in devices {
        let mask = if offset > kind.max_offset() {
            0
        } else {
            pin_mask(offset, kind.width())
        };

        for &(other, other_mask) in seen.iter() {
            if other == name {
                return Err(Error::Config(ConfigError::DuplicateDeviceName(owned(name))));
            }
            if other_mask & mask != 0 {
                return Err(Error::Config(ConfigError::PinConflict {
                    first: owned(other),
                    second: owned(name),
                }));
            }
        }

        // Capacity is twice the per-kind limit, so this cannot overflow.
        let _ = seen.push((name, mask));
    }

    Ok(())
}

fn owned(name: &str) -> String<MAX_NAME> {
    String::try_from(name).unwrap_or_default()
}
