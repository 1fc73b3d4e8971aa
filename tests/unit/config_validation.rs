//! Unit tests for configuration validation and actuator corrections.

use embedded_hal_mock::eh1::delay::NoopDelay;
use parport_actuators::actuator::{Actuator, DETACHED_OFFSET};
use parport_actuators::config::{parse_device_list, validate_config};
use parport_actuators::port::{PortHandle, SimulatedPort};
use parport_actuators::{ActuatorGroup, ConfigError, ConfigWarning, Error};

/// Test that adjacent steppers on disjoint bit pairs validate.
#[test]
fn test_packed_register_is_valid() {
    let config = parse_device_list(
        "Packed Stepper A 0 4 mm Stepper B 2 4 mm Stepper C 4 4 mm Onoff D 6 Onoff E 7",
    )
    .unwrap();
    assert!(validate_config(&config).is_ok());
}

/// Test that a binary actuator on a stepper's upper bit conflicts.
#[test]
fn test_binary_on_stepper_pin_conflicts() {
    let config = parse_device_list("Mill Stepper X 4 4 mm Onoff Lamp 5").unwrap();
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::PinConflict { .. }))
    ));
}

/// Test that names are compared after unescaping.
#[test]
fn test_duplicate_after_unescape() {
    let config = parse_device_list("Mill Stepper X_axis 0 4 mm Onoff X_axis 4").unwrap();
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicateDeviceName(ref n))) if n.as_str() == "X axis"
    ));
}

/// Test that out-of-range values are corrected when the group is built.
#[test]
fn test_group_applies_corrections() {
    let config = parse_device_list("Mill Stepper X 7 6 mm Onoff Lamp 12").unwrap();
    validate_config(&config).expect("corrections are not validation errors");

    let mut port = PortHandle::new(SimulatedPort::new());
    let group = ActuatorGroup::from_config(&config, &mut port, NoopDelay::new()).unwrap();

    let x = &group.steppers()[0];
    assert_eq!(x.offset(), DETACHED_OFFSET);
    assert_eq!(x.steps_per_unit(), 4);
    assert_eq!(
        x.warnings(),
        [ConfigWarning::InvalidOffset(7), ConfigWarning::InvalidStepCount(6)]
    );

    let lamp = &group.binaries()[0];
    assert_eq!(lamp.offset(), DETACHED_OFFSET);
    assert_eq!(lamp.warnings(), [ConfigWarning::InvalidOffset(12)]);
}
