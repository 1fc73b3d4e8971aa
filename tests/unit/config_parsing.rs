//! Unit tests for device list and TOML configuration parsing.

use std::fs;

use parport_actuators::config::{load_config, parse_config, parse_device_list, MachineConfig};
use parport_actuators::{ConfigError, Error};

/// Test parsing a device list spread over several lines.
#[test]
fn test_parse_multiline_device_list() {
    let config = parse_device_list(
        "Plotter\n\
         Stepper Pen_carriage 0 48 cm\n\
         Stepper Paper_feed 2 200 cm\n\
         Onoff Pen_down 4\n",
    )
    .expect("Failed to parse device list");

    assert_eq!(config.name.as_str(), "Plotter");
    assert_eq!(config.device_count(), 3);

    let feed = config.stepper("Paper feed").expect("Stepper not found");
    assert_eq!(feed.offset, 2);
    assert_eq!(feed.steps_per_unit, 200);
    assert_eq!(feed.unit.as_str(), "cm");

    let names: Vec<&str> = config.device_names().collect();
    assert_eq!(names, ["Pen carriage", "Paper feed", "Pen down"]);
}

/// Test that an empty machine (name only) is accepted.
#[test]
fn test_parse_machine_without_devices() {
    let config = parse_device_list("Bare").unwrap();
    assert_eq!(config.name.as_str(), "Bare");
    assert_eq!(config.device_count(), 0);
}

/// Test that tokens may be separated by any whitespace.
#[test]
fn test_parse_mixed_whitespace() {
    let config = parse_device_list("Mill\tOnoff\t\tLamp   3\r\n").unwrap();
    assert_eq!(config.onoff("Lamp").unwrap().offset, 3);
}

/// Test that the ninth stepper is rejected.
#[test]
fn test_too_many_steppers() {
    let mut list = String::from("Big");
    for i in 0..9 {
        list.push_str(&format!(" Stepper S{i} 0 4 mm"));
    }
    assert_eq!(
        parse_device_list(&list).unwrap_err(),
        Error::Config(ConfigError::TooManyDevices)
    );
}

/// Test that the TOML form matches the device list form.
#[test]
fn test_toml_equivalent_to_device_list() {
    let toml_str = r#"
name = "Mill"

[[steppers]]
name = "X axis"
offset = 0
steps_per_unit = 200
unit = "mm"

[[onoffs]]
name = "Spindle"
offset = 7
"#;

    let from_toml = parse_config(toml_str).expect("Failed to parse TOML");
    let from_list = parse_device_list("Mill Stepper X_axis 0 200 mm Onoff Spindle 7").unwrap();
    assert_eq!(from_toml, from_list);
}

/// Test that a TOML file missing a required field fails to parse.
#[test]
fn test_toml_missing_field() {
    let toml_str = r#"
name = "Mill"

[[onoffs]]
name = "Spindle"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test loading both file formats from disk.
#[test]
fn test_load_config_by_extension() {
    let dir = std::env::temp_dir().join(format!("parport-actuators-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let list_path = dir.join("conf");
    fs::write(&list_path, "Lathe\nStepper Carriage 0 400 mm\n").unwrap();

    let toml_path = dir.join("lathe.toml");
    fs::write(
        &toml_path,
        "name = \"Lathe\"\n[[steppers]]\nname = \"Carriage\"\noffset = 0\nsteps_per_unit = 400\nunit = \"mm\"\n",
    )
    .unwrap();

    let from_list: MachineConfig = load_config(&list_path).expect("Failed to load device list");
    let from_toml: MachineConfig = load_config(&toml_path).expect("Failed to load TOML");
    assert_eq!(from_list, from_toml);

    fs::remove_dir_all(&dir).ok();
}
