//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::device_list::parse_device_list;
use super::MachineConfig;

/// Load configuration from a file.
///
/// Files with a `.toml` extension are read as TOML; anything else as a
/// plain-text device list.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use parport_actuators::load_config;
///
/// let config = load_config("conf")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MachineConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        parse_config(&content)
    } else {
        let config = parse_device_list(&content)?;
        super::validation::validate_config(&config)?;
        Ok(config)
    }
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<MachineConfig> {
    let config: MachineConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
name = "Plotter"

[[steppers]]
name = "Pen carriage"
offset = 0
steps_per_unit = 48
unit = "cm"
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.name.as_str(), "Plotter");
        assert_eq!(config.stepper("Pen carriage").unwrap().steps_per_unit, 48);
        assert!(config.onoffs.is_empty());
    }

    #[test]
    fn test_parse_rejects_pin_conflict() {
        let toml = r#"
name = "Plotter"

[[steppers]]
name = "Carriage"
offset = 0
steps_per_unit = 48
unit = "cm"

[[onoffs]]
name = "Pen"
offset = 1
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::PinConflict { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/parport.conf"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }
}
