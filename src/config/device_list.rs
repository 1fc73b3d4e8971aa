//! Plain-text device list.
//!
//! The first token names the machine; each following entry is one of
//!
//! ```text
//! Stepper <name> <offset> <steps_per_unit> <unit>
//! Onoff   <name> <offset>
//! ```
//!
//! Tokens are separated by any whitespace. Names cannot contain spaces, so
//! `_` stands for a space and `__` for a literal underscore.

use core::str::{FromStr, SplitWhitespace};

use heapless::String;

use crate::actuator::MAX_NAME;
use crate::error::{ConfigError, Error, Result};

use super::machine::{MachineConfig, OnoffConfig, StepperConfig};

/// Parse a device list into a machine configuration.
///
/// The result is not validated; see [`validate_config`](super::validate_config).
///
/// # Errors
///
/// Returns an error on an unknown device kind, a truncated entry, a malformed
/// number, an overlong name or too many devices of one kind.
pub fn parse_device_list(content: &str) -> Result<MachineConfig> {
    let mut tokens = Tokens(content.split_whitespace());

    let mut config = MachineConfig {
        name: unescape_name(tokens.next("machine name")?)?,
        ..MachineConfig::default()
    };

    while let Some(kind) = tokens.0.next() {
        match kind {
            "Stepper" => {
                let stepper = StepperConfig {
                    name: unescape_name(tokens.next("stepper name")?)?,
                    offset: tokens.number("stepper offset")?,
                    steps_per_unit: tokens.number("steps per unit")?,
                    unit: String::try_from(tokens.next("unit")?)
                        .map_err(|_| ConfigError::NameTooLong)?,
                };
                config
                    .steppers
                    .push(stepper)
                    .map_err(|_| ConfigError::TooManyDevices)?;
            }
            "Onoff" => {
                let onoff = OnoffConfig {
                    name: unescape_name(tokens.next("on/off name")?)?,
                    offset: tokens.number("on/off offset")?,
                };
                config
                    .onoffs
                    .push(onoff)
                    .map_err(|_| ConfigError::TooManyDevices)?;
            }
            other => {
                return Err(Error::Config(ConfigError::UnknownDeviceKind(truncated(other))));
            }
        }
    }

    Ok(config)
}

/// Decode a device name: `_` becomes a space, `__` a literal underscore.
///
/// # Errors
///
/// Returns `NameTooLong` if the decoded name exceeds 32 bytes.
pub fn unescape_name(raw: &str) -> core::result::Result<String<MAX_NAME>, ConfigError> {
    let mut name = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        let decoded = match c {
            '_' if chars.peek() == Some(&'_') => {
                chars.next();
                '_'
            }
            '_' => ' ',
            c => c,
        };
        name.push(decoded).map_err(|_| ConfigError::NameTooLong)?;
    }
    Ok(name)
}

struct Tokens<'a>(SplitWhitespace<'a>);

impl<'a> Tokens<'a> {
    fn next(&mut self, field: &'static str) -> core::result::Result<&'a str, ConfigError> {
        self.0.next().ok_or(ConfigError::MissingField(field))
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> core::result::Result<T, ConfigError> {
        let token = self.next(field)?;
        token
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(truncated(token)))
    }
}

/// Copy as much of `s` as fits, cutting on a character boundary.
fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
