//! Error types for parport-actuators.
//!
//! Port failures are surfaced per operation as [`PortError`]; configuration
//! problems as [`ConfigError`]. [`ConfigWarning`] is not an error: it records a
//! value that was corrected to a safe default during construction.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Result of a single port or actuator operation.
pub type PortResult<T> = core::result::Result<T, PortError>;

/// Unified error type for all parport-actuators operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Parallel port access error
    Port(PortError),
    /// Configuration parsing or validation error
    Config(ConfigError),
}

/// Parallel port access errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// Port is already open
    AlreadyOpen,
    /// Port is not open
    NotOpen,
    /// Device could not be opened
    OpenFailed,
    /// Device could not be closed
    CloseFailed,
    /// Exclusive claim, release or direction change was refused
    PermissionDenied,
    /// Register read failed
    ReadFailed,
    /// Register write failed
    WriteFailed,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse configuration text
    ParseError(heapless::String<128>),
    /// Device list names an actuator kind other than `Stepper` or `Onoff`
    UnknownDeviceKind(heapless::String<32>),
    /// Device list ended in the middle of an entry
    MissingField(&'static str),
    /// A numeric field could not be parsed
    InvalidNumber(heapless::String<32>),
    /// Device or machine name does not fit
    NameTooLong,
    /// Group already holds the maximum number of actuators of this kind
    TooManyDevices,
    /// Two devices share the same name
    DuplicateDeviceName(heapless::String<32>),
    /// Two devices drive the same data register bit
    PinConflict {
        /// Device declared first
        first: heapless::String<32>,
        /// Device declared later
        second: heapless::String<32>,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Configuration values corrected to a safe default at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigWarning {
    /// Bit offset leaves no room in the data register
    InvalidOffset(u8),
    /// Steps per unit is below 4 or not a multiple of 4
    InvalidStepCount(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Port(e) => write!(f, "Port error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::AlreadyOpen => write!(f, "port already opened"),
            PortError::NotOpen => write!(f, "port not opened"),
            PortError::OpenFailed => write!(f, "cannot open port"),
            PortError::CloseFailed => write!(f, "cannot close port"),
            PortError::PermissionDenied => write!(f, "cannot claim control over port"),
            PortError::ReadFailed => write!(f, "error reading port"),
            PortError::WriteFailed => write!(f, "error writing port"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::UnknownDeviceKind(kind) => {
                write!(f, "Unknown device kind '{}'. Expected Stepper or Onoff", kind)
            }
            ConfigError::MissingField(field) => write!(f, "Missing field: {}", field),
            ConfigError::InvalidNumber(token) => write!(f, "Invalid number: '{}'", token),
            ConfigError::NameTooLong => write!(f, "Name too long (max 32 chars)"),
            ConfigError::TooManyDevices => write!(f, "Too many devices (max 8 per kind)"),
            ConfigError::DuplicateDeviceName(name) => {
                write!(f, "Duplicate device name: '{}'", name)
            }
            ConfigError::PinConflict { first, second } => {
                write!(f, "Devices '{}' and '{}' share a data pin", first, second)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::InvalidOffset(offset) => write!(f, "Bad offset: {}", offset),
            ConfigWarning::InvalidStepCount(steps) => {
                write!(f, "Bad stepper amount: {}", steps)
            }
        }
    }
}

// Conversion impls
impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Error::Port(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for PortError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
