// Configuration error types and constants

use crate::error::ErrorCode;
use std::fmt;

/// Configuration error code constants
///
/// Error code range: 4001-4002
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// A configuration field holds a value the exhibit cannot run with
    pub const INVALID_VALUE: i32 = 4001;

    /// Configuration file could not be read or written
    pub const IO: i32 = 4002;
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configuration field holds a value the exhibit cannot run with
    InvalidValue { field: &'static str, reason: String },

    /// Configuration file could not be read or written
    Io { reason: String },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::InvalidValue { .. } => ConfigErrorCodes::INVALID_VALUE,
            ConfigError::Io { .. } => ConfigErrorCodes::IO,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            ConfigError::Io { reason } => format!("Config I/O failed: {}", reason),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io {
            reason: err.to_string(),
        }
    }
}
