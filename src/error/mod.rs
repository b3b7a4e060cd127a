// Error types for the horsepower exhibit
//
// This module defines custom error types for sensor acquisition and
// configuration, with numeric codes so log lines and CLI reports can be
// grepped and matched programmatically.

mod config;
mod sensor;

pub use config::{ConfigError, ConfigErrorCodes};
pub use sensor::{log_sensor_error, SensorError, SensorErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
