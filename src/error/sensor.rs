// Sensor error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Sensor error code constants
///
/// Error code range: 3001-3005
pub struct SensorErrorCodes {}

impl SensorErrorCodes {
    /// Serial port could not be opened
    pub const PORT_OPEN_FAILED: i32 = 3001;

    /// Reading from an open serial port failed
    pub const READ_FAILED: i32 = 3002;

    /// Configured serial port does not exist
    pub const PORT_NOT_FOUND: i32 = 3003;

    /// Recorded session file could not be read
    pub const REPLAY_LOAD_FAILED: i32 = 3004;

    /// Recorded session file contains no usable records
    pub const REPLAY_PARSE: i32 = 3005;
}

/// Log a sensor error with structured context
///
/// Fields logged:
/// - error_code: Numeric error code for programmatic handling
/// - component: Always SensorSource
/// - message: Human-readable error message
/// - context: Where the error surfaced
pub fn log_sensor_error(err: &SensorError, context: &str) {
    error!(
        "Sensor error in {}: code={}, component=SensorSource, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Sensor acquisition errors
///
/// None of these are fatal to the exhibit loop: the engine drops to a
/// degraded source that never yields samples.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Serial port could not be opened
    PortOpenFailed { port: String, reason: String },

    /// Reading from an open serial port failed
    ReadFailed { reason: String },

    /// Configured serial port does not exist
    PortNotFound { port: String },

    /// Recorded session file could not be read
    ReplayLoadFailed { path: String, reason: String },

    /// Recorded session file contains no usable records
    ReplayParse { path: String },
}

impl ErrorCode for SensorError {
    fn code(&self) -> i32 {
        match self {
            SensorError::PortOpenFailed { .. } => SensorErrorCodes::PORT_OPEN_FAILED,
            SensorError::ReadFailed { .. } => SensorErrorCodes::READ_FAILED,
            SensorError::PortNotFound { .. } => SensorErrorCodes::PORT_NOT_FOUND,
            SensorError::ReplayLoadFailed { .. } => SensorErrorCodes::REPLAY_LOAD_FAILED,
            SensorError::ReplayParse { .. } => SensorErrorCodes::REPLAY_PARSE,
        }
    }

    fn message(&self) -> String {
        match self {
            SensorError::PortOpenFailed { port, reason } => {
                format!("Failed to open serial port {}: {}", port, reason)
            }
            SensorError::ReadFailed { reason } => {
                format!("Serial read failed: {}", reason)
            }
            SensorError::PortNotFound { port } => {
                format!("Serial port {} not found", port)
            }
            SensorError::ReplayLoadFailed { path, reason } => {
                format!("Failed to load recorded session {}: {}", path, reason)
            }
            SensorError::ReplayParse { path } => {
                format!("Recorded session {} contains no usable records", path)
            }
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SensorError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SensorError {}

impl From<std::io::Error> for SensorError {
    fn from(err: std::io::Error) -> Self {
        SensorError::ReadFailed {
            reason: err.to_string(),
        }
    }
}

impl From<serialport::Error> for SensorError {
    fn from(err: serialport::Error) -> Self {
        SensorError::ReadFailed {
            reason: err.to_string(),
        }
    }
}
