//! Configuration management for the exhibit
//!
//! This module provides runtime configuration loading from JSON files so the
//! same build can be installed on different exhibit computers: the sensor
//! port, the bar's mass, and the detection thresholds all differ between
//! installations and are adjusted via the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Default config file looked up by the `run` command
pub const DEFAULT_CONFIG_PATH: &str = "horsepower.json";

/// Complete exhibit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExhibitConfig {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Serial sensor parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Serial port path (e.g. /dev/ttyACM0 or COM5)
    pub port: String,
    /// Baud rate of the sensor firmware (115200 or 9600)
    pub baud_rate: u32,
    /// Interval between display ticks that poll the serial buffer
    pub poll_interval_ms: u64,
    /// Read timeout on the serial handle; reads never wait for new data
    pub read_timeout_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            poll_interval_ms: 200,
            read_timeout_ms: 10,
        }
    }
}

/// Physical model and try detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Mass of the lifted bar in kilograms
    pub mass_kg: f64,
    /// Gravitational acceleration used to turn mass into force
    pub gravity: f64,
    /// Smoothed distance change (mm) that counts as movement; comparison is exclusive
    pub distance_threshold_mm: f64,
    /// Moving-average window over raw distance readings
    pub smoothing_window: usize,
    /// Samples closer together than this (seconds) are discarded
    pub debounce_s: f64,
    /// Floor applied to the time difference between accepted samples
    pub min_time_diff_s: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            mass_kg: 7.5,
            gravity: 9.81,
            distance_threshold_mm: 10.0,
            smoothing_window: 5,
            debounce_s: 0.05,
            min_time_diff_s: 0.001,
        }
    }
}

/// Display gauge and reset parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Horsepower shown as an empty gauge
    pub min_hp: f64,
    /// Horsepower shown as a full gauge
    pub max_hp: f64,
    /// Seconds after a try ends before the panel is cleared
    pub reset_after_s: f64,
    /// Fraction of the remaining distance covered per tick while rising
    pub rise_smoothing: f64,
    /// Fraction of the current level lost per tick while falling
    pub fall_smoothing: f64,
    /// Seconds the gauge holds at its peak before falling
    pub hold_s: f64,
    /// Also reset the tracker when the panel's idle reset fires
    pub reset_tracker: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_hp: 0.0,
            max_hp: 1.0,
            reset_after_s: 15.0,
            rise_smoothing: 0.5,
            fall_smoothing: 0.5,
            hold_s: 0.1,
            reset_tracker: false,
        }
    }
}

impl ExhibitConfig {
    /// Load configuration from JSON file
    ///
    /// A missing, unparseable, or invalid file falls back to defaults with a
    /// warning; the exhibit should always come up.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<ExhibitConfig>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                        config
                    }
                    Err(err) => {
                        log::warn!(
                            "[Config] Rejected configuration from {:?}: {}. Using defaults.",
                            path.as_ref(),
                            err
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|err| ConfigError::Io {
            reason: err.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check values the tracker and gauge cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(physics.mass_kg > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "physics.mass_kg",
                reason: format!("must be positive (got {})", physics.mass_kg),
            });
        }
        if !(physics.distance_threshold_mm >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "physics.distance_threshold_mm",
                reason: format!("must not be negative (got {})", physics.distance_threshold_mm),
            });
        }
        if !(physics.debounce_s > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "physics.debounce_s",
                reason: format!("must be positive (got {})", physics.debounce_s),
            });
        }
        if !(physics.min_time_diff_s > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "physics.min_time_diff_s",
                reason: format!("must be positive (got {})", physics.min_time_diff_s),
            });
        }
        if self.display.max_hp <= self.display.min_hp {
            return Err(ConfigError::InvalidValue {
                field: "display.max_hp",
                reason: format!(
                    "must exceed display.min_hp ({} <= {})",
                    self.display.max_hp, self.display.min_hp
                ),
            });
        }
        if self.sensor.baud_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sensor.baud_rate",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
