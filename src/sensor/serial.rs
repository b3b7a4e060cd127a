use std::io::{self, Read};
use std::time::Duration;

use serialport::SerialPort;

use super::{LineAssembler, SampleSource, TimedLine};
use crate::config::SensorConfig;
use crate::error::SensorError;

/// Serial-port sample source.
///
/// Each poll reads only the bytes already buffered by the driver, so the
/// display tick never waits on the sensor. Every line completed during one
/// poll carries that poll's timestamp.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
    port_name: String,
    assembler: LineAssembler,
    scratch: Vec<u8>,
}

impl SerialSource {
    /// Open the configured port
    pub fn open(config: &SensorConfig) -> Result<Self, SensorError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()
            .map_err(|err| match err.kind() {
                serialport::ErrorKind::NoDevice => SensorError::PortNotFound {
                    port: config.port.clone(),
                },
                serialport::ErrorKind::Io(io::ErrorKind::NotFound) => SensorError::PortNotFound {
                    port: config.port.clone(),
                },
                _ => SensorError::PortOpenFailed {
                    port: config.port.clone(),
                    reason: err.to_string(),
                },
            })?;

        tracing::info!(
            "[Serial] Opened {} at {} baud",
            config.port,
            config.baud_rate
        );

        Ok(Self {
            port,
            port_name: config.port.clone(),
            assembler: LineAssembler::new(),
            scratch: Vec::with_capacity(256),
        })
    }
}

impl SampleSource for SerialSource {
    fn poll(&mut self, now_s: f64) -> Result<Vec<TimedLine>, SensorError> {
        let available = self.port.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(Vec::new());
        }

        self.scratch.resize(available, 0);
        let read = match self.port.read(&mut self.scratch) {
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::TimedOut => 0,
            Err(err) => return Err(err.into()),
        };

        Ok(self
            .assembler
            .push(&self.scratch[..read])
            .into_iter()
            .map(|line| TimedLine::new(line, now_s))
            .collect())
    }

    fn describe(&self) -> String {
        format!("serial port {}", self.port_name)
    }
}

impl Drop for SerialSource {
    fn drop(&mut self) {
        tracing::info!("[Serial] Closing {}", self.port_name);
    }
}

/// Names of serial ports currently present on the system
pub fn available_ports() -> Result<Vec<String>, SensorError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|info| info.port_name)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_port_fails() {
        let config = SensorConfig {
            port: "/dev/horsepower-missing-port".to_string(),
            ..SensorConfig::default()
        };
        match SerialSource::open(&config) {
            Err(SensorError::PortNotFound { port }) | Err(SensorError::PortOpenFailed { port, .. }) => {
                assert_eq!(port, config.port);
            }
            Err(other) => panic!("Unexpected error {:?}", other),
            Ok(_) => panic!("Opening a missing port should fail"),
        }
    }
}
