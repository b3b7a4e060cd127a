// Horsepower Exhibit Core - lift tracking and power display
// Serial distance sensor in, per-try power summary out

// Module declarations
pub mod analysis;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod sensor;
pub mod telemetry;

// Re-exports for convenience
pub use analysis::{Emission, LiftTracker, PowerReading, Sample, TrySummary};
pub use config::ExhibitConfig;
pub use display::{DisplayFrame, Language};
pub use engine::{ExhibitEngine, ManualTimeSource, SystemTimeSource, TickReport, TimeSource};
pub use error::{ConfigError, ErrorCode, SensorError};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` and defaults to `info`. The subscriber also installs the
/// `log` bridge, so `log` macros in config and error helpers end up in the
/// same output. Calling this twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
