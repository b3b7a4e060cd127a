//! Engine module housing the exhibit controller.
//!
//! `clock` provides the time sources and `core` the `ExhibitEngine` that
//! ties sensor input, tracking, display and telemetry together.

pub mod clock;
pub mod core;

pub use self::clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use self::core::{ExhibitEngine, TickReport};
