//! Time sources driving the engine clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Trait representing a monotonic clock in seconds.
///
/// Live runs use wall time; replay and tests advance a manual clock so the
/// same session always produces the same output.
pub trait TimeSource: Send + Sync {
    fn now_s(&self) -> f64;
}

/// Seconds elapsed since the source was created.
pub struct SystemTimeSource {
    start: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Explicitly advanced clock.
///
/// Clones share the same underlying time, so a caller can keep a handle
/// while the engine owns the boxed source.
#[derive(Clone, Default)]
pub struct ManualTimeSource {
    bits: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new(start_s: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_s.to_bits())),
        }
    }

    pub fn set(&self, now_s: f64) {
        self.bits.store(now_s.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, delta_s: f64) -> f64 {
        let next = self.now_s() + delta_s;
        self.set(next);
        next
    }
}

impl TimeSource for ManualTimeSource {
    fn now_s(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
