use std::collections::VecDeque;

/// Moving average over the most recent raw distance readings.
///
/// The ultrasonic/ToF sensors used on the exhibit jitter by a few
/// millimetres between readings; averaging the last few samples keeps that
/// jitter below the movement threshold.
#[derive(Debug, Clone)]
pub struct DistanceSmoother {
    window: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl DistanceSmoother {
    pub const DEFAULT_WINDOW: usize = 5;

    /// A capacity of zero is treated as one (no smoothing).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
        }
    }

    /// Push a raw reading and return the mean of the current window
    pub fn push(&mut self, distance_mm: f64) -> f64 {
        if self.window.len() == self.capacity {
            if let Some(evicted) = self.window.pop_front() {
                self.sum -= evicted;
            }
        }
        self.window.push_back(distance_mm);
        self.sum += distance_mm;
        self.sum / self.window.len() as f64
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}

impl Default for DistanceSmoother {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
