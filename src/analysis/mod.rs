// Analysis module - distance stream to lift events
//
// Pipeline: DistanceSmoother → LiftTracker (debounce, threshold, try
// segmentation) → PowerModel. Each accepted sample yields one `Emission`
// that the engine hands to the display panel.

pub mod power;
pub mod smoother;
pub mod tracker;

pub use power::{PowerModel, PowerSample, STANDARD_GRAVITY, WATTS_PER_HP};
pub use smoother::DistanceSmoother;
pub use tracker::{
    Emission, LiftTracker, PowerReading, Sample, TrackerParams, TrackerState, TryPhase,
    TrySummary,
};
