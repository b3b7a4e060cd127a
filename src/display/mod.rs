//! Exhibit display: language cycle, fill gauge and the summary panel.
//!
//! This layer is renderer-agnostic. It produces a `DisplayFrame` per tick;
//! the CLI draws it as text.

pub mod gauge;
pub mod language;
pub mod panel;

pub use gauge::{FillGauge, GaugePhase};
pub use language::{summary_text, Language};
pub use panel::{DisplayFrame, DisplayPanel};
