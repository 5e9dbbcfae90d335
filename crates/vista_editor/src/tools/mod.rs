//! Interactive selection tools.

pub mod rubber_band;

pub use rubber_band::{RubberBandPhase, RubberBandSelector};
