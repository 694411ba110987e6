//! Nominal hardware simulation: model tables, packing geometry, and
//! detector synthesis.

pub mod detectors;
pub mod layout;
pub mod nominal;

pub use detectors::{sim_telescope_detectors, SimError};
pub use nominal::nominal;
