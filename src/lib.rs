//! Instrument hardware model toolkit
//!
//! This crate provides functionality for building a nominal hardware model
//! of a telescope array (telescopes, optics tubes, detector wafers, readout
//! electronics, observing bands, and individual detectors), storing it on
//! disk, trimming it down to a detector subset, summarizing it, and plotting
//! detector focal-plane layouts.

pub mod info;
pub mod io;
pub mod model;
pub mod plot;
pub mod select;
pub mod shared_args;
pub mod sim;

// Re-exports for easier access
pub use model::band::BandProps;
pub use model::detector::{DetectorProps, Handedness, Polarization};
pub use model::telescope::TelescopeProps;
pub use model::tube::TubeProps;
pub use model::wafer::{WaferProps, WaferType};
pub use model::Hardware;
pub use sim::detectors::sim_telescope_detectors;
pub use sim::nominal::nominal;
