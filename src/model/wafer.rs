//! Detector wafer properties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Frequency class of a detector wafer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaferType {
    /// Low frequency (f030 / f040 bands), sparse hex-packed pixels
    LF,
    /// Mid frequency (f090 / f150 bands), dense rhombus-packed pixels
    MF,
    /// Ultra-high frequency (f230 / f290 bands), dense rhombus-packed pixels
    UHF,
}

impl fmt::Display for WaferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaferType::LF => write!(f, "LF"),
            WaferType::MF => write!(f, "MF"),
            WaferType::UHF => write!(f, "UHF"),
        }
    }
}

/// Properties of one detector wafer installed in a wafer slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferProps {
    /// Frequency class of the wafer
    pub wafer_type: WaferType,
    /// Number of optical pixels on the wafer
    pub npixel: u32,
    /// Center-to-center pixel spacing in millimeters
    pub pixel_pitch_mm: f64,
    /// Names of the two observing bands this wafer is sensitive to
    pub bands: Vec<String>,
    /// Name of the optics tube this wafer slot belongs to
    pub tube: String,
    /// Name of the readout card serving this wafer
    pub card: String,
}

impl WaferProps {
    /// Physical circumradius of the pixel layout in millimeters.
    ///
    /// For dense wafers this is the corner distance of the three-rhombus
    /// hexagon; for LF wafers it is the outermost hex-packing ring.
    pub fn circumradius_mm(&self) -> f64 {
        match self.wafer_type {
            WaferType::MF | WaferType::UHF => {
                // three rhombi of side n tile a hexagon of circumradius n * pitch
                let side = ((self.npixel as f64) / 3.0).sqrt();
                side * self.pixel_pitch_mm
            }
            WaferType::LF => {
                // centered hex packing: ring k holds 6k pixels
                let mut total = 1u32;
                let mut ring = 0u32;
                while total < self.npixel {
                    ring += 1;
                    total += 6 * ring;
                }
                (ring as f64) * self.pixel_pitch_mm
            }
        }
    }
}
