//! Telescope properties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Properties of one telescope in the array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeProps {
    /// Names of the optics tubes mounted in this telescope, in tube order
    pub tubes: Vec<String>,
    /// Focal plane platescale in degrees per millimeter
    pub platescale: f64,
    /// Center-to-center angular spacing of tube positions in degrees
    pub tube_spacing: f64,
    /// Beam FWHM in arcminutes, keyed by band name
    pub fwhm: BTreeMap<String, f64>,
}
