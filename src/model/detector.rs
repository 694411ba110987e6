//! Individual detector properties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Polarization channel of a detector pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarization {
    A,
    B,
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarization::A => write!(f, "A"),
            Polarization::B => write!(f, "B"),
        }
    }
}

/// Handedness of a detector's feedhorn coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    L,
    R,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::L => write!(f, "L"),
            Handedness::R => write!(f, "R"),
        }
    }
}

/// Properties of a single detector.
///
/// The pointing quaternion encodes the detector's boresight-relative
/// direction and polarization orientation; see [`crate::sim::layout`] for
/// the tangent-plane conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorProps {
    /// Name of the wafer slot this detector lives on
    pub wafer_slot: String,
    /// Unique detector index within the model
    pub uid: u32,
    /// Optical pixel index within the wafer
    pub pixel: u32,
    /// Name of the observing band
    pub band: String,
    /// Polarization channel
    pub pol: Polarization,
    /// Polarization angle in degrees, measured from the xi axis
    pub pol_ang: f64,
    /// Feedhorn handedness
    pub handed: Handedness,
    /// Beam FWHM in arcminutes
    pub fwhm: f64,
    /// Pointing quaternion as [x, y, z, w]
    pub quat: [f64; 4],
}

impl DetectorProps {
    /// Canonical detector name: `{wafer_slot}_p{pixel:03}_{band}_{pol}`.
    pub fn name(&self) -> String {
        detector_name(&self.wafer_slot, self.pixel, &self.band, self.pol)
    }

    /// Look up a named property as a string, for pattern matching.
    ///
    /// Numeric fields are rendered in decimal. Returns None for unknown
    /// property names.
    pub fn prop(&self, key: &str) -> Option<String> {
        match key {
            "wafer_slot" => Some(self.wafer_slot.clone()),
            "uid" => Some(self.uid.to_string()),
            "pixel" => Some(self.pixel.to_string()),
            "band" => Some(self.band.clone()),
            "pol" => Some(self.pol.to_string()),
            "handed" => Some(self.handed.to_string()),
            "name" => Some(self.name()),
            _ => None,
        }
    }
}

/// Build the canonical detector name from its components.
pub fn detector_name(wafer_slot: &str, pixel: u32, band: &str, pol: Polarization) -> String {
    format!("{}_p{:03}_{}_{}", wafer_slot, pixel, band, pol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det() -> DetectorProps {
        DetectorProps {
            wafer_slot: "w03".into(),
            uid: 17,
            pixel: 5,
            band: "LAT_f090".into(),
            pol: Polarization::B,
            pol_ang: 135.0,
            handed: Handedness::R,
            fwhm: 2.2,
            quat: [0.0, 0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn test_detector_name() {
        assert_eq!(det().name(), "w03_p005_LAT_f090_B");
    }

    #[test]
    fn test_prop_lookup() {
        let d = det();
        assert_eq!(d.prop("band").unwrap(), "LAT_f090");
        assert_eq!(d.prop("pixel").unwrap(), "5");
        assert_eq!(d.prop("pol").unwrap(), "B");
        assert_eq!(d.prop("handed").unwrap(), "R");
        assert_eq!(d.prop("name").unwrap(), "w03_p005_LAT_f090_B");
        assert!(d.prop("nonsense").is_none());
    }
}
