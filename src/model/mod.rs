//! Hardware model data structures.
//!
//! The model is a set of keyed tables describing a telescope array from the
//! top down: telescopes hold optics tubes, tubes feed wafer slots, wafers
//! carry optical pixels, and each pixel hosts detectors for two bands and
//! two polarizations. Readout crates and cards mirror the wiring side.

pub mod band;
pub mod detector;
pub mod readout;
pub mod telescope;
pub mod tube;
pub mod wafer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use band::BandProps;
pub use detector::{DetectorProps, Handedness, Polarization};
pub use readout::{CardProps, CrateProps};
pub use telescope::TelescopeProps;
pub use tube::TubeProps;
pub use wafer::{WaferProps, WaferType};

/// Errors raised by model validation.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("wafer slot {0} references unknown tube {1}")]
    WaferTube(String, String),
    #[error("wafer slot {0} references unknown card {1}")]
    WaferCard(String, String),
    #[error("wafer slot {0} references unknown band {1}")]
    WaferBand(String, String),
    #[error("tube {0} references unknown telescope {1}")]
    TubeTelescope(String, String),
    #[error("tube {0} references unknown wafer slot {1}")]
    TubeWafer(String, String),
    #[error("card {0} references unknown crate slot {1}")]
    CardCrate(String, String),
    #[error("detector {0} references unknown wafer slot {1}")]
    DetectorWafer(String, String),
    #[error("detector {0} references unknown band {1}")]
    DetectorBand(String, String),
    #[error("detector {0} quaternion is not unit-norm (|q| = {1})")]
    DetectorQuat(String, f64),
}

/// The full hardware model: a container of keyed component tables.
///
/// All tables are sorted maps, so serialized files and summaries are
/// deterministic. Component names are chosen so that sorted order matches
/// construction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hardware {
    /// Observing bands, keyed by band name
    pub bands: BTreeMap<String, BandProps>,
    /// Wafers, keyed by wafer slot name
    pub wafers: BTreeMap<String, WaferProps>,
    /// Optics tubes, keyed by tube name
    pub tubes: BTreeMap<String, TubeProps>,
    /// Telescopes, keyed by telescope name
    pub telescopes: BTreeMap<String, TelescopeProps>,
    /// Readout cards, keyed by card slot name
    pub cards: BTreeMap<String, CardProps>,
    /// Readout crates, keyed by crate slot name
    pub crates: BTreeMap<String, CrateProps>,
    /// Detectors, keyed by detector name
    pub detectors: BTreeMap<String, DetectorProps>,
}

impl Hardware {
    /// Create an empty hardware model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of detectors in the model.
    pub fn ndet(&self) -> usize {
        self.detectors.len()
    }

    /// Check referential integrity of every table.
    ///
    /// Detector quaternions must be unit-norm; every cross-table reference
    /// must resolve. The first violation found is returned.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, wafer) in &self.wafers {
            if !self.tubes.contains_key(&wafer.tube) {
                return Err(ModelError::WaferTube(name.clone(), wafer.tube.clone()));
            }
            if !self.cards.contains_key(&wafer.card) {
                return Err(ModelError::WaferCard(name.clone(), wafer.card.clone()));
            }
            for band in &wafer.bands {
                if !self.bands.contains_key(band) {
                    return Err(ModelError::WaferBand(name.clone(), band.clone()));
                }
            }
        }
        for (name, tube) in &self.tubes {
            if !self.telescopes.contains_key(&tube.telescope) {
                return Err(ModelError::TubeTelescope(
                    name.clone(),
                    tube.telescope.clone(),
                ));
            }
            for slot in &tube.wafer_slots {
                if !self.wafers.contains_key(slot) {
                    return Err(ModelError::TubeWafer(name.clone(), slot.clone()));
                }
            }
        }
        for (name, card) in &self.cards {
            if !self.crates.contains_key(&card.crate_slot) {
                return Err(ModelError::CardCrate(name.clone(), card.crate_slot.clone()));
            }
        }
        for (name, det) in &self.detectors {
            if !self.wafers.contains_key(&det.wafer_slot) {
                return Err(ModelError::DetectorWafer(
                    name.clone(),
                    det.wafer_slot.clone(),
                ));
            }
            if !self.bands.contains_key(&det.band) {
                return Err(ModelError::DetectorBand(name.clone(), det.band.clone()));
            }
            let norm = det.quat.iter().map(|c| c * c).sum::<f64>().sqrt();
            if (norm - 1.0).abs() > 1e-6 {
                return Err(ModelError::DetectorQuat(name.clone(), norm));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model_validates() {
        assert!(Hardware::new().validate().is_ok());
    }

    #[test]
    fn test_dangling_wafer_tube() {
        let mut hw = Hardware::new();
        hw.crates.insert(
            "crate0".into(),
            CrateProps {
                card_slots: vec!["c00".into()],
            },
        );
        hw.cards.insert(
            "c00".into(),
            CardProps {
                nbias: 12,
                ncoax: 2,
                nchannel: 74,
                crate_slot: "crate0".into(),
            },
        );
        hw.wafers.insert(
            "w00".into(),
            WaferProps {
                wafer_type: WaferType::LF,
                npixel: 37,
                pixel_pitch_mm: 10.4,
                bands: vec![],
                tube: "LT9".into(),
                card: "c00".into(),
            },
        );
        assert!(matches!(
            hw.validate(),
            Err(ModelError::WaferTube(w, t)) if w == "w00" && t == "LT9"
        ));
    }

    #[test]
    fn test_bad_quat_norm() {
        let mut hw = Hardware::new();
        hw.bands.insert(
            "LAT_f090".into(),
            BandProps {
                center: 93.0,
                low: 79.0,
                high: 107.0,
                bandpass: "flat".into(),
                net: 268.0,
                fknee: 25.0,
                fmin: 1.0,
                alpha: 3.5,
            },
        );
        // a wafer table entry is required for the detector reference
        hw.crates.insert("crate0".into(), CrateProps { card_slots: vec![] });
        hw.cards.insert(
            "c00".into(),
            CardProps {
                nbias: 12,
                ncoax: 2,
                nchannel: 864,
                crate_slot: "crate0".into(),
            },
        );
        hw.telescopes.insert(
            "LAT".into(),
            TelescopeProps {
                tubes: vec!["LT1".into()],
                platescale: 0.005,
                tube_spacing: 1.0,
                fwhm: BTreeMap::new(),
            },
        );
        hw.tubes.insert(
            "LT1".into(),
            TubeProps {
                tube_type: WaferType::MF,
                telescope: "LAT".into(),
                wafer_slots: vec!["w00".into()],
                platescale: 0.005,
                location: 0,
            },
        );
        hw.wafers.insert(
            "w00".into(),
            WaferProps {
                wafer_type: WaferType::MF,
                npixel: 432,
                pixel_pitch_mm: 5.3,
                bands: vec!["LAT_f090".into()],
                tube: "LT1".into(),
                card: "c00".into(),
            },
        );
        let det = DetectorProps {
            wafer_slot: "w00".into(),
            uid: 0,
            pixel: 0,
            band: "LAT_f090".into(),
            pol: Polarization::A,
            pol_ang: 0.0,
            handed: Handedness::L,
            fwhm: 2.2,
            quat: [0.0, 0.0, 0.0, 2.0],
        };
        hw.detectors.insert(det.name(), det);
        assert!(matches!(
            hw.validate(),
            Err(ModelError::DetectorQuat(_, _))
        ));
    }
}
