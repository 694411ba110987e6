//! Detector synthesis for the nominal model.
//!
//! Turns the wafer geometry tables into individual detectors: pixel centers
//! from the packing layouts, scaled to focal-plane angles through the tube
//! platescale, offset by the wafer and tube positions, with one detector
//! per band and polarization at every pixel.

use log::debug;
use thiserror::Error;

use super::layout::{hex_layout, quat_to_array, rhombus_hex_layout, xieta_to_quat};
use crate::model::{
    detector::detector_name, DetectorProps, Handedness, Hardware, Polarization, TubeProps,
    WaferProps, WaferType,
};

/// Errors raised during detector synthesis.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("unknown telescope {0}")]
    UnknownTelescope(String),
    #[error("telescope references unknown tube {0}")]
    UnknownTube(String),
    #[error("tube references unknown wafer slot {0}")]
    UnknownWafer(String),
    #[error("telescope {0} has no beam FWHM entry for band {1}")]
    MissingFwhm(String, String),
}

/// Margin factor applied when spacing wafers within a tube.
const WAFER_GAP: f64 = 1.05;

/// Angular centers of the wafer slots within a tube, in degrees.
///
/// Three-wafer tubes place the wafers at 120 degree intervals around the
/// tube center; larger tubes use a centered hex packing. Spacings derive
/// from the wafer circumradius so neighboring wafers clear each other.
fn wafer_centers(tube: &TubeProps, wafer: &WaferProps) -> Vec<(f64, f64)> {
    let n = tube.wafer_slots.len();
    let circ_deg = wafer.circumradius_mm() * tube.platescale;
    match n {
        0 => Vec::new(),
        1 => vec![(0.0, 0.0)],
        3 => {
            let radius = circ_deg * WAFER_GAP;
            [90.0_f64, 210.0, 330.0]
                .iter()
                .map(|ang| {
                    let a = ang.to_radians();
                    (radius * a.cos(), radius * a.sin())
                })
                .collect()
        }
        // hexagon tiling: adjacent centers sit two inradii apart
        _ => hex_layout(n, 2.0 * circ_deg * (30.0_f64.to_radians()).cos() * WAFER_GAP),
    }
}

/// Pixel centers on a wafer in millimeters, with the rhombus index of each
/// pixel (0 for hex-packed LF wafers).
fn pixel_positions(wafer: &WaferProps) -> (Vec<(f64, f64)>, Vec<u32>) {
    match wafer.wafer_type {
        WaferType::LF => {
            let pos = hex_layout(wafer.npixel as usize, wafer.pixel_pitch_mm);
            let rhombus = vec![0u32; pos.len()];
            (pos, rhombus)
        }
        WaferType::MF | WaferType::UHF => {
            let side = ((wafer.npixel as f64) / 3.0).sqrt().round() as usize;
            let pos = rhombus_hex_layout(side, wafer.pixel_pitch_mm);
            let rhombus = (0..pos.len()).map(|i| (i / (side * side)) as u32).collect();
            (pos, rhombus)
        }
    }
}

/// Synthesize the detectors of one telescope and insert them into the
/// model. Returns the number of detectors generated.
///
/// Detector names encode wafer slot, pixel, band and polarization, so
/// regenerating a telescope replaces its detectors instead of duplicating
/// them. UIDs continue from the current maximum in the model.
pub fn sim_telescope_detectors(hw: &mut Hardware, telescope: &str) -> Result<usize, SimError> {
    let tele = hw
        .telescopes
        .get(telescope)
        .cloned()
        .ok_or_else(|| SimError::UnknownTelescope(telescope.to_string()))?;

    let tubes: Vec<(String, TubeProps)> = tele
        .tubes
        .iter()
        .map(|name| {
            hw.tubes
                .get(name)
                .cloned()
                .map(|t| (name.clone(), t))
                .ok_or_else(|| SimError::UnknownTube(name.clone()))
        })
        .collect::<Result<_, _>>()?;

    let max_location = tubes.iter().map(|(_, t)| t.location).max().unwrap_or(0);
    let tube_positions = hex_layout(max_location as usize + 1, tele.tube_spacing);

    let mut uid = hw.detectors.values().map(|d| d.uid).max().map_or(0, |m| m + 1);
    let mut generated = 0usize;

    for (tube_name, tube) in &tubes {
        let tube_center = tube_positions[tube.location as usize];

        for (islot, slot) in tube.wafer_slots.iter().enumerate() {
            let wafer = hw
                .wafers
                .get(slot)
                .cloned()
                .ok_or_else(|| SimError::UnknownWafer(slot.clone()))?;
            let centers = wafer_centers(tube, &wafer);
            let wafer_center = centers[islot];
            let (positions, rhombus) = pixel_positions(&wafer);

            for (pixel, (x_mm, y_mm)) in positions.iter().enumerate() {
                let xi = tube_center.0 + wafer_center.0 + x_mm * tube.platescale;
                let eta = tube_center.1 + wafer_center.1 + y_mm * tube.platescale;
                let handed = if pixel % 2 == 0 {
                    Handedness::L
                } else {
                    Handedness::R
                };
                let base_ang = f64::from(rhombus[pixel]) * 60.0
                    + match handed {
                        Handedness::L => 0.0,
                        Handedness::R => 45.0,
                    };

                for band in &wafer.bands {
                    let fwhm = *tele.fwhm.get(band).ok_or_else(|| {
                        SimError::MissingFwhm(telescope.to_string(), band.clone())
                    })?;
                    for pol in [Polarization::A, Polarization::B] {
                        let pol_ang = match pol {
                            Polarization::A => base_ang,
                            Polarization::B => base_ang + 90.0,
                        };
                        let quat = xieta_to_quat(
                            xi.to_radians(),
                            eta.to_radians(),
                            pol_ang.to_radians(),
                        );
                        let name = detector_name(slot, pixel as u32, band, pol);
                        hw.detectors.insert(
                            name,
                            DetectorProps {
                                wafer_slot: slot.clone(),
                                uid,
                                pixel: pixel as u32,
                                band: band.clone(),
                                pol,
                                pol_ang,
                                handed,
                                fwhm,
                                quat: quat_to_array(&quat),
                            },
                        );
                        uid += 1;
                        generated += 1;
                    }
                }
            }
            debug!(
                "{}: wafer {} ({}) -> {} pixels",
                tube_name,
                slot,
                wafer.wafer_type,
                positions.len()
            );
        }
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::nominal::nominal;
    use std::collections::BTreeMap;

    #[test]
    fn test_sim_lf_telescope_counts() {
        let mut hw = nominal();
        let n = sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        // 7 LF wafers of 37 pixels, 2 bands x 2 pols per pixel
        assert_eq!(n, 7 * 37 * 4);
        assert_eq!(hw.ndet(), n);
        hw.validate().unwrap();
    }

    #[test]
    fn test_resim_is_idempotent_in_count() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let first = hw.ndet();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        assert_eq!(hw.ndet(), first);
    }

    #[test]
    fn test_unknown_telescope() {
        let mut hw = nominal();
        assert!(matches!(
            sim_telescope_detectors(&mut hw, "XAT"),
            Err(SimError::UnknownTelescope(_))
        ));
    }

    #[test]
    fn test_detector_pairing() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT1").unwrap();

        // group detectors by (wafer, pixel, band): each group is one A/B pair
        let mut groups: BTreeMap<(String, u32, String), Vec<&DetectorProps>> = BTreeMap::new();
        for det in hw.detectors.values() {
            groups
                .entry((det.wafer_slot.clone(), det.pixel, det.band.clone()))
                .or_default()
                .push(det);
        }
        for ((wafer, pixel, band), pair) in groups {
            assert_eq!(pair.len(), 2, "{} p{} {}", wafer, pixel, band);
            let a = pair.iter().find(|d| d.pol == Polarization::A).unwrap();
            let b = pair.iter().find(|d| d.pol == Polarization::B).unwrap();
            assert!((b.pol_ang - a.pol_ang - 90.0).abs() < 1e-12);
            assert_eq!(a.handed, b.handed);
        }
    }

    #[test]
    fn test_uids_unique_and_contiguous() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let mut uids: Vec<u32> = hw.detectors.values().map(|d| d.uid).collect();
        uids.sort_unstable();
        for (i, uid) in uids.iter().enumerate() {
            assert_eq!(*uid, i as u32);
        }
    }

    #[test]
    fn test_detector_names_match_key() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        for (name, det) in &hw.detectors {
            assert_eq!(*name, det.name());
        }
    }
}
