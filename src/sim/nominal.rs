//! Nominal hardware model.
//!
//! Fixed tables describing the current as-designed instrument: one
//! large-aperture telescope with seven optics tubes of three wafers each,
//! and three small-aperture telescopes with a single seven-wafer tube.
//! Detector tables start empty; see [`crate::sim::detectors`].

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::model::{
    BandProps, CardProps, CrateProps, Hardware, TelescopeProps, TubeProps, WaferProps, WaferType,
};

/// Band table rows: (suffix, center, low, high, NET, fknee, fmin, alpha).
/// Frequencies in GHz, NET in uK*sqrt(s), 1/f parameters in mHz.
const BAND_TABLE: [(&str, f64, f64, f64, f64, f64, f64, f64); 6] = [
    ("f030", 27.0, 24.0, 30.0, 435.0, 15.0, 1.0, 3.5),
    ("f040", 39.0, 34.0, 44.0, 229.0, 15.0, 1.0, 3.5),
    ("f090", 93.0, 79.0, 107.0, 268.0, 25.0, 1.0, 3.5),
    ("f150", 145.0, 130.0, 160.0, 297.0, 25.0, 1.0, 3.5),
    ("f230", 225.0, 198.0, 252.0, 619.0, 35.0, 1.0, 3.5),
    ("f290", 278.0, 256.0, 300.0, 1527.0, 35.0, 1.0, 3.5),
];

/// Beam FWHM in arcminutes per band suffix for the large-aperture telescope.
static LAT_BEAM: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("f030", 7.4),
        ("f040", 5.1),
        ("f090", 2.2),
        ("f150", 1.4),
        ("f230", 1.0),
        ("f290", 0.9),
    ])
});

/// Beam FWHM in arcminutes per band suffix for the small-aperture telescopes.
static SAT_BEAM: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("f030", 91.0),
        ("f040", 63.0),
        ("f090", 30.0),
        ("f150", 17.0),
        ("f230", 11.0),
        ("f290", 9.0),
    ])
});

/// Pixel count and pitch (mm) for each wafer frequency class.
pub fn wafer_geometry(wafer_type: WaferType) -> (u32, f64) {
    match wafer_type {
        WaferType::LF => (37, 10.4),
        WaferType::MF => (432, 5.3),
        WaferType::UHF => (432, 5.3),
    }
}

/// Band suffixes a wafer frequency class is sensitive to.
pub fn wafer_band_suffixes(wafer_type: WaferType) -> [&'static str; 2] {
    match wafer_type {
        WaferType::LF => ["f030", "f040"],
        WaferType::MF => ["f090", "f150"],
        WaferType::UHF => ["f230", "f290"],
    }
}

/// Focal plane platescale in degrees per millimeter.
const LAT_PLATESCALE: f64 = 0.005;
const SAT_PLATESCALE: f64 = 0.075;

/// Center-to-center tube position spacing in degrees.
const LAT_TUBE_SPACING: f64 = 1.0;

struct Counters {
    wafer: u32,
    card: u32,
    crate_slot: u32,
}

/// Add one telescope with its tubes, wafers, cards and crates.
///
/// `tubes` lists (tube name, frequency class, location index);
/// `wafers_per_tube` is 3 for the large aperture and 7 for small apertures.
fn add_telescope(
    hw: &mut Hardware,
    name: &str,
    band_prefix: &str,
    platescale: f64,
    tube_spacing: f64,
    beams: &BTreeMap<&'static str, f64>,
    tubes: &[(&str, WaferType, u32)],
    wafers_per_tube: usize,
    counters: &mut Counters,
) {
    let fwhm: BTreeMap<String, f64> = beams
        .iter()
        .map(|(suffix, fwhm)| (format!("{}_{}", band_prefix, suffix), *fwhm))
        .collect();
    hw.telescopes.insert(
        name.to_string(),
        TelescopeProps {
            tubes: tubes.iter().map(|(t, _, _)| t.to_string()).collect(),
            platescale,
            tube_spacing,
            fwhm,
        },
    );

    for (tube_name, tube_type, location) in tubes {
        let crate_name = format!("crate{}", counters.crate_slot);
        counters.crate_slot += 1;
        let mut card_slots = Vec::with_capacity(wafers_per_tube);
        let mut wafer_slots = Vec::with_capacity(wafers_per_tube);

        let (npixel, pitch) = wafer_geometry(*tube_type);
        let bands: Vec<String> = wafer_band_suffixes(*tube_type)
            .iter()
            .map(|suffix| format!("{}_{}", band_prefix, suffix))
            .collect();

        for _ in 0..wafers_per_tube {
            let wafer_name = format!("w{:02}", counters.wafer);
            counters.wafer += 1;
            let card_name = format!("c{:02}", counters.card);
            counters.card += 1;

            hw.cards.insert(
                card_name.clone(),
                CardProps {
                    nbias: 12,
                    ncoax: 2,
                    nchannel: npixel * 2,
                    crate_slot: crate_name.clone(),
                },
            );
            hw.wafers.insert(
                wafer_name.clone(),
                WaferProps {
                    wafer_type: *tube_type,
                    npixel,
                    pixel_pitch_mm: pitch,
                    bands: bands.clone(),
                    tube: tube_name.to_string(),
                    card: card_name.clone(),
                },
            );
            card_slots.push(card_name);
            wafer_slots.push(wafer_name);
        }

        hw.crates.insert(crate_name, CrateProps { card_slots });
        hw.tubes.insert(
            tube_name.to_string(),
            TubeProps {
                tube_type: *tube_type,
                telescope: name.to_string(),
                wafer_slots,
                platescale,
                location: *location,
            },
        );
    }
}

/// Build the current nominal hardware model.
///
/// The result carries every table except detectors, which are synthesized
/// per telescope by [`crate::sim::detectors::sim_telescope_detectors`].
/// The construction is fully deterministic.
pub fn nominal() -> Hardware {
    let mut hw = Hardware::new();

    for prefix in ["LAT", "SAT"] {
        for (suffix, center, low, high, net, fknee, fmin, alpha) in BAND_TABLE {
            hw.bands.insert(
                format!("{}_{}", prefix, suffix),
                BandProps {
                    center,
                    low,
                    high,
                    bandpass: "flat".to_string(),
                    net,
                    fknee,
                    fmin,
                    alpha,
                },
            );
        }
    }

    let mut counters = Counters {
        wafer: 0,
        card: 0,
        crate_slot: 0,
    };

    add_telescope(
        &mut hw,
        "LAT",
        "LAT",
        LAT_PLATESCALE,
        LAT_TUBE_SPACING,
        &LAT_BEAM,
        &[
            ("LT0", WaferType::LF, 0),
            ("LT1", WaferType::MF, 1),
            ("LT2", WaferType::MF, 2),
            ("LT3", WaferType::MF, 3),
            ("LT4", WaferType::MF, 4),
            ("LT5", WaferType::UHF, 5),
            ("LT6", WaferType::UHF, 6),
        ],
        3,
        &mut counters,
    );
    add_telescope(
        &mut hw,
        "SAT1",
        "SAT",
        SAT_PLATESCALE,
        0.0,
        &SAT_BEAM,
        &[("ST1", WaferType::MF, 0)],
        7,
        &mut counters,
    );
    add_telescope(
        &mut hw,
        "SAT2",
        "SAT",
        SAT_PLATESCALE,
        0.0,
        &SAT_BEAM,
        &[("ST2", WaferType::UHF, 0)],
        7,
        &mut counters,
    );
    add_telescope(
        &mut hw,
        "SAT3",
        "SAT",
        SAT_PLATESCALE,
        0.0,
        &SAT_BEAM,
        &[("ST3", WaferType::LF, 0)],
        7,
        &mut counters,
    );

    hw
}
