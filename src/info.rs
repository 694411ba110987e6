//! Human-readable hardware model summaries.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::model::Hardware;

/// Render the summary report for one hardware model.
///
/// The report lists component counts, the tube layout of each telescope,
/// the band table, and detector totals broken down by band.
pub fn summary(hw: &Hardware) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Telescopes: {}", hw.telescopes.len());
    for (name, tele) in &hw.telescopes {
        let tubes: Vec<String> = tele
            .tubes
            .iter()
            .map(|tube_name| match hw.tubes.get(tube_name) {
                Some(tube) => format!("{} ({})", tube_name, tube.tube_type),
                None => tube_name.clone(),
            })
            .collect();
        let _ = writeln!(
            out,
            "  {:<6} platescale {:.4} deg/mm, tubes: {}",
            name,
            tele.platescale,
            tubes.join(", ")
        );
    }

    let _ = writeln!(out, "Optics tubes: {}", hw.tubes.len());

    let mut wafer_types: BTreeMap<String, usize> = BTreeMap::new();
    for wafer in hw.wafers.values() {
        *wafer_types.entry(wafer.wafer_type.to_string()).or_default() += 1;
    }
    let type_counts: Vec<String> = wafer_types
        .iter()
        .map(|(wafer_type, count)| format!("{} {}", wafer_type, count))
        .collect();
    if type_counts.is_empty() {
        let _ = writeln!(out, "Wafer slots: 0");
    } else {
        let _ = writeln!(
            out,
            "Wafer slots: {} ({})",
            hw.wafers.len(),
            type_counts.join(", ")
        );
    }

    let _ = writeln!(
        out,
        "Readout: {} crates, {} cards",
        hw.crates.len(),
        hw.cards.len()
    );

    let _ = writeln!(out, "Bands: {}", hw.bands.len());
    for (name, band) in &hw.bands {
        let _ = writeln!(
            out,
            "  {:<10} {:>6.1} GHz  [{:>6.1}, {:>6.1}]  NET {:>6.0} uK*sqrt(s)",
            name, band.center, band.low, band.high, band.net
        );
    }

    let _ = writeln!(out, "Detectors: {}", hw.ndet());
    if !hw.detectors.is_empty() {
        let mut by_band: BTreeMap<String, usize> = BTreeMap::new();
        for det in hw.detectors.values() {
            *by_band.entry(det.band.clone()).or_default() += 1;
        }
        for (band, count) in by_band {
            let _ = writeln!(out, "  {:<10} {:>8}", band, count);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{nominal, sim_telescope_detectors};

    #[test]
    fn test_summary_counts_present() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let text = summary(&hw);
        assert!(text.contains("Telescopes: 4"));
        assert!(text.contains("Optics tubes: 10"));
        assert!(text.contains("Bands: 12"));
        assert!(text.contains(&format!("Detectors: {}", hw.ndet())));
        // per-band breakdown covers the simulated telescope
        assert!(text.contains("SAT_f030"));
        assert!(text.contains("SAT_f040"));
    }

    #[test]
    fn test_summary_empty_model() {
        let text = summary(&Hardware::new());
        assert!(text.contains("Telescopes: 0"));
        assert!(text.contains("Detectors: 0"));
        assert!(text.contains("Wafer slots: 0"));
    }
}
