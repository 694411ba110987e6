//! Optics tube properties.

use serde::{Deserialize, Serialize};

use super::wafer::WaferType;

/// Properties of one optics tube within a telescope.
///
/// A tube carries a set of wafer slots that share its reimaging optics, so
/// every wafer in a tube has the same frequency class and platescale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeProps {
    /// Frequency class of the wafers in this tube
    pub tube_type: WaferType,
    /// Name of the telescope this tube is mounted in
    pub telescope: String,
    /// Names of the wafer slots fed by this tube, in slot order
    pub wafer_slots: Vec<String>,
    /// Focal plane platescale in degrees per millimeter
    pub platescale: f64,
    /// Index of the tube position within the telescope's tube layout
    pub location: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tube_roundtrip_toml() {
        let tube = TubeProps {
            tube_type: WaferType::MF,
            telescope: "LAT".into(),
            wafer_slots: vec!["w03".into(), "w04".into(), "w05".into()],
            platescale: 0.005,
            location: 1,
        };
        let text = toml::to_string(&tube).unwrap();
        let back: TubeProps = toml::from_str(&text).unwrap();
        assert_eq!(tube, back);
    }
}
