//! Observing band properties.

use serde::{Deserialize, Serialize};

/// Properties of a single observing band.
///
/// Frequencies are in GHz, noise levels in uK*sqrt(s), and 1/f parameters
/// in mHz. The bandpass field names the assumed bandpass shape; the nominal
/// model uses a flat top-hat between the band edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandProps {
    /// Band center frequency in GHz
    pub center: f64,
    /// Lower band edge in GHz
    pub low: f64,
    /// Upper band edge in GHz
    pub high: f64,
    /// Bandpass shape name
    pub bandpass: String,
    /// Noise equivalent temperature in uK*sqrt(s)
    pub net: f64,
    /// 1/f knee frequency in mHz
    pub fknee: f64,
    /// Minimum 1/f frequency in mHz
    pub fmin: f64,
    /// Noise slope exponent
    pub alpha: f64,
}

impl BandProps {
    /// Bandwidth between the band edges in GHz.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Fractional bandwidth relative to the band center.
    pub fn fractional_width(&self) -> f64 {
        self.width() / self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> BandProps {
        BandProps {
            center: 93.0,
            low: 79.0,
            high: 107.0,
            bandpass: "flat".to_string(),
            net: 268.0,
            fknee: 25.0,
            fmin: 1.0,
            alpha: 3.5,
        }
    }

    #[test]
    fn test_width() {
        assert_eq!(band().width(), 28.0);
    }

    #[test]
    fn test_fractional_width() {
        let b = band();
        assert!((b.fractional_width() - 28.0 / 93.0).abs() < 1e-12);
    }
}
