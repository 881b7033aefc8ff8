//! Per-target constants, kept out of the formatting code so a new target
//! only needs a new profile.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericFmProfile {
    /// Written to `cToneFreq`, and to `rToneFreq` on DCS rows.
    pub placeholder_tone: String,
    pub default_dtcs_code: String,
    pub dtcs_polarity: String,
    pub tuning_step: String,
}

impl Default for GenericFmProfile {
    fn default() -> Self {
        Self {
            placeholder_tone: "88.5".into(),
            default_dtcs_code: "023".into(),
            dtcs_polarity: "NN".into(),
            tuning_step: "5.00".into(),
        }
    }
}

/// Frequency range in MHz, exclusive at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub low_mhz: f64,
    pub high_mhz: f64,
}

impl Band {
    pub fn new(name: &str, low_mhz: f64, high_mhz: f64) -> Self {
        Self {
            name: name.to_string(),
            low_mhz,
            high_mhz,
        }
    }

    pub fn contains(&self, mhz: f64) -> bool {
        mhz > self.low_mhz && mhz < self.high_mhz
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DualModeProfile {
    pub scan_list: String,
    /// The CPS rejects an empty color code, analog channels included.
    pub default_color_code: String,
    /// Output order is band-major, in this order.
    pub bands: Vec<Band>,
}

impl Default for DualModeProfile {
    fn default() -> Self {
        Self {
            scan_list: "Roundabout".into(),
            default_color_code: "1".into(),
            bands: vec![Band::new("2m", 144.0, 148.0), Band::new("70cm", 430.0, 450.0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_exclusive() {
        let band = Band::new("2m", 144.0, 148.0);
        assert!(band.contains(146.94));
        assert!(!band.contains(144.0));
        assert!(!band.contains(148.0));
    }
}
