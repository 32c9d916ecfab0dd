//! Control values that define the color-correction transform.
//!
//! `ControlSet` is the single source of truth for the image adjustments.
//! Every control (manual or automatic) writes here; recomposition reads the
//! full struct.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grading::effects::ColorEffectKind;
use crate::grading::sliders::NEUTRAL_GAIN;

/// Requested and sensor-applied white-balance codes.
///
/// A balance code `b` stands for the gain `v / (1 − v)` with
/// `v = (b + 128) / 256`, so 0 is unit gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalanceControls {
    pub red_balance: i32,
    pub blue_balance: i32,
    /// Red balance already applied by the sensor.
    pub sensor_red_balance: i32,
    /// Blue balance already applied by the sensor.
    pub sensor_blue_balance: i32,
}

/// Every image adjustment feeding the color-correction chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSet {
    /// Offset subtracted from every channel before balancing. Default: 0.
    pub black_level: i32,
    /// Luma offset. Default: 0.
    pub brightness: i32,
    /// Luma gain code. Default: 128 (unit gain).
    pub contrast: i32,
    /// Chroma gain code. Default: 128 (unit gain).
    pub saturation: i32,
    /// Chroma rotation in 1/256 turns. Default: 0.
    pub hue: i32,
    /// Chroma fade toward gray, `0.0..=1.0`. Default: 0.0.
    pub color_key: f64,
    pub effect: ColorEffectKind,
    pub white_balance: WhiteBalanceControls,
}

impl ControlSet {
    /// Parse a (possibly partial) control set. Missing fields keep their
    /// neutral values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ControlSet {
    /// Produces an identity transform: pixels pass through unchanged.
    fn default() -> Self {
        Self {
            black_level: 0,
            brightness: 0,
            contrast: NEUTRAL_GAIN,
            saturation: NEUTRAL_GAIN,
            hue: 0,
            color_key: 0.0,
            effect: ColorEffectKind::None,
            white_balance: WhiteBalanceControls::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_neutral_defaults() {
        let controls = ControlSet::from_json(r#"{ "hue": 12, "effect": "Sepia" }"#).unwrap();
        assert_eq!(controls.hue, 12);
        assert_eq!(controls.effect, ColorEffectKind::Sepia);
        assert_eq!(controls.contrast, NEUTRAL_GAIN);
        assert_eq!(controls.white_balance, WhiteBalanceControls::default());
    }

    #[test]
    fn test_nested_white_balance_and_fixed_chroma() {
        let json = r#"{
            "white_balance": { "red_balance": 10, "sensor_blue_balance": -4 },
            "effect": { "FixedChroma": { "cb": 16, "cr": 240 } }
        }"#;
        let controls = ControlSet::from_json(json).unwrap();
        assert_eq!(controls.white_balance.red_balance, 10);
        assert_eq!(controls.white_balance.blue_balance, 0);
        assert_eq!(controls.white_balance.sensor_blue_balance, -4);
        assert_eq!(controls.effect, ColorEffectKind::FixedChroma { cb: 16, cr: 240 });
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        assert!(matches!(
            ControlSet::from_json("{ \"hue\": \"left\" }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
