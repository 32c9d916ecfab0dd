//! Gamma curve baking into the hardware's 12-bit 1D LUTs.
//!
//! The gamma control `value` maps to an exponent
//! ```text
//! g = (value / 32) / (1 − value / 32)
//! out = round(4095 × (in / 4095)^g)
//! ```
//! so `value = 16` is the identity, smaller values brighten and larger values
//! darken. With backlight compensation the LUT input is first remapped
//! through a histogram-equalization table, one table entry per 16 LUT slots.
//!
//! # Complexity
//! O(4096) `powf` evaluations per bake.

use bytemuck::{Pod, Zeroable};

use crate::scopes::histogram::{EqualizationTable, HISTOGRAM_BINS};

/// Entries per channel LUT.
pub const GAMMA_LUT_SIZE: usize = 4096;

/// Largest 12-bit code.
const CODE_MAX: f64 = 4095.0;

/// LUT slots covered by one equalization bucket.
const SLOTS_PER_BIN: usize = GAMMA_LUT_SIZE / HISTOGRAM_BINS;

/// Red, green and blue gamma LUTs, laid out as the hardware expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct GammaCurve {
    pub red: [u16; GAMMA_LUT_SIZE],
    pub green: [u16; GAMMA_LUT_SIZE],
    pub blue: [u16; GAMMA_LUT_SIZE],
}

/// Exponent for a gamma control value.
pub fn gamma_exponent(value: i32) -> f64 {
    let t = value as f64 / 32.0;
    t / (1.0 - t)
}

/// Bake the gamma LUTs for `value`.
///
/// When `backlight` carries an equalization table, LUT slots
/// `16·i .. 16·i + 15` all read input code `table[i] × 16`.
pub fn bake_gamma_curve(value: i32, backlight: Option<&EqualizationTable>) -> GammaCurve {
    let g = gamma_exponent(value);
    let mut curve = GammaCurve::zeroed();

    for i in 0..GAMMA_LUT_SIZE {
        let input = match backlight {
            Some(table) => table[i / SLOTS_PER_BIN] as usize * SLOTS_PER_BIN,
            None => i,
        };
        let out = (CODE_MAX * (input as f64 / CODE_MAX).powf(g))
            .round()
            .clamp(0.0, CODE_MAX) as u16;
        curve.red[i] = out;
        curve.green[i] = out;
        curve.blue[i] = out;
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scopes::histogram::IDENTITY_EQUALIZATION;

    #[test]
    fn test_value_16_is_identity() {
        assert_eq!(gamma_exponent(16), 1.0);
        let curve = bake_gamma_curve(16, None);
        for i in 0..GAMMA_LUT_SIZE {
            assert_eq!(curve.red[i] as usize, i, "entry {i}");
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for value in [1, 8, 12, 16, 20, 28, 31] {
            let curve = bake_gamma_curve(value, None);
            assert!(
                curve.red.windows(2).all(|w| w[0] <= w[1]),
                "value {value} not monotonic"
            );
            assert_eq!(curve.red[GAMMA_LUT_SIZE - 1], 4095);
        }
    }

    #[test]
    fn test_low_value_brightens_midtones() {
        let curve = bake_gamma_curve(8, None);
        assert!(curve.red[2048] > 2048);
        let curve = bake_gamma_curve(24, None);
        assert!(curve.red[2048] < 2048);
    }

    #[test]
    fn test_channels_are_identical() {
        let curve = bake_gamma_curve(11, None);
        assert_eq!(curve.red, curve.green);
        assert_eq!(curve.red, curve.blue);
    }

    #[test]
    fn test_backlight_steps_per_bucket() {
        let curve = bake_gamma_curve(16, Some(&IDENTITY_EQUALIZATION));
        assert_eq!(curve.red[0], 0);
        assert_eq!(curve.red[15], 0);
        assert_eq!(curve.red[16], 16);
        assert_eq!(curve.red[4095], 4080);
    }

    #[test]
    fn test_curve_bytes_match_register_layout() {
        let curve = bake_gamma_curve(16, None);
        let bytes = bytemuck::bytes_of(&curve);
        assert_eq!(bytes.len(), 3 * GAMMA_LUT_SIZE * 2);
        assert_eq!(u16::from_ne_bytes([bytes[2], bytes[3]]), 1);
    }
}
