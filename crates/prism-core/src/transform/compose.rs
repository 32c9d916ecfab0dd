//! Composition of the color-correction chain into one matrix and offset.
//!
//! Pixels flow through these stages, in this order:
//! 1. Black level subtraction (RGB)
//! 2. White balance (RGB)
//! 3. RGB → YCbCr for the selected encoding
//! 4. Hue rotation, contrast, saturation, color key (centered YCbCr)
//! 5. Brightness (luma)
//! 6. YCbCr-domain effect
//! 7. YCbCr → RGB (full range)
//! 8. RGB-domain effect
//!
//! The whole chain is affine, so it folds into a single `M·x + V` that the
//! hardware evaluates per pixel.

use crate::algebra::{Matrix, Vector};
use crate::color_management::encoding::{
    Quantization, YCBCR_OFFSET, YcbcrEncoding, rgb_from_ycbcr, rgb_offset, ycbcr_from_rgb,
};
use crate::color_management::white_balance::{CalibrationTable, white_balance_matrix};
use crate::error::CcError;
use crate::grading::effects::ColorEffect;
use crate::grading::sliders::{
    black_level_vector, brightness_vector, color_key_matrix, contrast_matrix, hue_matrix,
    saturation_matrix,
};
use crate::transform::params::ControlSet;
use crate::transform::quantize::{PipelineResult, quantize};

/// Mid-scale code; centered YCbCr is taken relative to it.
const HALF: Vector = Vector::splat(2048.0);

/// Per-stage matrices and offsets built from a [`ControlSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub white_balance: Matrix,
    pub contrast: Matrix,
    pub saturation: Matrix,
    pub hue: Matrix,
    pub color_key: Matrix,
    pub effect: ColorEffect,
    pub brightness: Vector,
    pub black_level: Vector,
}

impl Default for Transforms {
    /// Identity matrices and zero offsets.
    fn default() -> Self {
        Self {
            white_balance: Matrix::IDENTITY,
            contrast: Matrix::IDENTITY,
            saturation: Matrix::IDENTITY,
            hue: Matrix::IDENTITY,
            color_key: Matrix::IDENTITY,
            effect: ColorEffect::NONE,
            brightness: Vector::ZERO,
            black_level: Vector::ZERO,
        }
    }
}

impl Transforms {
    /// Build every stage from its control value.
    pub fn from_controls(controls: &ControlSet, calibration: &CalibrationTable) -> Self {
        let wb = &controls.white_balance;
        Self {
            white_balance: white_balance_matrix(
                wb.red_balance,
                wb.blue_balance,
                wb.sensor_red_balance,
                wb.sensor_blue_balance,
                calibration.records(),
            ),
            contrast: contrast_matrix(controls.contrast),
            saturation: saturation_matrix(controls.saturation),
            hue: hue_matrix(controls.hue),
            color_key: color_key_matrix(controls.color_key),
            effect: controls.effect.effect(),
            brightness: brightness_vector(controls.brightness),
            black_level: black_level_vector(controls.black_level),
        }
    }

    /// Product of the centered-YCbCr adjustments.
    fn grading(&self) -> Matrix {
        self.color_key * self.saturation * self.contrast * self.hue
    }
}

/// Composite coefficient matrix of the chain.
pub fn compose_matrix(t: &Transforms, encoding: YcbcrEncoding) -> Matrix {
    t.effect.m_rgb
        * rgb_from_ycbcr(encoding, Quantization::Full)
        * t.effect.m_ycbcr
        * t.grading()
        * ycbcr_from_rgb(encoding)
        * t.white_balance
}

/// Composite offset vector of the chain.
pub fn compose_offset(t: &Transforms, encoding: YcbcrEncoding) -> Vector {
    let to_ycbcr = ycbcr_from_rgb(encoding) * t.white_balance;
    let centered = YCBCR_OFFSET - to_ycbcr * t.black_level - HALF;
    let graded = t.grading() * centered + t.brightness + HALF;
    let ycbcr = t.effect.m_ycbcr * graded + t.effect.v_ycbcr;
    let rgb = rgb_from_ycbcr(encoding, Quantization::Full) * ycbcr
        + rgb_offset(encoding, Quantization::Full);
    t.effect.m_rgb * rgb + t.effect.v_rgb
}

/// Compose the chain and convert it to a register image.
///
/// # Errors
///
/// [`CcError::RangeOverflow`] when the composite does not fit the
/// fixed-point format. Nothing is produced in that case; the caller keeps
/// its previous state.
pub fn calculate_cc(t: &Transforms, encoding: YcbcrEncoding) -> Result<PipelineResult, CcError> {
    let matrix = compose_matrix(t, encoding);
    let offset = compose_offset(t, encoding);
    let result = quantize(&matrix, &offset)?;
    tracing::debug!(
        "composed {} color correction, scaling exponent {}",
        encoding.label(),
        result.scaling
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::effects::ColorEffectKind;
    use crate::transform::params::WhiteBalanceControls;

    const EPSILON: f64 = 1e-3;

    fn assert_vec_near(a: Vector, b: Vector) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < EPSILON, "component {i}: {} vs {}", a[i], b[i]);
        }
    }

    fn transforms(controls: &ControlSet) -> Transforms {
        Transforms::from_controls(controls, &CalibrationTable::default())
    }

    #[test]
    fn test_neutral_controls_build_identity_stages() {
        let t = transforms(&ControlSet::default());
        let id = Transforms::default();
        for (a, b) in [
            (t.white_balance, id.white_balance),
            (t.contrast, id.contrast),
            (t.saturation, id.saturation),
            (t.color_key, id.color_key),
        ] {
            for (x, y) in a.to_row_major().iter().zip(b.to_row_major()) {
                assert!((x - y).abs() < 1e-12);
            }
        }
        assert_eq!(t.hue, Matrix::IDENTITY);
        assert_eq!(t.effect, ColorEffect::NONE);
    }

    #[test]
    fn test_identity_composes_to_identity() {
        let t = Transforms::default();
        for &enc in YcbcrEncoding::all() {
            let m = compose_matrix(&t, enc).to_row_major();
            for (i, (a, b)) in m.iter().zip(Matrix::IDENTITY.to_row_major()).enumerate() {
                assert!((a - b).abs() < 1e-6, "{} coeff {i}: {a}", enc.label());
            }
            assert_vec_near(compose_offset(&t, enc), Vector::ZERO);
        }
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let controls = ControlSet {
            contrast: 160,
            ..ControlSet::default()
        };
        let t = transforms(&controls);
        let m = compose_matrix(&t, YcbcrEncoding::Bt709);
        let v = compose_offset(&t, YcbcrEncoding::Bt709);
        let gray = m * HALF + v;
        assert_vec_near(gray, HALF);

        let white = m * Vector::splat(4095.0) + v;
        assert!(white[0] > 4095.0);
    }

    #[test]
    fn test_black_level_shifts_output() {
        let controls = ControlSet {
            black_level: 64,
            ..ControlSet::default()
        };
        let t = transforms(&controls);
        let v = compose_offset(&t, YcbcrEncoding::Bt601);
        assert_vec_near(v, Vector::splat(-64.0));
    }

    #[test]
    fn test_brightness_lifts_every_channel() {
        let controls = ControlSet {
            brightness: 100,
            ..ControlSet::default()
        };
        let t = transforms(&controls);
        let v = compose_offset(&t, YcbcrEncoding::Sycc);
        assert_vec_near(v, Vector::splat(100.0));
    }

    #[test]
    fn test_grayscale_rows_are_luma_weights() {
        let t = Transforms {
            effect: ColorEffectKind::Grayscale.effect(),
            ..Transforms::default()
        };
        let enc = YcbcrEncoding::Bt709;
        let m = compose_matrix(&t, enc);
        let luma = ycbcr_from_rgb(enc).row(0);
        for row in 0..3 {
            let r = m.row(row);
            for col in 0..3 {
                assert!((r[col] - luma[col]).abs() < 1e-6);
            }
        }
        assert_vec_near(compose_offset(&t, enc), Vector::ZERO);
    }

    #[test]
    fn test_negative_inverts_through_chain() {
        let t = Transforms {
            effect: ColorEffectKind::Negative.effect(),
            ..Transforms::default()
        };
        let enc = YcbcrEncoding::Bt2020;
        let out = compose_matrix(&t, enc) * Vector::new(0.0, 1000.0, 4095.0)
            + compose_offset(&t, enc);
        assert_vec_near(out, Vector::new(4095.0, 3095.0, 0.0));
    }

    #[test]
    fn test_calculate_cc_identity() {
        let r = calculate_cc(&Transforms::default(), YcbcrEncoding::Bt601).unwrap();
        assert_eq!(r.scaling, 1);
        assert_eq!(r.coeff, [16384, 0, 0, 0, 16384, 0, 0, 0, 16384]);
        assert_eq!(r.offset, [0, 0, 0]);
    }

    #[test]
    fn test_zero_sensor_gain_is_rejected() {
        // Balance -128 is a zero sensor gain, so the red column scale is infinite.
        let controls = ControlSet {
            white_balance: WhiteBalanceControls {
                sensor_red_balance: -128,
                ..WhiteBalanceControls::default()
            },
            ..ControlSet::default()
        };
        let err = calculate_cc(&transforms(&controls), YcbcrEncoding::Bt601).unwrap_err();
        assert!(matches!(err, CcError::RangeOverflow { row: 0, .. }));
    }

    #[test]
    fn test_extreme_saturation_overflows() {
        let controls = ControlSet {
            saturation: 255,
            ..ControlSet::default()
        };
        let err = calculate_cc(&transforms(&controls), YcbcrEncoding::Bt709).unwrap_err();
        assert!(matches!(err, CcError::RangeOverflow { .. }));
    }

    #[test]
    fn test_hue_keeps_gray_neutral() {
        let controls = ControlSet {
            hue: 40,
            ..ControlSet::default()
        };
        let t = transforms(&controls);
        let enc = YcbcrEncoding::Bt709;
        let gray = Vector::splat(1234.0);
        let out = compose_matrix(&t, enc) * gray + compose_offset(&t, enc);
        assert_vec_near(out, gray);
    }
}
