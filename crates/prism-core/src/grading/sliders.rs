//! Slider controls (black level, brightness, contrast, saturation, hue, color key).
//!
//! Each builder maps one control value to the matrix or offset vector it
//! contributes to the color-correction chain. Matrices act on YCbCr with
//! the chroma bias removed, so channel 0 is luma and channels 1–2 are chroma.
//!
//! ```text
//! contrast   = diag(tan(v·π/512), 1, 1)
//! saturation = diag(1, tan(v·π/512), tan(v·π/512))
//! hue        = | 1  0     0    |
//!              | 0  cos θ −sin θ |   θ = v·π/128
//!              | 0  sin θ  cos θ |
//! color key  = diag(1, 1 − v, 1 − v)
//! ```
//!
//! Contrast and saturation are neutral at [`NEUTRAL_GAIN`] (tan(π/4) = 1).

use std::f64::consts::PI;

use crate::algebra::{Matrix, Vector};

/// Contrast and saturation value producing unit gain.
pub const NEUTRAL_GAIN: i32 = 128;

/// Black level: the same offset on every channel.
pub fn black_level_vector(value: i32) -> Vector {
    Vector::splat(value as f64)
}

/// Brightness: an offset on luma only.
pub fn brightness_vector(value: i32) -> Vector {
    Vector::new(value as f64, 0.0, 0.0)
}

/// Luma gain `tan(value·π/512)`.
pub fn contrast_matrix(value: i32) -> Matrix {
    Matrix::diagonal(slope(value), 1.0, 1.0)
}

/// Chroma gain `tan(value·π/512)`.
pub fn saturation_matrix(value: i32) -> Matrix {
    let s = slope(value);
    Matrix::diagonal(1.0, s, s)
}

/// Rotation of the chroma plane by `value·π/128`.
pub fn hue_matrix(value: i32) -> Matrix {
    let (sin, cos) = (value as f64 * PI / 128.0).sin_cos();
    Matrix::from_row_major([1.0, 0.0, 0.0, 0.0, cos, -sin, 0.0, sin, cos])
}

/// Chroma fade toward gray by `fade` ∈ [0, 1].
pub fn color_key_matrix(fade: f64) -> Matrix {
    Matrix::diagonal(1.0, 1.0 - fade, 1.0 - fade)
}

fn slope(value: i32) -> f64 {
    (value as f64 * PI / 512.0).tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn assert_near_identity(m: &Matrix) {
        let id = Matrix::IDENTITY.to_row_major();
        for (i, (a, b)) in m.to_row_major().iter().zip(id).enumerate() {
            assert!((a - b).abs() < EPSILON, "coeff {i}: {a} vs {b}");
        }
    }

    #[test]
    fn test_hue_zero_is_identity() {
        assert_eq!(hue_matrix(0), Matrix::IDENTITY);
    }

    #[test]
    fn test_zero_contrast_and_saturation_collapse_their_channels() {
        assert_eq!(contrast_matrix(0), Matrix::diagonal(0.0, 1.0, 1.0));
        assert_eq!(saturation_matrix(0), Matrix::diagonal(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_neutral_gain_is_identity() {
        assert_near_identity(&contrast_matrix(NEUTRAL_GAIN));
        assert_near_identity(&saturation_matrix(NEUTRAL_GAIN));
    }

    #[test]
    fn test_contrast_touches_luma_only() {
        let m = contrast_matrix(200);
        assert!(m.coeff(0, 0) > 1.0);
        assert_eq!(m.coeff(1, 1), 1.0);
        assert_eq!(m.coeff(2, 2), 1.0);
    }

    #[test]
    fn test_hue_quarter_turn_swaps_chroma() {
        // 64 × π/128 = π/2
        let v = hue_matrix(64) * Vector::new(10.0, 1.0, 0.0);
        assert!((v[0] - 10.0).abs() < EPSILON);
        assert!(v[1].abs() < EPSILON);
        assert!((v[2] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_hue_full_turn_is_identity() {
        assert_near_identity(&hue_matrix(256));
    }

    #[test]
    fn test_color_key_fades_chroma() {
        assert_eq!(color_key_matrix(0.0), Matrix::IDENTITY);
        assert_eq!(color_key_matrix(1.0), Matrix::diagonal(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_offset_vectors() {
        assert_eq!(black_level_vector(-64).to_array(), [-64.0; 3]);
        assert_eq!(brightness_vector(100).to_array(), [100.0, 0.0, 0.0]);
        assert_eq!(black_level_vector(0), Vector::ZERO);
    }
}
