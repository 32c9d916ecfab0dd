//! YCbCr encoding standards and their 12-bit conversion tables.
//!
//! Every table is a compile-time constant indexed by [`YcbcrEncoding`] and,
//! for the YCbCr→RGB direction, by [`Quantization`] of the YCbCr input.
//! RGB→YCbCr always produces full-range output.
//!
//! ```text
//!   RGB ──[ycbcr_from_rgb]──→ YCbCr + (0, 2048, 2048)
//!   YCbCr ──[rgb_from_ycbcr]──→ RGB + rgb_offset
//! ```

use serde::{Deserialize, Serialize};

use crate::algebra::{Matrix, Vector};

/// YCbCr encoding standard selecting the conversion coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YcbcrEncoding {
    /// ITU-R BT.601.
    #[default]
    Bt601,
    /// ITU-R BT.709.
    Bt709,
    /// ITU-R BT.2020 (non-constant luminance).
    Bt2020,
    /// sYCC (IEC 61966-2-1 Amendment 1), BT.601 weights at 4 decimals.
    Sycc,
}

impl YcbcrEncoding {
    /// Human-readable label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bt601 => "BT.601",
            Self::Bt709 => "BT.709",
            Self::Bt2020 => "BT.2020",
            Self::Sycc => "sYCC",
        }
    }

    /// All supported encodings.
    pub fn all() -> &'static [Self] {
        const ALL: [YcbcrEncoding; 4] = [
            YcbcrEncoding::Bt601,
            YcbcrEncoding::Bt709,
            YcbcrEncoding::Bt2020,
            YcbcrEncoding::Sycc,
        ];
        &ALL
    }

    const fn index(self) -> usize {
        match self {
            Self::Bt601 => 0,
            Self::Bt709 => 1,
            Self::Bt2020 => 2,
            Self::Sycc => 3,
        }
    }
}

/// Quantization range of YCbCr samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quantization {
    /// Studio swing: Y in 16..235, chroma in 16..240 (8-bit terms).
    Limited,
    /// Full swing over the whole code range.
    #[default]
    Full,
}

/// Neutral chroma bias added by RGB→YCbCr (12-bit codes).
pub const YCBCR_OFFSET: Vector = Vector::new(0.0, 2048.0, 2048.0);

/// RGB→YCbCr, full-range output. Rows are Y, Cb, Cr; columns R, G, B.
#[rustfmt::skip]
const YCBCR_FROM_RGB: [Matrix; 4] = [
    // BT.601
    Matrix::from_row_major([
        0.299, 0.587, 0.114,
        -0.168735891647856, -0.331264108352144, 0.5,
        0.5, -0.418687589158345, -0.0813124108416548,
    ]),
    // BT.709
    Matrix::from_row_major([
        0.2126, 0.7152, 0.0722,
        -0.11457210605734, -0.38542789394266, 0.5,
        0.5, -0.454152908305817, -0.0458470916941834,
    ]),
    // BT.2020
    Matrix::from_row_major([
        0.2627, 0.678, 0.0593,
        -0.139630062719252, -0.360369937280748, 0.5,
        0.5, -0.459785704597857, -0.040214295402143,
    ]),
    // sYCC
    Matrix::from_row_major([
        0.299, 0.587, 0.114,
        -0.1687, -0.3313, 0.5,
        0.5, -0.4187, -0.0813,
    ]),
];

/// YCbCr→RGB, indexed `[encoding][quantization]` with limited range first.
/// Rows are R, G, B; columns Y, Cb, Cr.
#[rustfmt::skip]
const RGB_FROM_YCBCR: [[Matrix; 2]; 4] = [
    [
        Matrix::from_row_major([
            1.16438356164384, 5.59894392753486e-17, 1.59602678571429,
            1.16438356164384, -0.391762290094914, -0.81296764723777,
            1.16438356164384, 2.01723214285714, 1.11022302462516e-16,
        ]),
        Matrix::from_row_major([
            1.0, 4.91828799908944e-17, 1.402,
            1.0, -0.344136286201022, -0.714136286201022,
            1.0, 1.772, 0.0,
        ]),
    ],
    [
        Matrix::from_row_major([
            1.16438356164384, 0.0, 1.79274107142857,
            1.16438356164384, -0.21324861427373, -0.532909328559444,
            1.16438356164384, 2.11240178571429, -5.55111512312578e-17,
        ]),
        Matrix::from_row_major([
            1.0, 0.0, 1.5748,
            1.0, -0.187324272930649, -0.468124272930649,
            1.0, 1.8556, 5.55111512312578e-17,
        ]),
    ],
    [
        Matrix::from_row_major([
            1.16438356164384, -5.94461236188718e-17, 1.67867410714286,
            1.16438356164384, -0.187326104219343, -0.650424318505057,
            1.16438356164384, 2.14177232142857, 0.0,
        ]),
        Matrix::from_row_major([
            1.0, -2.61096699816221e-17, 1.4746,
            1.0, -0.164553126843658, -0.571353126843658,
            1.0, 1.8814, 0.0,
        ]),
    ],
    [
        Matrix::from_row_major([
            1.16438356164384, -4.19156139872783e-05, 1.59601264338613,
            1.16438356164384, -0.391736101495071, -0.812930689215866,
            1.16438356164384, 2.01720723110692, -0.000153208795953375,
        ]),
        Matrix::from_row_major([
            1.0, -3.68199903261289e-05, 1.40198757693526,
            1.0, -0.344113281313317, -0.714103821115113,
            1.0, 1.77197811673706, -0.000134583412916056,
        ]),
    ],
];

/// YCbCr→RGB offsets, indexed like [`RGB_FROM_YCBCR`].
#[rustfmt::skip]
const RGB_OFFSET: [[Vector; 2]; 4] = [
    [
        Vector::new(-3566.74504892368, 2169.20471987651, -4429.37362035225),
        Vector::new(-2871.296, 2167.34222827939, -3629.056),
    ],
    [
        Vector::new(-3969.61590606654, 1230.04927514152, -4624.28104892368),
        Vector::new(-3225.1904, 1342.35862192394, -3800.2688),
    ],
    [
        Vector::new(-3736.00676320939, 1417.63067395875, -4684.43190606654),
        Vector::new(-3019.9808, 1507.13600755162, -3853.1072),
    ],
    [
        Vector::new(-3566.63024225816, 2169.07539559518, -4429.00882947368),
        Vector::new(-2871.19515022323, 2167.22862577343, -3628.73555624785),
    ],
];

const fn quantization_index(quantization: Quantization) -> usize {
    match quantization {
        Quantization::Limited => 0,
        Quantization::Full => 1,
    }
}

/// RGB→YCbCr matrix (full-range output).
pub const fn ycbcr_from_rgb(encoding: YcbcrEncoding) -> Matrix {
    YCBCR_FROM_RGB[encoding.index()]
}

/// YCbCr→RGB matrix for input of the given quantization.
pub const fn rgb_from_ycbcr(encoding: YcbcrEncoding, quantization: Quantization) -> Matrix {
    RGB_FROM_YCBCR[encoding.index()][quantization_index(quantization)]
}

/// YCbCr→RGB offset for input of the given quantization.
pub const fn rgb_offset(encoding: YcbcrEncoding, quantization: Quantization) -> Vector {
    RGB_OFFSET[encoding.index()][quantization_index(quantization)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_full_range_pairs_are_inverse() {
        for &enc in YcbcrEncoding::all() {
            let product = rgb_from_ycbcr(enc, Quantization::Full) * ycbcr_from_rgb(enc);
            let expected = Matrix::IDENTITY.to_row_major();
            for (i, (a, b)) in product.to_row_major().iter().zip(expected).enumerate() {
                assert!(
                    (a - b).abs() < EPSILON,
                    "{}: coeff {i} = {a:.12}, expected {b}",
                    enc.label()
                );
            }
        }
    }

    #[test]
    fn test_full_range_offset_cancels_chroma_bias() {
        for &enc in YcbcrEncoding::all() {
            let rgb = rgb_from_ycbcr(enc, Quantization::Full) * YCBCR_OFFSET
                + rgb_offset(enc, Quantization::Full);
            for c in 0..3 {
                assert!(rgb[c].abs() < 1e-6, "{}: channel {c} = {}", enc.label(), rgb[c]);
            }
        }
    }

    #[test]
    fn test_limited_range_maps_studio_swing_to_full_scale() {
        for &enc in YcbcrEncoding::all() {
            let m = rgb_from_ycbcr(enc, Quantization::Limited);
            let v = rgb_offset(enc, Quantization::Limited);

            // 8-bit black (16) and white (235) scaled to 12 bits.
            let black = m * Vector::new(256.0, 2048.0, 2048.0) + v;
            let white = m * Vector::new(3760.0, 2048.0, 2048.0) + v;
            for c in 0..3 {
                assert!(black[c].abs() < 1.0, "{}: black ch{c} = {}", enc.label(), black[c]);
                assert!(
                    (white[c] - 4080.0).abs() < 1.0,
                    "{}: white ch{c} = {}",
                    enc.label(),
                    white[c]
                );
            }
        }
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        for &enc in YcbcrEncoding::all() {
            let y = ycbcr_from_rgb(enc).row(0).to_array();
            assert!((y.iter().sum::<f64>() - 1.0).abs() < EPSILON);
        }
    }
}
