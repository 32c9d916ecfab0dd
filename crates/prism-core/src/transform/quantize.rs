//! Fixed-point conversion of a composed matrix/offset pair.
//!
//! The hardware stores every coefficient as a signed 16-bit word sharing one
//! scaling exponent `e`: a word `w` stands for `w / 2^(15 − e)`. Offsets are
//! plain signed integers.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::algebra::{COEFF_COUNT, DIM, Matrix, Vector};
use crate::error::{CcError, OverflowReason};

/// Row magnitude at which the hardware accumulator saturates.
const ROW_LIMIT: f64 = 16.0;

/// Offsets are divided by this before entering the row-magnitude sum.
const OFFSET_WEIGHT: f64 = 4096.0;

/// Largest representable offset magnitude.
const OFFSET_LIMIT: f64 = 4095.0;

/// Fractional bits of a coefficient word at exponent 0.
const COEFF_FRACTION_BITS: i32 = 15;

/// Color-correction register image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct PipelineResult {
    /// Row-major coefficient words.
    pub coeff: [i16; COEFF_COUNT],
    pub offset: [i16; DIM],
    /// Shared coefficient exponent.
    pub scaling: u16,
}

impl PipelineResult {
    /// Coefficients converted back to floating point.
    pub fn coefficients(&self) -> Matrix {
        let unit = ((COEFF_FRACTION_BITS - self.scaling as i32) as f64).exp2();
        Matrix::from_row_major(self.coeff.map(|w| w as f64 / unit))
    }

    /// Offsets converted back to floating point.
    pub fn offsets(&self) -> Vector {
        let [x, y, z] = self.offset.map(f64::from);
        Vector::new(x, y, z)
    }
}

/// Validate `matrix`/`offset` against the hardware limits and convert them
/// to register words.
///
/// # Errors
///
/// [`CcError::RangeOverflow`] for the first row whose magnitude
/// `Σ|c| + |o|/4096` reaches 16 or whose offset exceeds ±4095. A NaN or
/// infinite entry fails the same checks.
pub fn quantize(matrix: &Matrix, offset: &Vector) -> Result<PipelineResult, CcError> {
    check_range(matrix, offset)?;

    let coeff = matrix.to_row_major();
    let max_abs = coeff.iter().fold(0.0f64, |acc, c| acc.max(c.abs()));
    let scaling = scaling_exponent(max_abs);
    let fraction_bits = COEFF_FRACTION_BITS - scaling as i32;

    Ok(PipelineResult {
        coeff: coeff.map(|c| to_fixed(c, fraction_bits)),
        offset: offset.to_array().map(|o| to_fixed(o, 0)),
        scaling,
    })
}

fn check_range(matrix: &Matrix, offset: &Vector) -> Result<(), CcError> {
    for row in 0..DIM {
        let o = offset[row];
        if !o.is_finite() || o.abs() > OFFSET_LIMIT {
            return Err(CcError::RangeOverflow {
                row,
                reason: OverflowReason::Offset(o),
            });
        }

        let r = matrix.row(row);
        let sum = r[0].abs() + r[1].abs() + r[2].abs() + o.abs() / OFFSET_WEIGHT;
        if !sum.is_finite() || sum >= ROW_LIMIT {
            return Err(CcError::RangeOverflow {
                row,
                reason: OverflowReason::RowSum(sum),
            });
        }
    }
    Ok(())
}

/// Smallest exponent whose coefficient range holds `max_abs`, widened once
/// so that rounding the largest coefficient cannot step past the range.
pub fn scaling_exponent(max_abs: f64) -> u16 {
    let e = exponent_for(max_abs);
    exponent_for(max_abs + (e as f64 - 16.0).exp2())
}

fn exponent_for(max_abs: f64) -> u16 {
    if max_abs < 1.0 {
        0
    } else {
        (max_abs.log2().floor() as u16).saturating_add(1)
    }
}

/// `x · 2^fraction_bits`, rounded half away from zero and clamped to `i16`.
pub fn to_fixed(x: f64, fraction_bits: i32) -> i16 {
    (x * (fraction_bits as f64).exp2())
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}
