//! Error types for color-correction composition and configuration loading.

use std::fmt;

use thiserror::Error;

/// Why a composed color-correction result cannot be represented in hardware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverflowReason {
    /// Sum of absolute row coefficients plus the scaled offset reaches 16.
    RowSum(f64),
    /// The row offset lies outside ±4095.
    Offset(f64),
}

impl fmt::Display for OverflowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowSum(sum) => write!(f, "row magnitude {sum:.4} >= 16"),
            Self::Offset(offset) => write!(f, "offset {offset:.1} outside ±4095"),
        }
    }
}

/// Failure of the color-correction computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CcError {
    /// The combined controls saturate the fixed-point coefficient format.
    /// The caller must keep the previously applied register state.
    #[error("color correction row {row} out of range: {reason}")]
    RangeOverflow { row: usize, reason: OverflowReason },
}

/// Failure while loading calibration data or control settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
