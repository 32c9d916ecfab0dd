//! Color effects applied around the YCbCr stage of the correction chain.
//!
//! An effect contributes a matrix/offset pair in the RGB domain (applied
//! last) and another pair in the YCbCr domain (applied to biased YCbCr
//! right before conversion back to RGB).

use serde::{Deserialize, Serialize};

use crate::algebra::{Matrix, Vector};

/// Closed set of supported color effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorEffectKind {
    /// No effect.
    #[default]
    None,
    /// Black and white.
    Grayscale,
    Sepia,
    /// Inverted colors.
    Negative,
    /// Boosted chroma.
    Vivid,
    Aqua,
    Antique,
    /// Every pixel gets the same 8-bit chroma; luma is kept.
    FixedChroma { cb: u8, cr: u8 },
}

impl ColorEffectKind {
    /// Decode a V4L2 `COLORFX` code. `cbcr` is the packed `cb << 8 | cr`
    /// payload used by the fixed-chroma effect. Unsupported codes map to
    /// [`ColorEffectKind::None`].
    pub fn from_code(code: u32, cbcr: u32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Grayscale,
            2 => Self::Sepia,
            3 => Self::Negative,
            9 => Self::Vivid,
            10 => Self::Aqua,
            14 => Self::Antique,
            15 => Self::FixedChroma {
                cb: ((cbcr >> 8) & 0xff) as u8,
                cr: (cbcr & 0xff) as u8,
            },
            other => {
                tracing::debug!("unsupported color effect code {other}, using none");
                Self::None
            }
        }
    }

    /// Matrices and offsets implementing this effect.
    pub fn effect(self) -> ColorEffect {
        match self {
            Self::None => ColorEffect::NONE,
            Self::Grayscale => ColorEffect {
                m_ycbcr: LUMA_ONLY,
                v_ycbcr: Vector::new(0.0, 2048.0, 2048.0),
                ..ColorEffect::NONE
            },
            Self::Sepia => ColorEffect {
                m_rgb: Matrix::from_row_major([
                    0.393, 0.769, 0.189, 0.349, 0.686, 0.168, 0.272, 0.534, 0.131,
                ]),
                ..ColorEffect::NONE
            },
            Self::Negative => ColorEffect {
                m_rgb: Matrix::diagonal(-1.0, -1.0, -1.0),
                v_rgb: Vector::splat(4095.0),
                ..ColorEffect::NONE
            },
            Self::Vivid => ColorEffect {
                m_ycbcr: Matrix::diagonal(1.0, 1.3143, 1.3143),
                v_ycbcr: Vector::new(0.0, -643.6864, -643.6864),
                ..ColorEffect::NONE
            },
            Self::Aqua => ColorEffect {
                m_rgb: Matrix::from_row_major([0.9, 0.1, 0.1, 0.1, 0.85, 0.1, 0.3, 0.1, 0.7]),
                ..ColorEffect::NONE
            },
            Self::Antique => ColorEffect {
                m_rgb: Matrix::from_row_major([0.85, 0.1, 0.3, 0.1, 0.45, 0.5, 0.1, 0.3, 0.5]),
                ..ColorEffect::NONE
            },
            Self::FixedChroma { cb, cr } => ColorEffect {
                m_ycbcr: LUMA_ONLY,
                // 8-bit chroma scaled to 12-bit codes.
                v_ycbcr: Vector::new(0.0, cb as f64 * 16.0, cr as f64 * 16.0),
                ..ColorEffect::NONE
            },
        }
    }
}

const LUMA_ONLY: Matrix = Matrix::diagonal(1.0, 0.0, 0.0);

/// Matrix/offset pairs of a color effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEffect {
    /// RGB-domain matrix, applied last.
    pub m_rgb: Matrix,
    /// YCbCr-domain matrix.
    pub m_ycbcr: Matrix,
    /// RGB-domain offset.
    pub v_rgb: Vector,
    /// YCbCr-domain offset.
    pub v_ycbcr: Vector,
}

impl ColorEffect {
    /// Identity matrices and zero offsets.
    pub const NONE: Self = Self {
        m_rgb: Matrix::IDENTITY,
        m_ycbcr: Matrix::IDENTITY,
        v_rgb: Vector::ZERO,
        v_ycbcr: Vector::ZERO,
    };
}

impl Default for ColorEffect {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<ColorEffectKind> for ColorEffect {
    fn from(kind: ColorEffectKind) -> Self {
        kind.effect()
    }
}
