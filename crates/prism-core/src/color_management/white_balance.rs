//! White balance from a sensor calibration table.
//!
//! The table lists reference illuminants measured on the sensor. Each record
//! carries the red/blue gains that neutralise that illuminant and a 3x3
//! correction matrix, both in 4.12 fixed point. Lookups interpolate linearly
//! between the two records that bracket the requested color temperature or
//! red/blue gain ratio.
//!
//! # Algorithm
//! 1. Skip inert records (temperature 0).
//! 2. `lower` = largest reference ≤ input, `upper` = smallest reference > input.
//! 3. One-sided bracket: use the present record for both (no extrapolation).
//! 4. `alpha = (upper − input) / (upper − lower)`,
//!    `value = (alpha × lower + (1 − alpha) × upper) × 2⁻¹²`.
//!
//! Gains map onto the hardware "balance" code in `[-128, 127]`:
//! ```text
//! balance = round(gain / (gain + 1) × 256 − 128)
//! gain    = v / (1 − v),  v = (balance + 128) / 256
//! ```

use serde::{Deserialize, Serialize};

use crate::algebra::{COEFF_COUNT, Matrix};
use crate::error::ConfigError;

/// Scale of the 4.12 fixed-point calibration values.
const FIXED_POINT_SCALE: f64 = 1.0 / 4096.0;

/// One illuminant entry of a white-balance calibration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Correlated color temperature in kelvin. 0 marks an unused slot.
    pub temperature: u32,
    /// Red gain, unsigned 4.12 fixed point.
    pub gain_r: u16,
    /// Blue gain, unsigned 4.12 fixed point.
    pub gain_b: u16,
    /// Row-major correction matrix, signed 4.12 fixed point.
    pub coeff: [i16; COEFF_COUNT],
}

impl CalibrationRecord {
    fn is_inert(&self) -> bool {
        self.temperature == 0
    }

    fn reference(&self, key: WbKey) -> Option<f64> {
        if self.is_inert() {
            return None;
        }
        let v = match key {
            WbKey::Temperature(_) => self.temperature as f64,
            WbKey::GainRatio(_) => self.gain_r as f64 / self.gain_b as f64,
        };
        v.is_finite().then_some(v)
    }
}

/// Ordered white-balance calibration table for one sensor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable(pub Vec<CalibrationRecord>);

impl CalibrationTable {
    /// Parse a table from a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Records in table order.
    pub fn records(&self) -> &[CalibrationRecord] {
        &self.0
    }

    /// Whether the table contains at least one usable record.
    pub fn is_configured(&self) -> bool {
        self.0.iter().any(|r| !r.is_inert())
    }
}

/// Lookup key for [`interpolate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WbKey {
    /// Correlated color temperature in kelvin.
    Temperature(u32),
    /// Red gain divided by blue gain.
    GainRatio(f64),
}

impl WbKey {
    fn value(self) -> f64 {
        match self {
            Self::Temperature(t) => t as f64,
            Self::GainRatio(r) => r,
        }
    }
}

/// Interpolated white-balance gains and correction matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WbInterpolation {
    pub gain_r: f64,
    pub gain_b: f64,
    pub matrix: Matrix,
}

impl WbInterpolation {
    /// Unit gains and identity matrix, used when the table is not configured.
    pub const IDENTITY: Self = Self {
        gain_r: 1.0,
        gain_b: 1.0,
        matrix: Matrix::IDENTITY,
    };
}

/// Interpolate gains and correction matrix for `key` over `table`.
pub fn interpolate(key: WbKey, table: &[CalibrationRecord]) -> WbInterpolation {
    let input = key.value();

    let mut lower: Option<(usize, f64)> = None;
    let mut upper: Option<(usize, f64)> = None;
    for (i, record) in table.iter().enumerate() {
        let Some(v) = record.reference(key) else {
            continue;
        };
        if input < v {
            if upper.is_none_or(|(_, u)| v < u) {
                upper = Some((i, v));
            }
        } else if lower.is_none_or(|(_, l)| v > l) {
            lower = Some((i, v));
        }
    }

    let (i0, i1, alpha) = match (lower, upper) {
        (None, None) => return WbInterpolation::IDENTITY,
        (Some((i0, _)), None) => (i0, i0, 0.0),
        (None, Some((i1, _))) => (i1, i1, 0.0),
        (Some((i0, v0)), Some((i1, v1))) => (i0, i1, (v1 - input) / (v1 - v0)),
    };
    let (r0, r1) = (&table[i0], &table[i1]);
    let lerp = |a: f64, b: f64| (alpha * a + (1.0 - alpha) * b) * FIXED_POINT_SCALE;

    let mut coeff = [0.0; COEFF_COUNT];
    for (j, c) in coeff.iter_mut().enumerate() {
        *c = lerp(r0.coeff[j] as f64, r1.coeff[j] as f64);
    }

    WbInterpolation {
        gain_r: lerp(r0.gain_r as f64, r1.gain_r as f64),
        gain_b: lerp(r0.gain_b as f64, r1.gain_b as f64),
        matrix: Matrix::from_row_major(coeff),
    }
}

/// Convert a linear channel gain to a balance code.
pub fn gain_to_balance(gain: f64) -> i32 {
    ((gain / (gain + 1.0)) * 256.0 - 128.0).round() as i32
}

/// Convert a balance code to a linear channel gain.
pub fn balance_to_gain(balance: i32) -> f64 {
    let v = (balance + 128) as f64 / 256.0;
    v / (1.0 - v)
}

/// Red and blue balance codes for a color temperature.
pub fn balances_for_temperature(temperature: u32, table: &[CalibrationRecord]) -> (i32, i32) {
    let wb = interpolate(WbKey::Temperature(temperature), table);
    (gain_to_balance(wb.gain_r), gain_to_balance(wb.gain_b))
}

/// White-balance correction matrix for the requested balance codes.
///
/// The calibration matrix is looked up by the requested red/blue gain ratio,
/// then its red and blue input columns are scaled by the requested gains
/// relative to the gains the sensor already applies.
pub fn white_balance_matrix(
    red_balance: i32,
    blue_balance: i32,
    sensor_red_balance: i32,
    sensor_blue_balance: i32,
    table: &[CalibrationRecord],
) -> Matrix {
    let gain_r = balance_to_gain(red_balance);
    let gain_b = balance_to_gain(blue_balance);
    let wb = interpolate(WbKey::GainRatio(gain_r / gain_b), table);

    wb.matrix
        .scale_column(0, gain_r / balance_to_gain(sensor_red_balance))
        .scale_column(2, gain_b / balance_to_gain(sensor_blue_balance))
}
