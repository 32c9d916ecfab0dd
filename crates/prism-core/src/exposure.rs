//! Auto exposure/gain feedback controller.
//!
//! Each frame the measured average luma is compared with the target; the
//! product `exposure × gain` is nudged toward the brightness that would hit
//! the target. Exposure is preferred, gain only makes up what the exposure
//! limit cannot reach.
//!
//! Sensor gain is carried as a code: bits 4.. select a power of two and
//! the low four bits a sixteenth-step mantissa,
//! ```text
//! gain = 2^(code / 16) × (1 + (code mod 16) / 16)
//! ```

use serde::{Deserialize, Serialize};

/// Steps per octave of the gain code.
const GAIN_STEPS: u32 = 16;

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Weight of the current brightness in the smoothed target, `0.0..=1.0`.
    pub smoothness: f64,
    /// Smallest per-frame brightness ratio.
    pub min_adjustment: f64,
    /// Largest per-frame brightness ratio; also used when the measured luma is 0.
    pub max_adjustment: f64,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            smoothness: 0.5,
            min_adjustment: 1.0 / 16.0,
            max_adjustment: 4.0,
        }
    }
}

/// Exposure time and gain code applied to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExposureSetting {
    pub exposure: u32,
    pub gain_code: u32,
}

/// Sensor limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureLimits {
    pub max_exposure: u32,
    pub max_gain_code: u32,
}

/// Linear gain for a gain code.
pub fn code_to_gain(code: u32) -> f64 {
    let power = (code / GAIN_STEPS) as f64;
    let mantissa = (code % GAIN_STEPS) as f64 / GAIN_STEPS as f64;
    power.exp2() * (1.0 + mantissa)
}

/// Nearest gain code for a linear gain. Gains below 1 encode as 0.
pub fn gain_to_code(gain: f64) -> u32 {
    if gain.is_nan() || gain < 1.0 {
        return 0;
    }
    let power = gain.log2().floor();
    let base = power.exp2();
    let step = (GAIN_STEPS as f64 * (gain - base) / base).round();
    (power * GAIN_STEPS as f64 + step) as u32
}

/// Brightness ratio requested for this frame, `target / measured`.
pub fn adjustment(measured_luma: u32, target_luma: u32, config: &ExposureConfig) -> f64 {
    if measured_luma == 0 {
        return config.max_adjustment;
    }
    (target_luma as f64 / measured_luma as f64).clamp(config.min_adjustment, config.max_adjustment)
}

/// Next exposure/gain setting for a frame with `measured_luma`.
pub fn calculate_exposure_gain(
    measured_luma: u32,
    target_luma: u32,
    current: ExposureSetting,
    limits: ExposureLimits,
    config: &ExposureConfig,
) -> ExposureSetting {
    let brightness = current.exposure as f64 * code_to_gain(current.gain_code);
    let desired = brightness * adjustment(measured_luma, target_luma, config);
    let desired = brightness * config.smoothness + desired * (1.0 - config.smoothness);

    let max_exposure = limits.max_exposure as f64;
    let max_gain = code_to_gain(limits.max_gain_code);

    let (mut exposure, mut gain) = if desired > max_exposure {
        (max_exposure, desired / max_exposure)
    } else {
        (desired, 1.0)
    };
    if gain > max_gain {
        exposure = desired / max_gain;
        gain = max_gain;
    }

    let next = ExposureSetting {
        exposure: exposure.round() as u32,
        gain_code: gain_to_code(gain),
    };
    tracing::debug!(
        "luma {measured_luma}/{target_luma}: exposure {} -> {}, gain code {} -> {}",
        current.exposure,
        next.exposure,
        current.gain_code,
        next.gain_code
    );
    next
}
