//! Histogram statistics: equalization, brightness/contrast estimation, luma.
//!
//! Inputs are the hardware statistics for one zone of the frame: a
//! 256-bucket cumulative histogram over all three channels and the
//! per-channel sums.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::color_management::encoding::{YcbcrEncoding, ycbcr_from_rgb};
use crate::grading::sliders::NEUTRAL_GAIN;

/// Number of histogram buckets.
pub const HISTOGRAM_BINS: usize = 256;

/// Upper bound of the equalization blend strength.
pub const EQUALIZATION_STRENGTH_MAX: u32 = 10;

/// Per-bucket input remap produced by [`equalization_table`].
pub type EqualizationTable = [u16; HISTOGRAM_BINS];

/// Equalization table that leaves every bucket in place.
pub const IDENTITY_EQUALIZATION: EqualizationTable = {
    let mut t = [0u16; HISTOGRAM_BINS];
    let mut i = 0;
    while i < HISTOGRAM_BINS {
        t[i] = i as u16;
        i += 1;
    }
    t
};

/// Raw statistics for one zone, as read from the hardware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramStats {
    /// Cumulative histogram: `cumulate[i]` counts samples in buckets `0..=i`.
    /// Holds [`HISTOGRAM_BINS`] entries; buckets past the end of a shorter
    /// vector read as its last entry.
    pub cumulate: Vec<u32>,
    pub sum_r: u64,
    pub sum_g: u64,
    pub sum_b: u64,
}

impl HistogramStats {
    /// Build statistics from per-bucket counts.
    pub fn from_counts(counts: &[u32; HISTOGRAM_BINS]) -> Self {
        let mut total = 0u32;
        let cumulate = counts
            .iter()
            .map(|&c| {
                total = total.saturating_add(c);
                total
            })
            .collect();
        Self {
            cumulate,
            sum_r: 0,
            sum_g: 0,
            sum_b: 0,
        }
    }

    fn cumulative(&self, bin: usize) -> u32 {
        self.cumulate.get(bin).copied().unwrap_or_else(|| self.total())
    }

    fn total(&self) -> u32 {
        self.cumulate
            .get(HISTOGRAM_BINS - 1)
            .or(self.cumulate.last())
            .copied()
            .unwrap_or(0)
    }

    /// Whether the histogram carries exactly [`HISTOGRAM_BINS`] buckets.
    pub fn is_complete(&self) -> bool {
        self.cumulate.len() == HISTOGRAM_BINS
    }

    fn log_if_incomplete(&self) {
        if !self.is_complete() {
            tracing::debug!(
                "histogram has {} buckets, expected {HISTOGRAM_BINS}",
                self.cumulate.len()
            );
        }
    }
}

impl Default for HistogramStats {
    fn default() -> Self {
        Self {
            cumulate: vec![0; HISTOGRAM_BINS],
            sum_r: 0,
            sum_g: 0,
            sum_b: 0,
        }
    }
}

/// Statistics zone size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatZone {
    pub width: u32,
    pub height: u32,
}

impl StatZone {
    fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Blend of the identity and a full histogram equalization.
///
/// ```text
/// conv[i] = ⌊cumulate[i] × 255 / (h × w × 3)⌋
/// out[i]  = round((1 − n/10) × i + n/10 × conv[i])
/// ```
///
/// `strength` is clamped to `0..=10`. A zero-area zone yields the identity.
pub fn equalization_table(
    stats: &HistogramStats,
    strength: u32,
    zone: StatZone,
) -> EqualizationTable {
    stats.log_if_incomplete();
    let samples = zone.area() * 3;
    if samples == 0 {
        return IDENTITY_EQUALIZATION;
    }

    let n = strength.min(EQUALIZATION_STRENGTH_MAX) as f64 / EQUALIZATION_STRENGTH_MAX as f64;
    let mut table = [0u16; HISTOGRAM_BINS];
    for (i, out) in table.iter_mut().enumerate() {
        let conv = (stats.cumulative(i) as u64 * 255 / samples) as f64;
        *out = ((1.0 - n) * i as f64 + n * conv).round().clamp(0.0, 255.0) as u16;
    }
    table
}

/// Brightness and contrast control values estimated from a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrightnessContrast {
    pub brightness: i32,
    pub contrast: i32,
}

impl BrightnessContrast {
    /// Unit contrast and no brightness offset.
    pub const NEUTRAL: Self = Self {
        brightness: 0,
        contrast: NEUTRAL_GAIN,
    };
}

/// Stretch the 1st–99th percentile range of the histogram to full scale.
///
/// ```text
/// clip  = cumulate[255] / 100
/// min   = first bucket with cumulate ≥ clip
/// max   = last bucket with cumulate ≤ cumulate[255] − clip
/// alpha = 255 / (max − min)
/// contrast   = round(atan(alpha) × 512 / π)
/// brightness = round(−alpha × min)
/// ```
///
/// Returns [`BrightnessContrast::NEUTRAL`] if the range is empty.
pub fn estimate_brightness_contrast(stats: &HistogramStats) -> BrightnessContrast {
    stats.log_if_incomplete();
    let total = stats.total();
    let clip = total / 100;

    let min = (0..HISTOGRAM_BINS).find(|&i| stats.cumulative(i) >= clip);
    let max = (0..HISTOGRAM_BINS)
        .rev()
        .find(|&i| stats.cumulative(i) <= total - clip);

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) if max > min => (min, max),
        _ => {
            tracing::debug!("degenerate histogram (total {total}), keeping neutral levels");
            return BrightnessContrast::NEUTRAL;
        }
    };

    let alpha = 255.0 / (max - min) as f64;
    BrightnessContrast {
        brightness: (-alpha * min as f64).round() as i32,
        contrast: (alpha.atan() * 512.0 / PI).round() as i32,
    }
}

/// Sample layout of the statistics source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleFormat {
    /// Sums are R, G, B.
    Rgb,
    /// Sums carry Y in the green slot. `low_bits` is set when samples arrive
    /// two bits down on the capture bus.
    YCbCr { low_bits: bool },
}

/// Average luma over the zone, the auto-exposure feedback signal.
///
/// RGB sums are weighted with the encoding's luma coefficients. A zero-area
/// zone yields 0.
pub fn luma_average(
    stats: &HistogramStats,
    format: SampleFormat,
    encoding: YcbcrEncoding,
    zone: StatZone,
) -> u32 {
    let area = zone.area();
    if area == 0 {
        return 0;
    }

    let luma = match format {
        SampleFormat::YCbCr { low_bits } => {
            let y = stats.sum_g as f64;
            if low_bits { y * 4.0 } else { y }
        }
        SampleFormat::Rgb => {
            let k = ycbcr_from_rgb(encoding).row(0);
            k[0] * stats.sum_r as f64 + k[1] * stats.sum_g as f64 + k[2] * stats.sum_b as f64
        }
    };
    (luma / area as f64).round() as u32
}
