//! Prism Core: color-correction coefficient engine for an image-sensor pipeline.
//!
//! This crate turns image adjustment controls into the fixed-point matrix,
//! offsets and scaling exponent of a color-correction block, and holds the
//! closed-form helpers around it: white-balance calibration lookup, auto
//! exposure, gamma LUTs and histogram statistics. No hardware or framework
//! dependencies.

pub mod algebra;
pub mod color_management;
pub mod corrector;
pub mod error;
pub mod exposure;
pub mod grading;
pub mod scopes;
pub mod transform;

// Re-exports for convenience.
pub use algebra::{Matrix, Vector};
pub use color_management::encoding::{Quantization, YcbcrEncoding};
pub use color_management::white_balance::{CalibrationRecord, CalibrationTable};
pub use corrector::ColorCorrector;
pub use error::{CcError, ConfigError, OverflowReason};
pub use exposure::{ExposureConfig, ExposureLimits, ExposureSetting, calculate_exposure_gain};
pub use grading::curves::{GammaCurve, bake_gamma_curve};
pub use grading::effects::{ColorEffect, ColorEffectKind};
pub use transform::compose::{Transforms, calculate_cc};
pub use transform::params::{ControlSet, WhiteBalanceControls};
pub use transform::quantize::PipelineResult;
