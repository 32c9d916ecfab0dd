//! Statistics computation: histogram equalization, level estimation, and luma.

pub mod histogram;

pub use histogram::{BrightnessContrast, HistogramStats, StatZone};
