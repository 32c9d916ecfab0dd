//! Transform pipeline: control values, chain composition, and fixed-point output.

pub mod compose;
pub mod params;
pub mod quantize;

pub use compose::{Transforms, calculate_cc};
pub use params::{ControlSet, WhiteBalanceControls};
pub use quantize::PipelineResult;
