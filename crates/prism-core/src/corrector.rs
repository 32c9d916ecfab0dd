//! Stateful front end of the color-correction computation.

use crate::color_management::encoding::YcbcrEncoding;
use crate::color_management::white_balance::CalibrationTable;
use crate::error::CcError;
use crate::transform::compose::{Transforms, calculate_cc};
use crate::transform::params::ControlSet;
use crate::transform::quantize::PipelineResult;

/// Current controls and the last register image that fit the hardware.
///
/// A control change that would overflow the coefficient format is rejected
/// as a whole: controls and result stay at their previous values.
#[derive(Debug, Clone)]
pub struct ColorCorrector {
    calibration: CalibrationTable,
    encoding: YcbcrEncoding,
    controls: ControlSet,
    result: PipelineResult,
    /// Whether `result` changed since it was last taken for the registers.
    dirty: bool,
}

impl ColorCorrector {
    /// Corrector with neutral controls.
    ///
    /// # Errors
    ///
    /// Fails when the calibration table alone already overflows the
    /// coefficient format.
    pub fn new(calibration: CalibrationTable, encoding: YcbcrEncoding) -> Result<Self, CcError> {
        let controls = ControlSet::default();
        let result = calculate_cc(&Transforms::from_controls(&controls, &calibration), encoding)?;
        Ok(Self {
            calibration,
            encoding,
            controls,
            result,
            dirty: true,
        })
    }

    /// Recompose with `controls`.
    pub fn apply(&mut self, controls: ControlSet) -> Result<PipelineResult, CcError> {
        self.recompose(controls, self.encoding)
    }

    /// Recompose the current controls for another YCbCr encoding.
    pub fn set_encoding(&mut self, encoding: YcbcrEncoding) -> Result<PipelineResult, CcError> {
        self.recompose(self.controls, encoding)
    }

    fn recompose(
        &mut self,
        controls: ControlSet,
        encoding: YcbcrEncoding,
    ) -> Result<PipelineResult, CcError> {
        let transforms = Transforms::from_controls(&controls, &self.calibration);
        match calculate_cc(&transforms, encoding) {
            Ok(result) => {
                self.dirty |= result != self.result;
                self.controls = controls;
                self.encoding = encoding;
                self.result = result;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!("Rejected color controls, keeping previous state: {e}");
                Err(e)
            }
        }
    }

    /// Last accepted register image.
    pub fn result(&self) -> &PipelineResult {
        &self.result
    }

    /// Controls that produced [`Self::result`].
    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    pub fn encoding(&self) -> YcbcrEncoding {
        self.encoding
    }

    /// The register image if it changed since the last call.
    pub fn take_pending(&mut self) -> Option<PipelineResult> {
        std::mem::take(&mut self.dirty).then_some(self.result)
    }
}
