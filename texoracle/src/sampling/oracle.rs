use super::*;
use crate::calibration::DeviceWeightCurve;
use crate::error::OracleError;
use crate::texture::*;
use rayon::prelude::*;
use std::sync::Arc;

/// What a sampling unit should return for a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    Color(RGBA),
    /// A `textureLoad` outside the texture: the zero color or any texel is acceptable.
    OutOfBounds,
}

impl Prediction {
    pub fn color(&self) -> Option<RGBA> {
        match self {
            Prediction::Color(color) => Some(*color),
            Prediction::OutOfBounds => None,
        }
    }
}

/// Software model of a texture sampling unit, optionally calibrated against a device's
/// mip blending curve. Stateless apart from the shared curve, so one oracle can serve many
/// threads.
#[derive(Debug, Clone, Default)]
pub struct SamplingOracle {
    curve: Option<Arc<DeviceWeightCurve>>,
}

impl SamplingOracle {
    pub fn new(curve: Option<Arc<DeviceWeightCurve>>) -> Self {
        Self { curve }
    }

    /// An oracle that blends mip levels linearly.
    pub fn uncalibrated() -> Self {
        Self { curve: None }
    }

    pub fn curve(&self) -> Option<&DeviceWeightCurve> {
        self.curve.as_deref()
    }

    pub fn predict(&self, texture: &Texture, sampler: &SamplerState, call: &SampleCall) -> Result<Prediction, OracleError> {
        validate(texture, sampler, call)?;
        if let SampleCall::Load { at, level, array_index, sample_index } = call {
            return Ok(match load(texture, at, *level, *array_index, *sample_index) {
                Some(color) => Prediction::Color(color),
                None => Prediction::OutOfBounds,
            });
        }
        let curve = self.curve();
        let level = select_level(call, sampler, texture, curve);
        sample(texture, call, sampler, level, curve).map(Prediction::Color)
    }

    /// Predicts every call independently, in parallel. Results keep the order of `calls`.
    pub fn predict_batch(
        &self,
        texture: &Texture,
        sampler: &SamplerState,
        calls: &[SampleCall],
    ) -> Vec<Result<Prediction, OracleError>> {
        calls.par_iter().map(|call| self.predict(texture, sampler, call)).collect()
    }
}
