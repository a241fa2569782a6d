use crate::texture::CubeFace;
use thiserror::Error;

/// Failures of the pure sampling math.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The call's coordinates, levels, offsets or builtin don't fit the texture or sampler.
    #[error("invalid call shape: {reason}")]
    InvalidCallShape { reason: String },

    /// A linear cube sample needs the texel diagonally across a cube corner, which three faces share.
    #[error("linear cube sample at {face:?} texel ({x}, {y}) touches a corner shared by three faces")]
    DegenerateCubeCorner { face: CubeFace, x: i64, y: i64 },
}

impl OracleError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        OracleError::InvalidCallShape { reason: reason.into() }
    }
}

/// Failure reported by the external device sampling service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("device sampling failed: {message}")]
pub struct DeviceError {
    pub message: String,
}

impl DeviceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// The measured curve is not a plausible blend curve; the device or harness is broken.
    #[error("calibration invariant violated in {curve} curve: {reason}")]
    InvariantViolation { curve: &'static str, reason: String },

    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticError {
    #[error("texel bisection is not supported for {builtin} calls")]
    Unsupported { builtin: &'static str },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}
