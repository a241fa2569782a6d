use crate::error::DeviceError;
use crate::sampling::{SampleCall, SamplerState};
use crate::texture::{RGBA, Texture};
use futures::future::BoxFuture;

/// Identity of a sampling device. Two handles with the same id must sample identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u64);

/// Shader stage a batch of sampling calls runs in. Devices may blend differently per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// One batch of sampling calls against one texture and sampler.
#[derive(Debug, Clone, Copy)]
pub struct SubmitRequest<'a> {
    pub stage: ShaderStage,
    pub texture: &'a Texture,
    pub sampler: &'a SamplerState,
    pub calls: &'a [SampleCall],
}

/// Device sampling service: runs the calls on a real (or emulated) sampling unit and reads
/// back one color per call, in call order.
pub trait SamplingDevice: Send + Sync {
    fn id(&self) -> DeviceId;

    fn submit<'a>(&'a self, request: SubmitRequest<'a>) -> BoxFuture<'a, Result<Vec<RGBA>, DeviceError>>;
}
