use super::*;
use crate::calibration::DeviceWeightCurve;
use crate::texture::*;

pub const MIN_BIAS: f64 = -16.0;
pub const MAX_BIAS: f64 = 15.99;

pub fn clamp_bias(bias: f64) -> f64 {
    bias.clamp(MIN_BIAS, MAX_BIAS)
}

/// Raw hardware LOD of a gradient pair: `0.5 * log2(max(|ddx|², |ddy|²))` after scaling every
/// axis by the level-0 size. Cube textures scale all three direction axes by the face size.
/// Zero gradients give `-inf`.
pub fn gradient_level(gradients: &Gradients, texture: &Texture) -> f64 {
    let [width, height, depth] = texture.base_size();
    let scale: [f64; 3] = match texture.dimension() {
        TextureDimension::Cube | TextureDimension::CubeArray => [width as f64; 3],
        _ => [width as f64, height as f64, depth as f64],
    };
    let squared_length = |d: &Coords| d.iter().zip(scale).map(|(c, s)| (c * s) * (c * s)).sum::<f64>();
    let longest = squared_length(&gradients.ddx).max(squared_length(&gradients.ddy));
    0.5 * longest.log2()
}

/// Level a call samples at, before mip filtering: unclamped level from the builtin, then the
/// sampler's LOD clamps, then the texture's level range.
///
/// Only gradient-derived levels (with their bias) pass through the device curve; an explicit
/// level is what the shader asked for.
pub fn select_level(
    call: &SampleCall,
    sampler: &SamplerState,
    texture: &Texture,
    curve: Option<&DeviceWeightCurve>,
) -> f64 {
    let from_gradients = |gradients: &Gradients, bias: f64| {
        let level = gradient_level(gradients, texture) + bias;
        match curve {
            Some(curve) => curve.gradient_to_level(level),
            None => level,
        }
    };
    let level = match call {
        SampleCall::SampleLevel { level, .. } => *level,
        SampleCall::SampleGrad { gradients, .. } => from_gradients(gradients, 0.0),
        SampleCall::Sample { derivatives, .. } | SampleCall::SampleCompare { derivatives, .. } => {
            derivatives.as_ref().map_or(0.0, |d| from_gradients(d, 0.0))
        }
        SampleCall::SampleBias { bias, derivatives, .. } => {
            let bias = clamp_bias(*bias);
            derivatives.as_ref().map_or(bias, |d| from_gradients(d, bias))
        }
        SampleCall::Gather { .. } | SampleCall::GatherCompare { .. } => 0.0,
        SampleCall::Load { level, .. } => *level as f64,
    };
    let max_level = (texture.mip_level_count() - 1) as f64;
    // max/min rather than clamp: lod_min_clamp > lod_max_clamp must not panic
    level.max(sampler.lod_min_clamp).min(sampler.lod_max_clamp).max(0.0).min(max_level)
}
