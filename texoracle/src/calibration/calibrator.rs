use super::*;
use crate::device::*;
use crate::error::{CalibrationError, DeviceError};
use crate::sampling::*;
use crate::texture::*;
use log::{debug, info, warn};

/// Probe texture: a 2x2 level 0 in solid black over a 1x1 level 1 in solid white, so the red
/// channel of any trilinear sample is the weight of level 1.
pub fn probe_texture() -> Texture {
    let descriptor = TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 2, 2).with_mip_level_count(2);
    Texture::from_fn(descriptor, |l| if l.level == 0 { RGBA::new(0.0, 0.0, 0.0, 1.0) } else { RGBA::splat(1.0) })
}

/// `probe_steps + 1` explicit-level probes followed by as many gradient probes, both spanning
/// level 0 to level 1.
pub fn probe_calls(config: &CalibrationConfig) -> Vec<SampleCall> {
    let steps = config.probe_steps;
    let at = Location::new(&[0.5, 0.5]);
    let levels = (0..=steps).map(|i| SampleCall::SampleLevel { at: at.clone(), level: i as f64 / steps as f64 });
    let gradients = (0..=steps).map(|i| {
        // the probe texture is 2 texels wide: a derivative of 2^level / 2 lands on `level`
        let d = 2f64.powf(i as f64 / steps as f64) / 2.0;
        SampleCall::SampleGrad { at: at.clone(), gradients: Gradients::new(&[d, 0.0], &[0.0, d]) }
    });
    levels.chain(gradients).collect()
}

/// Measures how `device` blends two mip levels in `stage`, once per explicit level and once per
/// gradient-derived level, and returns the validated curve.
pub async fn calibrate<D: SamplingDevice + ?Sized>(
    device: &D,
    stage: ShaderStage,
    config: &CalibrationConfig,
) -> Result<DeviceWeightCurve, CalibrationError> {
    let texture = probe_texture();
    let sampler = SamplerState::trilinear();
    let calls = probe_calls(config);
    debug!("calibrating device {:?} ({:?}) with {} probes", device.id(), stage, calls.len());

    let request = SubmitRequest { stage, texture: &texture, sampler: &sampler, calls: &calls };
    let colors = device.submit(request).await?;
    if colors.len() != calls.len() {
        return Err(DeviceError::new(format!("expected {} probe results, got {}", calls.len(), colors.len())).into());
    }

    let mut weights: Vec<f64> = colors.iter().map(|c| c.r).collect();
    let gradient_weights = weights.split_off(config.probe_steps + 1);
    match DeviceWeightCurve::new(weights, gradient_weights, config) {
        Ok(curve) => {
            info!("calibrated device {:?} ({:?}): {} samples per curve", device.id(), stage, config.probe_steps + 1);
            Ok(curve)
        }
        Err(err) => {
            warn!("rejected calibration of device {:?} ({:?}): {}", device.id(), stage, err);
            Err(err)
        }
    }
}
