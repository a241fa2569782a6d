use super::*;
use crate::calibration::DeviceWeightCurve;
use crate::error::DeviceError;
use crate::sampling::{Prediction, SamplingOracle};
use crate::texture::RGBA;
use futures::FutureExt;
use futures::future::{BoxFuture, poll_fn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Poll;

/// A sampling device emulated with the oracle, optionally blending mips along a non-linear
/// curve the way some hardware does. Counts submissions so callers can observe how often it
/// was driven.
#[derive(Debug)]
pub struct SoftwareDevice {
    id: DeviceId,
    oracle: SamplingOracle,
    submissions: AtomicUsize,
}

impl SoftwareDevice {
    pub fn new(id: DeviceId) -> Self {
        Self { id, oracle: SamplingOracle::uncalibrated(), submissions: AtomicUsize::new(0) }
    }

    pub fn with_curve(id: DeviceId, curve: DeviceWeightCurve) -> Self {
        Self { id, oracle: SamplingOracle::new(Some(Arc::new(curve))), submissions: AtomicUsize::new(0) }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

impl SamplingDevice for SoftwareDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn submit<'a>(&'a self, request: SubmitRequest<'a>) -> BoxFuture<'a, Result<Vec<RGBA>, DeviceError>> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        async move {
            // results arrive asynchronously, like a readback
            yield_once().await;
            let SubmitRequest { texture, sampler, calls, .. } = request;
            calls
                .iter()
                .map(|call| match self.oracle.predict(texture, sampler, call) {
                    Ok(Prediction::Color(color)) => Ok(color),
                    Ok(Prediction::OutOfBounds) => Ok(texture.format().zero_color()),
                    Err(err) => Err(DeviceError::new(format!("{}: {}", call.name(), err))),
                })
                .collect()
        }
        .boxed()
    }
}

async fn yield_once() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::*;
    use crate::texture::*;

    #[test]
    fn test_submit_returns_one_color_per_call() {
        let device = SoftwareDevice::new(DeviceId(7));
        let texture = Texture::from_fn(TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 2, 2), |l| {
            RGBA::new(l.x as f64, l.y as f64, 0.0, 1.0)
        });
        let sampler = SamplerState::default();
        let calls = vec![
            SampleCall::Load { at: [1, 0].into_iter().collect(), level: 0, array_index: None, sample_index: None },
            SampleCall::Load { at: [5, 0].into_iter().collect(), level: 0, array_index: None, sample_index: None },
            SampleCall::SampleLevel { at: Location::new(&[0.9, 0.9]), level: 0.0 },
        ];
        let request = SubmitRequest { stage: ShaderStage::Fragment, texture: &texture, sampler: &sampler, calls: &calls };
        let colors = pollster::block_on(device.submit(request)).unwrap();
        assert_eq!(colors, vec![RGBA::new(1.0, 0.0, 0.0, 1.0), RGBA::ZERO, RGBA::new(1.0, 1.0, 0.0, 1.0)]);
        assert_eq!(device.submission_count(), 1);
        assert_eq!(device.id(), DeviceId(7));
    }

    #[test]
    fn test_invalid_call_fails_the_submission() {
        let device = SoftwareDevice::new(DeviceId(1));
        let texture = Texture::from_fn(TextureDescriptor::d1(TexelFormat::R8Unorm, 4), |_| RGBA::ZERO);
        let sampler = SamplerState::default();
        let calls = vec![SampleCall::Gather { at: Location::new(&[0.5]), component: 0 }];
        let request = SubmitRequest { stage: ShaderStage::Compute, texture: &texture, sampler: &sampler, calls: &calls };
        assert!(pollster::block_on(device.submit(request)).is_err());
    }
}
