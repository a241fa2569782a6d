use super::*;
use crate::device::*;
use crate::error::CalibrationError;
use crate::sampling::SamplingOracle;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type PendingCurve = Shared<BoxFuture<'static, Result<Arc<DeviceWeightCurve>, CalibrationError>>>;

/// Calibration results per device and shader stage.
///
/// The first request for a key starts the calibration; every concurrent request for the same
/// key awaits that same computation. Finished curves stay cached until their device is
/// forgotten. A failed calibration is dropped from the cache, so the next request starts over.
pub struct CalibrationCache {
    config: CalibrationConfig,
    entries: Mutex<HashMap<(DeviceId, ShaderStage), PendingCurve>>,
}

impl Default for CalibrationCache {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

impl CalibrationCache {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config, entries: Mutex::new(HashMap::new()) }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub async fn curve_for<D: SamplingDevice + ?Sized + 'static>(
        &self,
        device: &Arc<D>,
        stage: ShaderStage,
    ) -> Result<Arc<DeviceWeightCurve>, CalibrationError> {
        let key = (device.id(), stage);
        let pending = {
            let mut entries = self.entries.lock();
            entries
                .entry(key)
                .or_insert_with(|| {
                    debug!("starting calibration of {:?} ({:?})", key.0, stage);
                    let device = Arc::clone(device);
                    let config = self.config.clone();
                    async move { calibrate(&*device, stage, &config).await.map(Arc::new) }.boxed().shared()
                })
                .clone()
        };

        let result = pending.clone().await;
        if result.is_err() {
            let mut entries = self.entries.lock();
            // a retry may already have replaced the failed entry
            if entries.get(&key).is_some_and(|current| current.ptr_eq(&pending)) {
                entries.remove(&key);
            }
        }
        result
    }

    /// Curve of a finished, successful calibration, without starting one.
    pub fn peek(&self, device: DeviceId, stage: ShaderStage) -> Option<Arc<DeviceWeightCurve>> {
        let entries = self.entries.lock();
        entries.get(&(device, stage))?.peek()?.as_ref().ok().cloned()
    }

    /// Drops every curve of a device whose handle is gone.
    pub fn forget_device(&self, device: DeviceId) {
        self.entries.lock().retain(|(id, _), _| *id != device);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An oracle calibrated for `device` in `stage`.
    pub async fn oracle_for<D: SamplingDevice + ?Sized + 'static>(
        &self,
        device: &Arc<D>,
        stage: ShaderStage,
    ) -> Result<SamplingOracle, CalibrationError> {
        let curve = self.curve_for(device, stage).await?;
        Ok(SamplingOracle::new(Some(curve)))
    }
}
