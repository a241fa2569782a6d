use crate::error::CalibrationError;

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    /// Number of intervals between level 0 and level 1; curves hold `probe_steps + 1` samples.
    pub probe_steps: usize,
    /// Minimum share of distinct values among the samples of a curve.
    pub min_distinct_ratio: f64,
    /// Maximum slope of any step, relative to the slope of the ideal linear curve.
    pub max_slope: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self { probe_steps: 64, min_distinct_ratio: 0.66, max_slope: 2.0 }
    }
}

/// How a particular device blends between two mip levels.
///
/// `mip_weights[i]` is the weight of the upper level when sampling at level `i / steps`
/// explicitly; `gradient_weights[i]` is the same weight when the level `i / steps` comes from
/// gradients instead. Both sequences start at exactly 0, end at exactly 1 and never decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceWeightCurve {
    mip_weights: Vec<f64>,
    gradient_weights: Vec<f64>,
}

impl DeviceWeightCurve {
    pub fn new(
        mip_weights: Vec<f64>,
        gradient_weights: Vec<f64>,
        config: &CalibrationConfig,
    ) -> Result<Self, CalibrationError> {
        validate_weights("mip-level", &mip_weights, config)?;
        validate_weights("gradient", &gradient_weights, config)?;
        Ok(Self { mip_weights, gradient_weights })
    }

    /// The curve of a device that blends exactly linearly.
    pub fn linear(steps: usize) -> Self {
        let weights: Vec<f64> = (0..=steps).map(|i| i as f64 / steps as f64).collect();
        Self { mip_weights: weights.clone(), gradient_weights: weights }
    }

    pub fn mip_weights(&self) -> &[f64] {
        &self.mip_weights
    }

    pub fn gradient_weights(&self) -> &[f64] {
        &self.gradient_weights
    }

    /// Weight of the upper level when blending at `fraction` between two levels.
    pub fn mip_mix(&self, fraction: f64) -> f64 {
        interpolate(&self.mip_weights, fraction)
    }

    /// Weight of the upper level when a gradient-derived level has fractional part `fraction`.
    pub fn gradient_weight(&self, fraction: f64) -> f64 {
        interpolate(&self.gradient_weights, fraction)
    }

    /// Rewrites a gradient-derived level so that blending it through [`Self::mip_mix`] yields
    /// the measured gradient weight.
    pub fn gradient_to_level(&self, level: f64) -> f64 {
        if !level.is_finite() {
            return level;
        }
        let base = level.floor();
        let fraction = level - base;
        if fraction == 0.0 {
            return level;
        }
        base + invert(&self.mip_weights, self.gradient_weight(fraction))
    }
}

fn interpolate(weights: &[f64], fraction: f64) -> f64 {
    let steps = weights.len() - 1;
    let w = fraction.clamp(0.0, 1.0) * steps as f64;
    let lower = w.floor() as usize;
    let upper = w.ceil() as usize;
    let t = w - lower as f64;
    weights[lower] + (weights[upper] - weights[lower]) * t
}

/// Smallest fraction whose interpolated weight is `target`.
fn invert(weights: &[f64], target: f64) -> f64 {
    let steps = weights.len() - 1;
    for i in 0..steps {
        let (lo, hi) = (weights[i], weights[i + 1]);
        if hi >= target {
            let t = if hi > lo { ((target - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 };
            return (i as f64 + t) / steps as f64;
        }
    }
    1.0
}

fn validate_weights(curve: &'static str, weights: &[f64], config: &CalibrationConfig) -> Result<(), CalibrationError> {
    let violation = |reason: String| CalibrationError::InvariantViolation { curve, reason };
    if weights.len() < 2 {
        return Err(violation(format!("needs at least 2 samples, got {}", weights.len())));
    }
    let first = weights[0];
    let last = weights[weights.len() - 1];
    if first != 0.0 {
        return Err(violation(format!("first sample is {first}, expected 0")));
    }
    if last != 1.0 {
        return Err(violation(format!("last sample is {last}, expected 1")));
    }
    let steps = (weights.len() - 1) as f64;
    for (i, pair) in weights.windows(2).enumerate() {
        // the ideal linear curve has slope 1 in these units
        let slope = (pair[1] - pair[0]) * steps;
        if slope.is_nan() || slope < 0.0 {
            return Err(violation(format!("decreases between samples {} and {} ({} -> {})", i, i + 1, pair[0], pair[1])));
        }
        if slope > config.max_slope {
            return Err(violation(format!(
                "slope {slope:.3} between samples {} and {} exceeds {}",
                i,
                i + 1,
                config.max_slope
            )));
        }
    }
    let mut sorted = weights.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    let ratio = sorted.len() as f64 / weights.len() as f64;
    if ratio < config.min_distinct_ratio {
        return Err(violation(format!(
            "only {} of {} samples are distinct ({:.0}%)",
            sorted.len(),
            weights.len(),
            ratio * 100.0
        )));
    }
    Ok(())
}
