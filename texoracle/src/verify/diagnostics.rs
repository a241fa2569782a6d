use super::*;
use crate::device::*;
use crate::error::{DeviceError, DiagnosticError};
use crate::sampling::*;
use crate::texture::*;
use futures::FutureExt;
use futures::future::{BoxFuture, ready};
use log::debug;
use std::ops::Range;

/// Something that can run one sampling call against an arbitrary texture: the oracle, or a
/// real device. Both go through the same bisection so their weights are comparable.
pub trait SampleEvaluator {
    fn evaluate<'a>(
        &'a mut self,
        texture: &'a Texture,
        sampler: &'a SamplerState,
        call: &'a SampleCall,
    ) -> BoxFuture<'a, Result<RGBA, DiagnosticError>>;
}

pub struct OracleEvaluator {
    oracle: SamplingOracle,
}

impl OracleEvaluator {
    pub fn new(oracle: SamplingOracle) -> Self {
        Self { oracle }
    }
}

impl SampleEvaluator for OracleEvaluator {
    fn evaluate<'a>(
        &'a mut self,
        texture: &'a Texture,
        sampler: &'a SamplerState,
        call: &'a SampleCall,
    ) -> BoxFuture<'a, Result<RGBA, DiagnosticError>> {
        let result = match self.oracle.predict(texture, sampler, call) {
            Ok(Prediction::Color(color)) => Ok(color),
            Ok(Prediction::OutOfBounds) => Ok(texture.format().zero_color()),
            Err(err) => Err(err.into()),
        };
        ready(result).boxed()
    }
}

/// Runs every evaluation as its own single-call submission. The evaluator borrows the device
/// mutably, so nothing else can submit to it while a bisection is running.
///
/// ```compile_fail
/// use texoracle::device::*;
/// use texoracle::verify::*;
///
/// let mut device = SoftwareDevice::new(DeviceId(1));
/// let first = DeviceEvaluator::new(&mut device, ShaderStage::Fragment);
/// let second = DeviceEvaluator::new(&mut device, ShaderStage::Fragment);
/// drop((first, second));
/// ```
pub struct DeviceEvaluator<'d, D: SamplingDevice + ?Sized> {
    device: &'d mut D,
    stage: ShaderStage,
}

impl<'d, D: SamplingDevice + ?Sized> DeviceEvaluator<'d, D> {
    pub fn new(device: &'d mut D, stage: ShaderStage) -> Self {
        Self { device, stage }
    }
}

impl<D: SamplingDevice + ?Sized> SampleEvaluator for DeviceEvaluator<'_, D> {
    fn evaluate<'a>(
        &'a mut self,
        texture: &'a Texture,
        sampler: &'a SamplerState,
        call: &'a SampleCall,
    ) -> BoxFuture<'a, Result<RGBA, DiagnosticError>> {
        let request = SubmitRequest { stage: self.stage, texture, sampler, calls: std::slice::from_ref(call) };
        let device = &*self.device;
        async move {
            let colors = device.submit(request).await?;
            match colors.first() {
                Some(&color) => Ok(color),
                None => Err(DeviceError::new("device returned no result").into()),
            }
        }
        .boxed()
    }
}

/// One texel that feeds the call, with the color it produces on its own when set to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub texel: TexelLocation,
    pub weight: RGBA,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagnosticReport {
    /// Contributing texels in storage order.
    pub contributions: Vec<Contribution>,
    pub round_trips: usize,
}

impl DiagnosticReport {
    pub fn weight_of(&self, texel: TexelLocation) -> Option<RGBA> {
        self.contributions.iter().find(|c| c.texel == texel).map(|c| c.weight)
    }

    pub fn total_weight(&self) -> RGBA {
        self.contributions.iter().fold(RGBA::ZERO, |sum, c| sum + c.weight)
    }

    pub fn report_to(&self, reporter: &mut impl TableReporter) {
        let columns = [
            Column::right("level"),
            Column::right("x"),
            Column::right("y"),
            Column::right("z"),
            Column::right("sample"),
            Column::right("r"),
            Column::right("g"),
            Column::right("b"),
            Column::right("a"),
        ];
        let rows: Vec<Vec<String>> = self
            .contributions
            .iter()
            .map(|c| {
                let t = c.texel;
                let mut row = vec![t.level.to_string(), t.x.to_string(), t.y.to_string(), t.z.to_string(), t.sample.to_string()];
                row.extend(c.weight.to_array().iter().map(|w| format!("{w:.6}")));
                row
            })
            .collect();
        reporter.report(&columns, &rows);
    }
}

/// Finds every texel `call` reads and its weight by bisection: each range of texels is set
/// to 1 (everything else to 0) and evaluated; ranges with a non-zero result are split until
/// single texels remain.
///
/// Comparison builtins turn texels into 0/1 before filtering, so an impulse doesn't isolate a
/// weight; they are rejected.
pub async fn diagnose<E: SampleEvaluator + ?Sized>(
    evaluator: &mut E,
    texture: &Texture,
    sampler: &SamplerState,
    call: &SampleCall,
) -> Result<DiagnosticReport, DiagnosticError> {
    if call.is_comparison() {
        return Err(DiagnosticError::Unsupported { builtin: call.name() });
    }
    let channels = if call.is_gather() { 4 } else { texture.format().info().channels as usize };
    let mut report = DiagnosticReport::default();
    let mut worklist: Vec<Range<TexelId>> = vec![0..texture.texel_count()];

    while let Some(range) = worklist.pop() {
        if range.is_empty() {
            continue;
        }
        let probe = texture.map_texels(|id, _| if range.contains(&id) { RGBA::splat(1.0) } else { RGBA::ZERO });
        let result = evaluator.evaluate(&probe, sampler, call).await?;
        report.round_trips += 1;
        if (0..channels).all(|c| result.channel(c) == 0.0) {
            continue;
        }
        if range.len() == 1 {
            let texel = texture.locate(range.start);
            debug!("{} reads {:?} with weight {:?}", call.name(), texel, result);
            report.contributions.push(Contribution { texel, weight: result });
            continue;
        }
        let middle = range.start + range.len() / 2;
        // lower half on top, so contributions come out in storage order
        worklist.push(middle..range.end);
        worklist.push(range.start..middle);
    }
    debug!(
        "{}: {} contributing texels after {} evaluations",
        call.name(),
        report.contributions.len(),
        report.round_trips
    );
    Ok(report)
}
