use super::*;
use crate::sampling::{Prediction, SampleCall};
use crate::texture::*;
use log::warn;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDiff {
    pub channel: usize,
    pub expected: f64,
    pub observed: f64,
    pub ulp_diff: u64,
    pub abs_diff: f64,
    pub within_tolerance: bool,
}

/// Everything known about a failed comparison. `expected` is `None` for out-of-bounds loads,
/// whose channel diffs are measured against the zero color.
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchDetails {
    pub builtin: &'static str,
    pub expected: Option<RGBA>,
    pub observed: RGBA,
    pub channels: Vec<ChannelDiff>,
}

impl MismatchDetails {
    pub fn report_to(&self, reporter: &mut impl TableReporter) {
        let columns = [
            Column::left("channel"),
            Column::right("expected"),
            Column::right("observed"),
            Column::right("ulps"),
            Column::right("abs diff"),
            Column::left("ok"),
        ];
        let rows: Vec<Vec<String>> = self
            .channels
            .iter()
            .map(|c| {
                vec![
                    ["r", "g", "b", "a"][c.channel].to_string(),
                    format!("{:.6}", c.expected),
                    format!("{:.6}", c.observed),
                    c.ulp_diff.to_string(),
                    format!("{:.6}", c.abs_diff),
                    if c.within_tolerance { "yes" } else { "NO" }.to_string(),
                ]
            })
            .collect();
        reporter.report(&columns, &rows);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Ok,
    Mismatch(MismatchDetails),
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Ok)
    }
}

/// Channels that carry meaning for a call: only `r` for depth and stencil reads, except gathers,
/// which spread four taps over all channels.
pub fn checked_channels(texture: &Texture, call: &SampleCall) -> Range<usize> {
    if texture.format().info().is_depth_or_stencil() && !call.is_gather() {
        0..1
    } else {
        0..4
    }
}

/// Encoding the observed channels are measured in; comparison results are plain f32 values.
pub fn result_encoding(texture: &Texture, call: &SampleCall) -> UlpEncoding {
    if call.is_comparison() { UlpEncoding::Float32 } else { UlpEncoding::for_format(texture.format()) }
}

fn channel_diffs(
    expected: RGBA,
    observed: RGBA,
    channels: Range<usize>,
    encoding: UlpEncoding,
    tolerance: &Tolerance,
) -> Vec<ChannelDiff> {
    channels
        .map(|channel| {
            let (e, o) = (expected.channel(channel), observed.channel(channel));
            ChannelDiff {
                channel,
                expected: e,
                observed: o,
                ulp_diff: ulp_distance(e, o, encoding),
                abs_diff: (e - o).abs(),
                within_tolerance: tolerance.accepts(e, o, encoding),
            }
        })
        .collect()
}

pub fn verify(
    texture: &Texture,
    call: &SampleCall,
    predicted: &Prediction,
    observed: RGBA,
    tolerance: &Tolerance,
) -> Verdict {
    let channels = checked_channels(texture, call);
    let encoding = result_encoding(texture, call);
    let matches = |expected: RGBA| {
        channels.clone().all(|c| tolerance.accepts(expected.channel(c), observed.channel(c), encoding))
    };

    match predicted {
        Prediction::Color(expected) => {
            if matches(*expected) {
                return Verdict::Ok;
            }
            Verdict::Mismatch(MismatchDetails {
                builtin: call.name(),
                expected: Some(*expected),
                observed,
                channels: channel_diffs(*expected, observed, channels, encoding, tolerance),
            })
        }
        Prediction::OutOfBounds => {
            let zero = texture.format().zero_color();
            if matches(zero) || texture.texels.iter().any(|&texel| matches(texel)) {
                return Verdict::Ok;
            }
            Verdict::Mismatch(MismatchDetails {
                builtin: call.name(),
                expected: None,
                observed,
                channels: channel_diffs(zero, observed, channels, encoding, tolerance),
            })
        }
    }
}

/// Verifies a batch; returns the index and details of every mismatch, logging each one.
pub fn verify_batch(
    texture: &Texture,
    calls: &[SampleCall],
    predicted: &[Prediction],
    observed: &[RGBA],
    tolerance: &Tolerance,
) -> Vec<(usize, MismatchDetails)> {
    assert_eq!(calls.len(), predicted.len());
    assert_eq!(calls.len(), observed.len());
    let mut mismatches = Vec::new();
    for (index, ((call, predicted), &observed)) in calls.iter().zip(predicted).zip(observed).enumerate() {
        if let Verdict::Mismatch(details) = verify(texture, call, predicted, observed, tolerance) {
            warn!(
                "call {index} ({}) mismatched: expected {:?}, observed {:?}",
                details.builtin, details.expected, details.observed
            );
            mismatches.push((index, details));
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::Location;

    fn level_call() -> SampleCall {
        SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]), level: 0.0 }
    }

    fn rgba8(texels: &[RGBA]) -> Texture {
        Texture::new(TextureDescriptor::d2(TexelFormat::Rgba8Unorm, texels.len() as u32, 1), texels.to_vec())
    }

    #[test]
    fn test_exact_match_is_ok() {
        let texture = rgba8(&[RGBA::splat(0.5)]);
        let tolerance = Tolerance::for_format(TexelFormat::Rgba8Unorm);
        let verdict = verify(&texture, &level_call(), &Prediction::Color(RGBA::splat(0.5)), RGBA::splat(0.5), &tolerance);
        assert!(verdict.is_ok());
    }

    #[test]
    fn test_mismatch_lists_every_checked_channel() {
        let texture = rgba8(&[RGBA::splat(0.5)]);
        let tolerance = Tolerance::for_format(TexelFormat::Rgba8Unorm);
        let observed = RGBA::new(0.5, 1.0, 0.5, 0.5);
        let Verdict::Mismatch(details) = verify(&texture, &level_call(), &Prediction::Color(RGBA::splat(0.5)), observed, &tolerance)
        else {
            panic!("expected a mismatch");
        };
        assert_eq!(details.channels.len(), 4);
        assert!(!details.channels[1].within_tolerance);
        assert!(details.channels[0].within_tolerance);
        assert_eq!(details.channels[1].ulp_diff, 127);
    }

    #[test]
    fn test_depth_checks_only_red_unless_gathering() {
        let texture = Texture::new(TextureDescriptor::d2(TexelFormat::Depth32Float, 1, 1), vec![RGBA::new(0.5, 0.0, 0.0, 1.0)]);
        let tolerance = Tolerance::for_format(TexelFormat::Depth32Float);
        let predicted = Prediction::Color(RGBA::new(0.5, 0.0, 0.0, 1.0));
        let garbage_in_gba = RGBA::new(0.5, 7.0, 7.0, 7.0);
        assert!(verify(&texture, &level_call(), &predicted, garbage_in_gba, &tolerance).is_ok());
        let gather = SampleCall::Gather { at: Location::new(&[0.5, 0.5]), component: 0 };
        assert!(!verify(&texture, &gather, &predicted, garbage_in_gba, &tolerance).is_ok());
    }

    #[test]
    fn test_out_of_bounds_accepts_zero_or_any_texel() {
        let texture = rgba8(&[RGBA::new(0.2, 0.4, 0.6, 0.8), RGBA::new(1.0, 0.0, 1.0, 0.0)]);
        let call = SampleCall::Load { at: [-1, 0].into_iter().collect(), level: 0, array_index: None, sample_index: None };
        let tolerance = Tolerance::for_format(TexelFormat::Rgba8Unorm);
        let check = |observed| verify(&texture, &call, &Prediction::OutOfBounds, observed, &tolerance);
        assert!(check(RGBA::ZERO).is_ok());
        assert!(check(RGBA::new(1.0, 0.0, 1.0, 0.0)).is_ok());
        assert!(check(RGBA::new(0.2, 0.4, 0.6, 0.8)).is_ok());
        match check(RGBA::new(0.3, 0.3, 0.3, 0.3)) {
            Verdict::Mismatch(details) => assert_eq!(details.expected, None),
            Verdict::Ok => panic!("expected a mismatch"),
        }
    }

    #[test]
    fn test_verify_batch_reports_indices() {
        let texture = rgba8(&[RGBA::splat(0.5)]);
        let calls = vec![level_call(), level_call(), level_call()];
        let predicted = vec![Prediction::Color(RGBA::splat(0.5)); 3];
        let observed = vec![RGBA::splat(0.5), RGBA::splat(0.0), RGBA::splat(0.5)];
        let mismatches = verify_batch(&texture, &calls, &predicted, &observed, &Tolerance::for_format(TexelFormat::Rgba8Unorm));
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].0, 1);
    }

    #[test]
    fn test_mismatch_table() {
        let details = MismatchDetails {
            builtin: "textureSampleLevel",
            expected: Some(RGBA::splat(0.5)),
            observed: RGBA::splat(0.25),
            channels: vec![ChannelDiff {
                channel: 0,
                expected: 0.5,
                observed: 0.25,
                ulp_diff: 64,
                abs_diff: 0.25,
                within_tolerance: false,
            }],
        };
        let mut table = PlainTextTable::new();
        details.report_to(&mut table);
        let lines: Vec<&str> = table.output().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("channel"));
        assert!(lines[2].starts_with("r "));
        assert!(lines[2].ends_with("NO"));
    }
}
