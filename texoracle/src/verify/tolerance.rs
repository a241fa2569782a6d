use crate::texture::*;
use half::f16;

/// Numeric encoding a channel is stored in, for counting ULPs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UlpEncoding {
    Unorm(u8),
    Snorm(u8),
    Float16,
    Float32,
    Integer,
}

impl UlpEncoding {
    pub fn for_format(format: TexelFormat) -> Self {
        let info = format.info();
        match (info.kind, info.bits_per_channel) {
            (NumericKind::Unorm, bits) => UlpEncoding::Unorm(bits),
            (NumericKind::Snorm, bits) => UlpEncoding::Snorm(bits),
            (NumericKind::Float, 16) => UlpEncoding::Float16,
            (NumericKind::Float, _) => UlpEncoding::Float32,
            (NumericKind::Sint | NumericKind::Uint, _) => UlpEncoding::Integer,
        }
    }
}

/// Signed distance of `value` from zero, in steps of the encoding. Float encodings count
/// representable values (sign-magnitude), so adjacent floats are 1 apart across the whole range.
pub fn ulps_from_zero(value: f64, encoding: UlpEncoding) -> i64 {
    match encoding {
        UlpEncoding::Unorm(bits) => (value * ((1u64 << bits) - 1) as f64).round() as i64,
        UlpEncoding::Snorm(bits) => (value * ((1u64 << (bits - 1)) - 1) as f64).round() as i64,
        UlpEncoding::Float16 => {
            let bits = f16::from_f64(value).to_bits();
            let magnitude = (bits & 0x7fff) as i64;
            if bits & 0x8000 != 0 { -magnitude } else { magnitude }
        }
        UlpEncoding::Float32 => {
            let bits = (value as f32).to_bits();
            let magnitude = (bits & 0x7fff_ffff) as i64;
            if bits & 0x8000_0000 != 0 { -magnitude } else { magnitude }
        }
        UlpEncoding::Integer => value.round() as i64,
    }
}

/// How far an observed channel may be from the prediction: within `max_ulp_diff` steps of
/// the encoding, or within `max_fractional_diff` in absolute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub max_ulp_diff: u64,
    pub max_fractional_diff: f64,
}

impl Tolerance {
    pub fn for_format(format: TexelFormat) -> Self {
        let info = format.info();
        let max_fractional_diff = match (info.aspect, info.kind, info.bits_per_channel) {
            (Aspect::Depth, _, _) => 3.0 / 100.0,
            (Aspect::Stencil, _, _) => 0.0,
            (_, NumericKind::Unorm, 8) => 7.0 / 255.0,
            (_, NumericKind::Snorm, 8) => 7.0 / 127.0,
            (_, NumericKind::Float, _) => 6.0 / 100.0,
            (_, NumericKind::Unorm | NumericKind::Snorm, _) => 0.0,
            (_, NumericKind::Sint | NumericKind::Uint, _) => 0.0,
        };
        Self { max_ulp_diff: 3, max_fractional_diff }
    }

    pub fn accepts(&self, expected: f64, observed: f64, encoding: UlpEncoding) -> bool {
        ulp_distance(expected, observed, encoding) <= self.max_ulp_diff
            || (expected - observed).abs() <= self.max_fractional_diff
    }
}

pub fn ulp_distance(a: f64, b: f64, encoding: UlpEncoding) -> u64 {
    (ulps_from_zero(a, encoding) - ulps_from_zero(b, encoding)).unsigned_abs()
}
