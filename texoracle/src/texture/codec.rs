use super::*;
use half::f16;

/// Converts between raw texel bytes and decoded texel values for a given format.
/// Decoded values are always expanded to four channels: missing color channels are 0,
/// a missing alpha is 1.
pub trait TexelCodec: Send + Sync {
    fn decode(&self, format: TexelFormat, bytes: &[u8]) -> RGBA;
    fn encode(&self, format: TexelFormat, texel: RGBA) -> Vec<u8>;
}

/// Codec for every format in [`TexelFormat`], little-endian, no color-space conversion.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCodec;

impl TexelCodec for StandardCodec {
    fn decode(&self, format: TexelFormat, bytes: &[u8]) -> RGBA {
        let info = format.info();
        assert_eq!(bytes.len(), info.bytes_per_texel(), "texel byte size mismatch for {:?}", format);
        let mut channels = [0.0, 0.0, 0.0, 1.0];
        let width = info.bits_per_channel as usize / 8;
        for (i, channel) in channels.iter_mut().enumerate().take(info.channels as usize) {
            let raw = &bytes[i * width..(i + 1) * width];
            *channel = match (info.kind, info.bits_per_channel) {
                (NumericKind::Unorm, 8) => raw[0] as f64 / 255.0,
                (NumericKind::Unorm, 16) => bytemuck::pod_read_unaligned::<u16>(raw) as f64 / 65535.0,
                (NumericKind::Snorm, 8) => (raw[0] as i8 as f64 / 127.0).max(-1.0),
                (NumericKind::Uint, 8) => raw[0] as f64,
                (NumericKind::Sint, 8) => raw[0] as i8 as f64,
                (NumericKind::Uint, 32) => bytemuck::pod_read_unaligned::<u32>(raw) as f64,
                (NumericKind::Sint, 32) => bytemuck::pod_read_unaligned::<i32>(raw) as f64,
                (NumericKind::Float, 16) => bytemuck::pod_read_unaligned::<f16>(raw).to_f64(),
                (NumericKind::Float, 32) => bytemuck::pod_read_unaligned::<f32>(raw) as f64,
                (kind, bits) => unreachable!("no {bits}-bit {kind:?} channel in any format"),
            };
        }
        RGBA::from_array(channels)
    }

    fn encode(&self, format: TexelFormat, texel: RGBA) -> Vec<u8> {
        let info = format.info();
        let mut bytes = Vec::with_capacity(info.bytes_per_texel());
        for value in texel.to_array().into_iter().take(info.channels as usize) {
            match (info.kind, info.bits_per_channel) {
                (NumericKind::Unorm, 8) => bytes.push((value.clamp(0.0, 1.0) * 255.0).round() as u8),
                (NumericKind::Unorm, 16) => {
                    let v = (value.clamp(0.0, 1.0) * 65535.0).round() as u16;
                    bytes.extend_from_slice(bytemuck::bytes_of(&v));
                }
                (NumericKind::Snorm, 8) => bytes.push((value.clamp(-1.0, 1.0) * 127.0).round() as i8 as u8),
                (NumericKind::Uint, 8) => bytes.push(value.clamp(0.0, u8::MAX as f64) as u8),
                (NumericKind::Sint, 8) => bytes.push(value.clamp(i8::MIN as f64, i8::MAX as f64) as i8 as u8),
                (NumericKind::Uint, 32) => bytes.extend_from_slice(bytemuck::bytes_of(&(value as u32))),
                (NumericKind::Sint, 32) => bytes.extend_from_slice(bytemuck::bytes_of(&(value as i32))),
                (NumericKind::Float, 16) => bytes.extend_from_slice(bytemuck::bytes_of(&f16::from_f64(value))),
                (NumericKind::Float, 32) => bytes.extend_from_slice(bytemuck::bytes_of(&(value as f32))),
                (kind, bits) => unreachable!("no {bits}-bit {kind:?} channel in any format"),
            }
        }
        bytes
    }
}
