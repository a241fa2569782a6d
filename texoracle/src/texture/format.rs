#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    R8Unorm,
    Rg8Unorm,
    Rgba8Unorm,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,
    R16Float,
    Rgba16Float,
    R32Float,
    Rgba32Float,
    R32Uint,
    R32Sint,
    Depth16Unorm,
    Depth32Float,
    Stencil8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Float,
    Sint,
    Uint,
    Unorm,
    Snorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Color,
    Depth,
    Stencil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub channels: u8,
    pub kind: NumericKind,
    pub aspect: Aspect,
    pub bits_per_channel: u8,
}

impl FormatInfo {
    pub fn bytes_per_texel(&self) -> usize {
        self.channels as usize * self.bits_per_channel as usize / 8
    }

    pub fn has_alpha(&self) -> bool {
        self.aspect == Aspect::Color && self.channels == 4
    }

    pub fn is_depth_or_stencil(&self) -> bool {
        self.aspect != Aspect::Color
    }

    /// Whether linear min/mag/mip filtering is allowed without optional device features.
    pub fn is_filterable(&self) -> bool {
        match (self.aspect, self.kind) {
            (Aspect::Stencil, _) => false,
            (_, NumericKind::Sint | NumericKind::Uint) => false,
            (Aspect::Color, NumericKind::Float) => self.bits_per_channel <= 16,
            _ => true,
        }
    }
}

impl TexelFormat {
    pub const fn info(self) -> FormatInfo {
        use Aspect::*;
        use NumericKind::*;
        let (channels, kind, aspect, bits_per_channel) = match self {
            TexelFormat::R8Unorm => (1, Unorm, Color, 8),
            TexelFormat::Rg8Unorm => (2, Unorm, Color, 8),
            TexelFormat::Rgba8Unorm => (4, Unorm, Color, 8),
            TexelFormat::Rgba8Snorm => (4, Snorm, Color, 8),
            TexelFormat::Rgba8Uint => (4, Uint, Color, 8),
            TexelFormat::Rgba8Sint => (4, Sint, Color, 8),
            TexelFormat::R16Float => (1, Float, Color, 16),
            TexelFormat::Rgba16Float => (4, Float, Color, 16),
            TexelFormat::R32Float => (1, Float, Color, 32),
            TexelFormat::Rgba32Float => (4, Float, Color, 32),
            TexelFormat::R32Uint => (1, Uint, Color, 32),
            TexelFormat::R32Sint => (1, Sint, Color, 32),
            TexelFormat::Depth16Unorm => (1, Unorm, Depth, 16),
            TexelFormat::Depth32Float => (1, Float, Depth, 32),
            TexelFormat::Stencil8 => (1, Uint, Stencil, 8),
        };
        FormatInfo { channels, kind, aspect, bits_per_channel }
    }

    /// Color a shader reads from a texel of this format whose stored channels are all zero.
    pub fn zero_color(self) -> crate::texture::RGBA {
        let info = self.info();
        let alpha = if info.has_alpha() { 0.0 } else { 1.0 };
        crate::texture::RGBA::new(0.0, 0.0, 0.0, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TexelFormat::R8Unorm, 1)]
    #[case(TexelFormat::Rgba8Unorm, 4)]
    #[case(TexelFormat::Rgba16Float, 8)]
    #[case(TexelFormat::Rgba32Float, 16)]
    #[case(TexelFormat::Depth16Unorm, 2)]
    #[case(TexelFormat::Stencil8, 1)]
    fn bytes_per_texel(#[case] format: TexelFormat, #[case] expected: usize) {
        assert_eq!(format.info().bytes_per_texel(), expected);
    }

    #[test]
    fn filterability() {
        assert!(TexelFormat::Rgba8Unorm.info().is_filterable());
        assert!(TexelFormat::Rgba16Float.info().is_filterable());
        assert!(TexelFormat::Depth32Float.info().is_filterable());
        assert!(!TexelFormat::Rgba32Float.info().is_filterable());
        assert!(!TexelFormat::Rgba8Uint.info().is_filterable());
        assert!(!TexelFormat::Stencil8.info().is_filterable());
    }

    #[test]
    fn zero_color_alpha_depends_on_format() {
        assert_eq!(TexelFormat::Rgba8Unorm.zero_color().a, 0.0);
        assert_eq!(TexelFormat::R8Unorm.zero_color().a, 1.0);
        assert_eq!(TexelFormat::Depth16Unorm.zero_color().a, 1.0);
    }
}
