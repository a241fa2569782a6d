use super::*;
use arrayvec::ArrayVec;

pub const MAX_MIP_LEVELS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    D1,
    D2,
    D2Array,
    D3,
    Cube,
    CubeArray,
}

impl TextureDimension {
    /// Number of coordinate components sampling builtins take for this dimension.
    pub fn coord_components(self) -> usize {
        match self {
            TextureDimension::D1 => 1,
            TextureDimension::D2 | TextureDimension::D2Array => 2,
            TextureDimension::D3 | TextureDimension::Cube | TextureDimension::CubeArray => 3,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, TextureDimension::D2Array | TextureDimension::CubeArray)
    }

    pub fn is_cube(self) -> bool {
        matches!(self, TextureDimension::Cube | TextureDimension::CubeArray)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDescriptor {
    pub dimension: TextureDimension,
    pub format: TexelFormat,
    pub width: u32,
    pub height: u32,
    /// Depth for 3D textures, layer count for arrays and cubes (6 per cube), 1 otherwise.
    pub depth_or_layers: u32,
    pub mip_level_count: u32,
    pub sample_count: u32,
}

impl TextureDescriptor {
    pub fn d1(format: TexelFormat, width: u32) -> Self {
        Self::with_dimension(TextureDimension::D1, format, width, 1, 1)
    }

    pub fn d2(format: TexelFormat, width: u32, height: u32) -> Self {
        Self::with_dimension(TextureDimension::D2, format, width, height, 1)
    }

    pub fn d2_array(format: TexelFormat, width: u32, height: u32, layers: u32) -> Self {
        Self::with_dimension(TextureDimension::D2Array, format, width, height, layers)
    }

    pub fn d3(format: TexelFormat, width: u32, height: u32, depth: u32) -> Self {
        Self::with_dimension(TextureDimension::D3, format, width, height, depth)
    }

    pub fn cube(format: TexelFormat, size: u32) -> Self {
        Self::with_dimension(TextureDimension::Cube, format, size, size, 6)
    }

    pub fn cube_array(format: TexelFormat, size: u32, cubes: u32) -> Self {
        Self::with_dimension(TextureDimension::CubeArray, format, size, size, cubes * 6)
    }

    fn with_dimension(dimension: TextureDimension, format: TexelFormat, width: u32, height: u32, depth: u32) -> Self {
        Self { dimension, format, width, height, depth_or_layers: depth, mip_level_count: 1, sample_count: 1 }
    }

    pub fn with_mip_level_count(mut self, count: u32) -> Self {
        self.mip_level_count = count;
        self
    }

    /// Full mip chain down to 1x1(x1).
    pub fn with_full_mip_chain(mut self) -> Self {
        self.mip_level_count = self.max_mip_level_count();
        self
    }

    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    pub fn max_mip_level_count(&self) -> u32 {
        let mut largest = self.width;
        if self.dimension != TextureDimension::D1 {
            largest = largest.max(self.height);
        }
        if self.dimension == TextureDimension::D3 {
            largest = largest.max(self.depth_or_layers);
        }
        (32 - largest.leading_zeros()).min(MAX_MIP_LEVELS as u32)
    }

    /// Size of `level` following the mip pyramid rules: every axis halves and floors at 1,
    /// except that layers never shrink and 1D textures stay 1 texel tall and deep.
    pub fn level_size(&self, level: u32) -> [u32; 3] {
        let shrink = |v: u32| (v >> level).max(1);
        let height = if self.dimension == TextureDimension::D1 { 1 } else { shrink(self.height) };
        let depth = match self.dimension {
            TextureDimension::D3 => shrink(self.depth_or_layers),
            _ => self.depth_or_layers,
        };
        [shrink(self.width), height, depth]
    }

    pub fn layer_count(&self) -> u32 {
        match self.dimension {
            TextureDimension::D3 => 1,
            _ => self.depth_or_layers,
        }
    }

    fn validate(&self) {
        assert!(self.width > 0);
        assert!(self.height > 0);
        assert!(self.depth_or_layers > 0);
        assert!(self.sample_count > 0);
        assert!(self.mip_level_count > 0 && self.mip_level_count <= self.max_mip_level_count());
        match self.dimension {
            TextureDimension::D1 => assert!(self.height == 1 && self.depth_or_layers == 1),
            TextureDimension::D2 => assert_eq!(self.depth_or_layers, 1),
            TextureDimension::Cube => {
                assert_eq!(self.width, self.height);
                assert_eq!(self.depth_or_layers, 6);
            }
            TextureDimension::CubeArray => {
                assert_eq!(self.width, self.height);
                assert_eq!(self.depth_or_layers % 6, 0);
            }
            TextureDimension::D2Array | TextureDimension::D3 => {}
        }
        if self.sample_count > 1 {
            assert_eq!(self.dimension, TextureDimension::D2);
            assert_eq!(self.mip_level_count, 1);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mip {
    pub width: u32,
    pub height: u32,
    pub depth_or_layers: u32,
    pub offset: usize,
}

impl Mip {
    pub fn size(&self) -> [u32; 3] {
        [self.width, self.height, self.depth_or_layers]
    }
}

/// Position of one texel (or one sample of a multisampled texel) in a texture.
/// `z` is the depth slice for 3D textures and the layer for arrays and cubes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TexelLocation {
    pub level: u32,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub sample: u32,
}

impl TexelLocation {
    pub fn new(level: u32, x: u32, y: u32, z: u32) -> Self {
        Self { level, x, y, z, sample: 0 }
    }
}

/// Flat index of a texel in the packed storage of a [`Texture`].
pub type TexelId = usize;

/// Immutable multi-level texture. All levels (and all layers and samples) live in one texel
/// vector; level `n` starts at `mips[n].offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub descriptor: TextureDescriptor,
    pub mips: ArrayVec<Mip, MAX_MIP_LEVELS>,
    pub texels: Vec<RGBA>,
}

impl Texture {
    /// Wraps already-decoded texels, level 0 first, each level in z, y, x, sample order.
    pub fn new(descriptor: TextureDescriptor, texels: Vec<RGBA>) -> Self {
        descriptor.validate();
        let (mips, total) = Self::layout(&descriptor);
        assert_eq!(texels.len(), total, "texel count doesn't match the texture layout");
        Self { descriptor, mips, texels }
    }

    pub fn from_fn(descriptor: TextureDescriptor, f: impl Fn(TexelLocation) -> RGBA) -> Self {
        descriptor.validate();
        let (mips, total) = Self::layout(&descriptor);
        let mut texture = Self { descriptor, mips, texels: Vec::with_capacity(total) };
        for id in 0..total {
            let location = texture.locate(id);
            texture.texels.push(f(location));
        }
        texture
    }

    /// Decodes raw texel bytes for all levels with `codec`.
    pub fn from_bytes(descriptor: TextureDescriptor, bytes: &[u8], codec: &dyn TexelCodec) -> Self {
        let bpp = descriptor.format.info().bytes_per_texel();
        assert_eq!(bytes.len() % bpp, 0);
        let texels = bytes.chunks_exact(bpp).map(|raw| codec.decode(descriptor.format, raw)).collect();
        Self::new(descriptor, texels)
    }

    /// Takes level 0 and bakes the remaining levels by averaging 2x2 (2x2x2 for 3D) footprints.
    pub fn with_generated_mips(descriptor: TextureDescriptor, base: &[RGBA]) -> Self {
        descriptor.validate();
        let (mips, total) = Self::layout(&descriptor);
        let base_len = mips.get(1).map_or(total, |m| m.offset);
        assert_eq!(base.len(), base_len);

        let mut texels = vec![RGBA::ZERO; total];
        texels[..base.len()].copy_from_slice(base);

        let is_3d = descriptor.dimension == TextureDimension::D3;
        for level in 1..mips.len() {
            let src_mip = mips[level - 1];
            let dst_mip = mips[level];
            let (done, rest) = texels.split_at_mut(dst_mip.offset);
            let src = &done[src_mip.offset..];
            let src_at = |x: u32, y: u32, z: u32| {
                let x = x.min(src_mip.width - 1) as usize;
                let y = y.min(src_mip.height - 1) as usize;
                let z = z.min(src_mip.depth_or_layers - 1) as usize;
                src[(z * src_mip.height as usize + y) * src_mip.width as usize + x]
            };
            for z in 0..dst_mip.depth_or_layers {
                for y in 0..dst_mip.height {
                    for x in 0..dst_mip.width {
                        let mut sum = RGBA::ZERO;
                        let mut count = 0.0;
                        let dz_range = if is_3d { 0..2 } else { 0..1 };
                        for dz in dz_range {
                            for dy in 0..2 {
                                for dx in 0..2 {
                                    let sz = if is_3d { z * 2 + dz } else { z };
                                    sum = sum + src_at(x * 2 + dx, y * 2 + dy, sz);
                                    count += 1.0;
                                }
                            }
                        }
                        let index = ((z * dst_mip.height + y) * dst_mip.width + x) as usize;
                        rest[index] = sum * (1.0 / count);
                    }
                }
            }
        }
        Self { descriptor, mips, texels }
    }

    fn layout(descriptor: &TextureDescriptor) -> (ArrayVec<Mip, MAX_MIP_LEVELS>, usize) {
        let mut mips = ArrayVec::new();
        let mut total = 0usize;
        for level in 0..descriptor.mip_level_count {
            let [width, height, depth_or_layers] = descriptor.level_size(level);
            mips.push(Mip { width, height, depth_or_layers, offset: total });
            total += width as usize * height as usize * depth_or_layers as usize * descriptor.sample_count as usize;
        }
        (mips, total)
    }

    pub fn format(&self) -> TexelFormat {
        self.descriptor.format
    }

    pub fn dimension(&self) -> TextureDimension {
        self.descriptor.dimension
    }

    pub fn mip_level_count(&self) -> u32 {
        self.mips.len() as u32
    }

    pub fn level(&self, level: u32) -> &Mip {
        &self.mips[level as usize]
    }

    pub fn base_size(&self) -> [u32; 3] {
        self.mips[0].size()
    }

    pub fn layer_count(&self) -> u32 {
        self.descriptor.layer_count()
    }

    pub fn sample_count(&self) -> u32 {
        self.descriptor.sample_count
    }

    pub fn texel_count(&self) -> usize {
        self.texels.len()
    }

    pub fn contains(&self, location: TexelLocation) -> bool {
        match self.mips.get(location.level as usize) {
            Some(mip) => {
                location.x < mip.width
                    && location.y < mip.height
                    && location.z < mip.depth_or_layers
                    && location.sample < self.descriptor.sample_count
            }
            None => false,
        }
    }

    pub fn index(&self, location: TexelLocation) -> TexelId {
        debug_assert!(self.contains(location), "{:?} is outside the texture", location);
        let mip = &self.mips[location.level as usize];
        let texel = (location.z as usize * mip.height as usize + location.y as usize) * mip.width as usize
            + location.x as usize;
        mip.offset + texel * self.descriptor.sample_count as usize + location.sample as usize
    }

    pub fn locate(&self, id: TexelId) -> TexelLocation {
        let level = self.mips.iter().rposition(|mip| mip.offset <= id).unwrap_or(0);
        let mip = &self.mips[level];
        let samples = self.descriptor.sample_count as usize;
        let local = id - mip.offset;
        let sample = local % samples;
        let texel = local / samples;
        let x = texel % mip.width as usize;
        let y = (texel / mip.width as usize) % mip.height as usize;
        let z = texel / (mip.width as usize * mip.height as usize);
        TexelLocation { level: level as u32, x: x as u32, y: y as u32, z: z as u32, sample: sample as u32 }
    }

    pub fn texel(&self, location: TexelLocation) -> RGBA {
        self.texels[self.index(location)]
    }

    /// Same layout, texels replaced by `f(id, texel)`.
    pub fn map_texels(&self, f: impl Fn(TexelId, RGBA) -> RGBA) -> Texture {
        let texels = self.texels.iter().enumerate().map(|(id, &texel)| f(id, texel)).collect();
        Texture { descriptor: self.descriptor, mips: self.mips.clone(), texels }
    }
}
