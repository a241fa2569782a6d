use arrayvec::ArrayVec;

/// Normalized texture coordinates (1 to 3 components), or a cube direction.
pub type Coords = ArrayVec<f64, 3>;

/// Integer texel offset applied after unnormalizing the coordinates.
pub type Offset = ArrayVec<i32, 3>;

/// Integer texel coordinates for `Load`.
pub type TexelCoords = ArrayVec<i64, 3>;

pub fn coords(components: &[f64]) -> Coords {
    components.iter().copied().collect()
}

/// Where a sampling builtin looks: coordinates plus the optional array layer and texel offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub coords: Coords,
    pub array_index: Option<i32>,
    pub offset: Option<Offset>,
}

impl Location {
    pub fn new(components: &[f64]) -> Self {
        Self { coords: coords(components), array_index: None, offset: None }
    }

    pub fn with_array_index(mut self, index: i32) -> Self {
        self.array_index = Some(index);
        self
    }

    pub fn with_offset(mut self, offset: &[i32]) -> Self {
        self.offset = Some(offset.iter().copied().collect());
        self
    }
}

/// Screen-space derivatives of the coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub ddx: Coords,
    pub ddy: Coords,
}

impl Gradients {
    pub fn new(ddx: &[f64], ddy: &[f64]) -> Self {
        Self { ddx: coords(ddx), ddy: coords(ddy) }
    }
}

/// One sampling operation. Each builtin carries only what it reads.
///
/// Implicit derivatives (`derivatives` on `Sample`, `SampleBias` and `SampleCompare`) are the
/// quad derivatives a fragment shader would see; `None` means level 0 before bias.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleCall {
    Sample { at: Location, derivatives: Option<Gradients> },
    SampleLevel { at: Location, level: f64 },
    SampleGrad { at: Location, gradients: Gradients },
    SampleBias { at: Location, bias: f64, derivatives: Option<Gradients> },
    Gather { at: Location, component: u8 },
    GatherCompare { at: Location, depth_ref: f64 },
    SampleCompare { at: Location, depth_ref: f64, derivatives: Option<Gradients> },
    Load { at: TexelCoords, level: i32, array_index: Option<i32>, sample_index: Option<i32> },
}

impl SampleCall {
    pub fn name(&self) -> &'static str {
        match self {
            SampleCall::Sample { .. } => "textureSample",
            SampleCall::SampleLevel { .. } => "textureSampleLevel",
            SampleCall::SampleGrad { .. } => "textureSampleGrad",
            SampleCall::SampleBias { .. } => "textureSampleBias",
            SampleCall::Gather { .. } => "textureGather",
            SampleCall::GatherCompare { .. } => "textureGatherCompare",
            SampleCall::SampleCompare { .. } => "textureSampleCompare",
            SampleCall::Load { .. } => "textureLoad",
        }
    }

    /// Sampling location of every builtin but `Load`.
    pub fn location(&self) -> Option<&Location> {
        match self {
            SampleCall::Sample { at, .. }
            | SampleCall::SampleLevel { at, .. }
            | SampleCall::SampleGrad { at, .. }
            | SampleCall::SampleBias { at, .. }
            | SampleCall::Gather { at, .. }
            | SampleCall::GatherCompare { at, .. }
            | SampleCall::SampleCompare { at, .. } => Some(at),
            SampleCall::Load { .. } => None,
        }
    }

    pub fn depth_ref(&self) -> Option<f64> {
        match self {
            SampleCall::GatherCompare { depth_ref, .. } | SampleCall::SampleCompare { depth_ref, .. } => {
                Some(*depth_ref)
            }
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.depth_ref().is_some()
    }

    pub fn is_gather(&self) -> bool {
        matches!(self, SampleCall::Gather { .. } | SampleCall::GatherCompare { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl CompareFunction {
    /// Compares the call's reference value against a texel's depth: `reference OP texel`.
    pub fn passes(self, reference: f64, texel: f64) -> bool {
        match self {
            CompareFunction::Never => false,
            CompareFunction::Less => reference < texel,
            CompareFunction::Equal => reference == texel,
            CompareFunction::LessEqual => reference <= texel,
            CompareFunction::Greater => reference > texel,
            CompareFunction::NotEqual => reference != texel,
            CompareFunction::GreaterEqual => reference >= texel,
            CompareFunction::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    pub address_mode_u: crate::texture::AddressMode,
    pub address_mode_v: crate::texture::AddressMode,
    pub address_mode_w: crate::texture::AddressMode,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub mipmap_filter: FilterMode,
    pub lod_min_clamp: f64,
    pub lod_max_clamp: f64,
    pub compare: Option<CompareFunction>,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            address_mode_u: Default::default(),
            address_mode_v: Default::default(),
            address_mode_w: Default::default(),
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: FilterMode::Nearest,
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
            compare: None,
        }
    }
}

impl SamplerState {
    /// Linear min, mag and mip filtering.
    pub fn trilinear() -> Self {
        Self {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            ..Default::default()
        }
    }

    pub fn with_address_mode(mut self, mode: crate::texture::AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self.address_mode_w = mode;
        self
    }

    pub fn with_compare(mut self, compare: CompareFunction) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn address_mode(&self, axis: usize) -> crate::texture::AddressMode {
        match axis {
            0 => self.address_mode_u,
            1 => self.address_mode_v,
            _ => self.address_mode_w,
        }
    }

    pub fn uses_linear_filtering(&self) -> bool {
        self.mag_filter == FilterMode::Linear
            || self.min_filter == FilterMode::Linear
            || self.mipmap_filter == FilterMode::Linear
    }

    /// Filter for a resolved level: magnifying at or below level 0, minifying above it.
    pub fn filter_for_level(&self, level: f64) -> FilterMode {
        if level <= 0.0 { self.mag_filter } else { self.min_filter }
    }
}
