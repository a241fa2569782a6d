use bytemuck::{Pod, Zeroable};

/// A decoded texel or sampled color. Float and normalized formats carry their float value,
/// integer formats carry the integer exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default, Zeroable, Pod)]
pub struct RGBA {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl RGBA {
    pub const ZERO: RGBA = RGBA::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn splat(v: f64) -> Self {
        Self { r: v, g: v, b: v, a: v }
    }

    pub fn to_array(&self) -> [f64; 4] {
        bytemuck::cast(*self)
    }

    pub fn from_array(channels: [f64; 4]) -> Self {
        bytemuck::cast(channels)
    }

    pub fn channel(&self, index: usize) -> f64 {
        self.to_array()[index]
    }
}

// RGBA + RGBA
impl std::ops::Add for RGBA {
    type Output = RGBA;
    fn add(self, other: RGBA) -> RGBA {
        RGBA { r: self.r + other.r, g: self.g + other.g, b: self.b + other.b, a: self.a + other.a }
    }
}

// RGBA * f64
impl std::ops::Mul<f64> for RGBA {
    type Output = RGBA;
    fn mul(self, scalar: f64) -> RGBA {
        RGBA { r: self.r * scalar, g: self.g * scalar, b: self.b * scalar, a: self.a * scalar }
    }
}
