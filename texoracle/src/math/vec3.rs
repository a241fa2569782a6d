/// Double-precision 3-component vector, used for cube map directions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_slice(components: &[f64]) -> Self {
        Self {
            x: components.first().copied().unwrap_or(0.0),
            y: components.get(1).copied().unwrap_or(0.0),
            z: components.get(2).copied().unwrap_or(0.0),
        }
    }

    pub fn abs(self) -> Vec3 {
        Vec3 { x: self.x.abs(), y: self.y.abs(), z: self.z.abs() }
    }
}
