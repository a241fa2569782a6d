use crate::math::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn layer(self) -> u32 {
        self as u32
    }
}

/// Picks the face a direction points at and returns the normalized face coordinates.
/// Ties between major axes go to x, then y.
pub fn direction_to_face_uv(dir: Vec3) -> (CubeFace, f64, f64) {
    let a = dir.abs();
    let (face, ma, sc, tc) = if a.x >= a.y && a.x >= a.z {
        if dir.x >= 0.0 {
            (CubeFace::PositiveX, a.x, -dir.z, -dir.y)
        } else {
            (CubeFace::NegativeX, a.x, dir.z, -dir.y)
        }
    } else if a.y >= a.z {
        if dir.y >= 0.0 {
            (CubeFace::PositiveY, a.y, dir.x, dir.z)
        } else {
            (CubeFace::NegativeY, a.y, dir.x, -dir.z)
        }
    } else if dir.z >= 0.0 {
        (CubeFace::PositiveZ, a.z, dir.x, -dir.y)
    } else {
        (CubeFace::NegativeZ, a.z, -dir.x, -dir.y)
    };
    (face, 0.5 * (sc / ma + 1.0), 0.5 * (tc / ma + 1.0))
}

/// Inverse of [`direction_to_face_uv`]; `u` and `v` may lie outside `[0, 1]`.
pub fn face_uv_to_direction(face: CubeFace, u: f64, v: f64) -> Vec3 {
    let s = 2.0 * u - 1.0;
    let t = 2.0 * v - 1.0;
    match face {
        CubeFace::PositiveX => Vec3::new(1.0, -t, -s),
        CubeFace::NegativeX => Vec3::new(-1.0, -t, s),
        CubeFace::PositiveY => Vec3::new(s, 1.0, t),
        CubeFace::NegativeY => Vec3::new(s, -1.0, -t),
        CubeFace::PositiveZ => Vec3::new(s, -t, 1.0),
        CubeFace::NegativeZ => Vec3::new(-s, -t, -1.0),
    }
}

/// Moves a texel coordinate that fell off `face` onto the neighbouring face it belongs to.
/// In-face coordinates are returned unchanged. Callers must not pass coordinates outside the
/// face on both axes at once: that texel doesn't exist on any face.
pub fn wrap_face_texel(face: CubeFace, size: u32, x: i64, y: i64) -> (CubeFace, i64, i64) {
    let n = size as i64;
    if (0..n).contains(&x) && (0..n).contains(&y) {
        return (face, x, y);
    }
    let fsize = size as f64;
    let dir = face_uv_to_direction(face, (x as f64 + 0.5) / fsize, (y as f64 + 0.5) / fsize);
    let (wrapped, u, v) = direction_to_face_uv(dir);
    let to_texel = |c: f64| ((c * fsize).floor() as i64).clamp(0, n - 1);
    (wrapped, to_texel(u), to_texel(v))
}
