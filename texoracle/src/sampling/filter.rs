use super::*;
use crate::calibration::DeviceWeightCurve;
use crate::error::OracleError;
use crate::math::*;
use crate::texture::*;
use arrayvec::ArrayVec;

/// Taps of one filtered lookup in footprint order: tap `bx + 2 * by + 4 * bz` sits at the
/// lower (0) or upper (1) texel on each axis. `None` marks the missing texel of a cube corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub taps: ArrayVec<Option<TexelLocation>, 8>,
    /// Position between the lower and upper texel per filtered axis.
    pub fractions: ArrayVec<f64, 3>,
}

impl Footprint {
    fn single(location: TexelLocation) -> Self {
        let mut taps = ArrayVec::new();
        taps.push(Some(location));
        Self { taps, fractions: ArrayVec::new() }
    }

    /// Product weight of tap `index`.
    pub fn weight(&self, index: usize) -> f64 {
        self.fractions
            .iter()
            .enumerate()
            .map(|(axis, &t)| if (index >> axis) & 1 == 1 { t } else { 1.0 - t })
            .product()
    }

    /// Blends the tap values axis by axis with nested lerps, so equal taps reproduce their
    /// value exactly.
    fn reduce(&self, value: impl Fn(Option<TexelLocation>) -> RGBA) -> RGBA {
        let mut values: ArrayVec<RGBA, 8> = self.taps.iter().map(|&tap| value(tap)).collect();
        for &t in &self.fractions {
            values = values.chunks_exact(2).map(|pair| lerp(pair[0], pair[1], t)).collect();
        }
        values[0]
    }
}

pub fn lerp(a: RGBA, b: RGBA, t: f64) -> RGBA {
    RGBA::new(a.r + (b.r - a.r) * t, a.g + (b.g - a.g) * t, a.b + (b.b - a.b) * t, a.a + (b.a - a.a) * t)
}

/// Computes the color of any sampling builtin but `Load` at an already selected level.
pub fn sample(
    texture: &Texture,
    call: &SampleCall,
    sampler: &SamplerState,
    level: f64,
    curve: Option<&DeviceWeightCurve>,
) -> Result<RGBA, OracleError> {
    let Some(at) = call.location() else {
        return Err(OracleError::shape("textureLoad has no sampling location"));
    };
    let tap_value = tap_transform(texture, call, sampler);

    if let SampleCall::Gather { component, .. } = call {
        return gather(texture, at, sampler, *component as usize, &tap_value);
    }
    if let SampleCall::GatherCompare { .. } = call {
        return gather(texture, at, sampler, 0, &tap_value);
    }

    let filter = sampler.filter_for_level(level);
    let sample_at = |level: u32| -> Result<RGBA, OracleError> {
        let footprint = footprint(texture, at, sampler, level, filter)?;
        Ok(footprint.reduce(|tap| tap.map_or(RGBA::ZERO, |location| tap_value(texture.texel(location)))))
    };

    let max_level = texture.mip_level_count() - 1;
    let level = level.max(0.0).min(max_level as f64);
    let lower = level.floor();
    let fraction = level - lower;
    let lower = lower as u32;
    let upper = (lower + 1).min(max_level);
    let mix = |fraction: f64| curve.map_or(fraction, |curve| curve.mip_mix(fraction));
    match sampler.mipmap_filter {
        FilterMode::Nearest => {
            // ties resolve toward the lower level unless the device curve says otherwise
            let chosen = if fraction > 0.0 && mix(fraction) > 0.5 { upper } else { lower };
            sample_at(chosen)
        }
        FilterMode::Linear => {
            if fraction == 0.0 {
                return sample_at(lower);
            }
            Ok(lerp(sample_at(lower)?, sample_at(upper)?, mix(fraction)))
        }
    }
}

/// Turns a raw texel into what filtering blends: the texel itself, or a 0/1 comparison result.
fn tap_transform(texture: &Texture, call: &SampleCall, sampler: &SamplerState) -> impl Fn(RGBA) -> RGBA {
    let comparison = match (call.depth_ref(), sampler.compare) {
        (Some(reference), Some(function)) => {
            let reference = match texture.format().info().kind {
                NumericKind::Unorm => reference.clamp(0.0, 1.0),
                _ => reference,
            };
            Some((function, reference))
        }
        _ => None,
    };
    move |texel: RGBA| match comparison {
        Some((function, reference)) => {
            let passed = if function.passes(reference, texel.r) { 1.0 } else { 0.0 };
            RGBA::new(passed, 0.0, 0.0, 1.0)
        }
        None => texel,
    }
}

fn gather(
    texture: &Texture,
    at: &Location,
    sampler: &SamplerState,
    component: usize,
    tap_value: &impl Fn(RGBA) -> RGBA,
) -> Result<RGBA, OracleError> {
    let footprint = footprint(texture, at, sampler, 0, FilterMode::Linear)?;
    let value = |index: usize| match footprint.taps[index] {
        Some(location) => tap_value(texture.texel(location)).channel(component),
        None => 0.0,
    };
    // (u0,v1), (u1,v1), (u1,v0), (u0,v0)
    Ok(RGBA::new(value(2), value(3), value(1), value(0)))
}

/// Texels (and their fractional positions) one lookup at `level` reads.
pub fn footprint(
    texture: &Texture,
    at: &Location,
    sampler: &SamplerState,
    level: u32,
    filter: FilterMode,
) -> Result<Footprint, OracleError> {
    if texture.dimension().is_cube() {
        return cube_footprint(texture, at, level, filter);
    }
    let dimension = texture.dimension();
    let mip = *texture.level(level);
    let size = mip.size();
    let axes = dimension.coord_components();
    let layer = match dimension {
        TextureDimension::D2Array => array_layer(at.array_index, texture.layer_count()),
        _ => 0,
    };
    let texel_space = |axis: usize| {
        let offset = at.offset.as_ref().map_or(0, |o| o[axis]) as f64;
        at.coords[axis] * size[axis] as f64 - 0.5 + offset
    };
    let location_of = |texel: [i64; 3]| {
        let z = if dimension == TextureDimension::D3 { texel[2] as u32 } else { layer };
        TexelLocation::new(level, texel[0] as u32, texel[1] as u32, z)
    };

    match filter {
        FilterMode::Nearest => {
            let mut texel = [0i64; 3];
            for (axis, t) in texel.iter_mut().enumerate().take(axes) {
                // half away from zero: u = 0 sits at -0.5 and picks texel -1
                *t = resolve(sampler.address_mode(axis), size[axis], texel_space(axis).round() as i64);
            }
            Ok(Footprint::single(location_of(texel)))
        }
        FilterMode::Linear => {
            let mut lower = [0i64; 3];
            let mut fractions = ArrayVec::new();
            for (axis, l) in lower.iter_mut().enumerate().take(axes) {
                let at = texel_space(axis);
                let floor = at.floor();
                *l = floor as i64;
                fractions.push(finite_or_zero(at - floor));
            }
            let mut taps = ArrayVec::new();
            for index in 0..1usize << axes {
                let mut texel = [0i64; 3];
                for axis in 0..axes {
                    let raw = lower[axis].saturating_add(((index >> axis) & 1) as i64);
                    texel[axis] = resolve(sampler.address_mode(axis), size[axis], raw);
                }
                taps.push(Some(location_of(texel)));
            }
            Ok(Footprint { taps, fractions })
        }
    }
}

/// Infinite coordinates floor to a saturated texel with a NaN fraction; they sample that texel alone.
fn finite_or_zero(fraction: f64) -> f64 {
    if fraction.is_finite() { fraction } else { 0.0 }
}

fn array_layer(index: Option<i32>, layers: u32) -> u32 {
    index.unwrap_or(0).clamp(0, layers as i32 - 1) as u32
}

fn cube_footprint(texture: &Texture, at: &Location, level: u32, filter: FilterMode) -> Result<Footprint, OracleError> {
    let size = texture.level(level).width;
    let cube = match texture.dimension() {
        TextureDimension::CubeArray => array_layer(at.array_index, texture.layer_count() / 6),
        _ => 0,
    };
    let (face, u, v) = direction_to_face_uv(Vec3::from_slice(&at.coords));
    let tx = u * size as f64 - 0.5;
    let ty = v * size as f64 - 0.5;
    let last = size as i64 - 1;
    let location_of = |face: CubeFace, x: i64, y: i64| TexelLocation::new(level, x as u32, y as u32, cube * 6 + face.layer());

    match filter {
        FilterMode::Nearest => {
            let x = (tx.round() as i64).clamp(0, last);
            let y = (ty.round() as i64).clamp(0, last);
            Ok(Footprint::single(location_of(face, x, y)))
        }
        FilterMode::Linear => {
            let (x0, y0) = (tx.floor(), ty.floor());
            let mut fractions = ArrayVec::new();
            fractions.push(finite_or_zero(tx - x0));
            fractions.push(finite_or_zero(ty - y0));
            let (x0, y0) = (x0 as i64, y0 as i64);
            let inside = |c: i64| (0..=last).contains(&c);
            let mut footprint = Footprint { taps: ArrayVec::new(), fractions };
            for index in 0..4usize {
                let x = x0.saturating_add((index & 1) as i64);
                let y = y0.saturating_add(((index >> 1) & 1) as i64);
                if !inside(x) && !inside(y) {
                    if footprint.weight(index) != 0.0 {
                        return Err(OracleError::DegenerateCubeCorner { face, x, y });
                    }
                    footprint.taps.push(None);
                    continue;
                }
                let (face, x, y) = wrap_face_texel(face, size, x, y);
                footprint.taps.push(Some(location_of(face, x, y)));
            }
            Ok(footprint)
        }
    }
}

/// Direct texel fetch; `None` when any coordinate, the level, the layer or the sample is out of range.
pub fn load(
    texture: &Texture,
    at: &TexelCoords,
    level: i32,
    array_index: Option<i32>,
    sample_index: Option<i32>,
) -> Option<RGBA> {
    let level = u32::try_from(level).ok()?;
    if level >= texture.mip_level_count() {
        return None;
    }
    let mut texel = [0u32; 3];
    for (axis, &c) in at.iter().enumerate() {
        texel[axis] = u32::try_from(c).ok()?;
    }
    let z = match array_index {
        Some(layer) => u32::try_from(layer).ok()?,
        None => texel[2],
    };
    let sample = u32::try_from(sample_index.unwrap_or(0)).ok()?;
    let location = TexelLocation { level, x: texel[0], y: texel[1], z, sample };
    texture.contains(location).then(|| texture.texel(location))
}
