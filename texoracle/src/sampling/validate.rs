use super::*;
use crate::error::OracleError;
use crate::texture::*;

pub const MIN_TEXEL_OFFSET: i32 = -8;
pub const MAX_TEXEL_OFFSET: i32 = 7;

/// Checks that `call` can be issued against `texture` with `sampler`.
pub fn validate(texture: &Texture, sampler: &SamplerState, call: &SampleCall) -> Result<(), OracleError> {
    let dimension = texture.dimension();
    let info = texture.format().info();
    let components = dimension.coord_components();

    if let SampleCall::Load { at, array_index, sample_index, .. } = call {
        if dimension.is_cube() {
            return Err(OracleError::shape("textureLoad doesn't take cube textures"));
        }
        check_count("texel coordinate", at.len(), components)?;
        check_array_index(dimension, array_index.is_some())?;
        let multisampled = texture.sample_count() > 1;
        if sample_index.is_some() != multisampled {
            return Err(OracleError::shape(if multisampled {
                "multisampled textureLoad needs a sample index"
            } else {
                "sample index given for a single-sampled texture"
            }));
        }
        return Ok(());
    }

    if texture.sample_count() > 1 {
        return Err(OracleError::shape(format!("{} can't read a multisampled texture", call.name())));
    }

    let Some(at) = call.location() else {
        unreachable!("every builtin but textureLoad has a location");
    };
    check_count("coordinate", at.coords.len(), components)?;
    check_array_index(dimension, at.array_index.is_some())?;
    if let Some(offset) = &at.offset {
        if dimension.is_cube() {
            return Err(OracleError::shape("texel offsets aren't allowed on cube textures"));
        }
        check_count("offset", offset.len(), components)?;
        if let Some(bad) = offset.iter().find(|o| !(MIN_TEXEL_OFFSET..=MAX_TEXEL_OFFSET).contains(*o)) {
            return Err(OracleError::shape(format!(
                "texel offset {bad} is outside [{MIN_TEXEL_OFFSET}, {MAX_TEXEL_OFFSET}]"
            )));
        }
    }
    match call {
        SampleCall::SampleGrad { gradients, .. }
        | SampleCall::Sample { derivatives: Some(gradients), .. }
        | SampleCall::SampleBias { derivatives: Some(gradients), .. }
        | SampleCall::SampleCompare { derivatives: Some(gradients), .. } => {
            check_count("ddx", gradients.ddx.len(), components)?;
            check_count("ddy", gradients.ddy.len(), components)?;
        }
        _ => {}
    }

    if call.is_gather() && matches!(dimension, TextureDimension::D1 | TextureDimension::D3) {
        return Err(OracleError::shape(format!("{} needs a 2D or cube texture", call.name())));
    }
    if let SampleCall::Gather { component, .. } = call {
        let limit = if info.is_depth_or_stencil() { 1 } else { 4 };
        if *component >= limit {
            return Err(OracleError::shape(format!("gather component {component} out of range")));
        }
    }

    if call.is_comparison() {
        if info.aspect != Aspect::Depth {
            return Err(OracleError::shape(format!("{} needs a depth texture", call.name())));
        }
        if matches!(dimension, TextureDimension::D1 | TextureDimension::D3) {
            return Err(OracleError::shape("depth textures are 2D, 2D array, cube or cube array"));
        }
        if sampler.compare.is_none() {
            return Err(OracleError::shape(format!("{} needs a comparison sampler", call.name())));
        }
        return Ok(());
    }

    if sampler.compare.is_some() {
        return Err(OracleError::shape(format!("comparison sampler used with {}", call.name())));
    }
    if !call.is_gather() && sampler.uses_linear_filtering() && (info.aspect != Aspect::Color || !info.is_filterable()) {
        return Err(OracleError::shape(format!("{:?} can't be sampled with linear filtering", texture.format())));
    }
    Ok(())
}

fn check_count(what: &str, actual: usize, expected: usize) -> Result<(), OracleError> {
    if actual != expected {
        return Err(OracleError::shape(format!("{what} has {actual} components, the texture takes {expected}")));
    }
    Ok(())
}

fn check_array_index(dimension: TextureDimension, present: bool) -> Result<(), OracleError> {
    if present != dimension.is_array() {
        return Err(OracleError::shape(if present {
            format!("array index given for a {:?} texture", dimension)
        } else {
            format!("{:?} texture needs an array index", dimension)
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(descriptor: TextureDescriptor) -> Texture {
        Texture::from_fn(descriptor, |_| RGBA::ZERO)
    }

    fn assert_invalid(texture: &Texture, sampler: &SamplerState, call: SampleCall) {
        match validate(texture, sampler, &call) {
            Err(OracleError::InvalidCallShape { .. }) => {}
            other => panic!("expected InvalidCallShape for {:?}, got {:?}", call, other),
        }
    }

    #[test]
    fn accepts_well_formed_calls() {
        let tex = texture(TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 4, 4));
        let sampler = SamplerState::trilinear();
        let calls = [
            SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]).with_offset(&[-8, 7]), level: 0.0 },
            SampleCall::SampleGrad { at: Location::new(&[0.5, 0.5]), gradients: Gradients::new(&[0.1, 0.0], &[0.0, 0.1]) },
            SampleCall::Gather { at: Location::new(&[0.5, 0.5]), component: 3 },
            SampleCall::Load { at: [9, -1].into_iter().collect(), level: 7, array_index: None, sample_index: None },
        ];
        for call in calls {
            assert_eq!(validate(&tex, &sampler, &call), Ok(()));
        }
    }

    #[test]
    fn rejects_three_component_coordinate_on_1d() {
        let tex = texture(TextureDescriptor::d1(TexelFormat::R8Unorm, 4));
        let call = SampleCall::SampleLevel { at: Location::new(&[0.1, 0.2, 0.3]), level: 0.0 };
        assert_invalid(&tex, &SamplerState::default(), call);
    }

    #[test]
    fn rejects_array_index_mismatches() {
        let array = texture(TextureDescriptor::d2_array(TexelFormat::R8Unorm, 4, 4, 2));
        let plain = texture(TextureDescriptor::d2(TexelFormat::R8Unorm, 4, 4));
        let sampler = SamplerState::default();
        assert_invalid(&array, &sampler, SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]), level: 0.0 });
        assert_invalid(
            &plain,
            &sampler,
            SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]).with_array_index(1), level: 0.0 },
        );
    }

    #[test]
    fn rejects_bad_offsets() {
        let tex = texture(TextureDescriptor::d2(TexelFormat::R8Unorm, 4, 4));
        let cube = texture(TextureDescriptor::cube(TexelFormat::R8Unorm, 4));
        let sampler = SamplerState::default();
        assert_invalid(&tex, &sampler, SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]).with_offset(&[8, 0]), level: 0.0 });
        assert_invalid(&tex, &sampler, SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]).with_offset(&[1]), level: 0.0 });
        assert_invalid(
            &cube,
            &sampler,
            SampleCall::SampleLevel { at: Location::new(&[1.0, 0.0, 0.0]).with_offset(&[1, 1, 1]), level: 0.0 },
        );
    }

    #[test]
    fn rejects_comparison_misuse() {
        let color = texture(TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 4, 4));
        let depth = texture(TextureDescriptor::d2(TexelFormat::Depth32Float, 4, 4));
        let compare = SamplerState::default().with_compare(CompareFunction::Less);
        let call = SampleCall::SampleCompare { at: Location::new(&[0.5, 0.5]), depth_ref: 0.5, derivatives: None };
        assert_invalid(&color, &compare, call.clone());
        assert_invalid(&depth, &SamplerState::default(), call.clone());
        assert_eq!(validate(&depth, &compare, &call), Ok(()));
        assert_invalid(&depth, &compare, SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]), level: 0.0 });
    }

    #[test]
    fn rejects_linear_filtering_of_unfilterable_formats() {
        let sampler = SamplerState::trilinear();
        let call = SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]), level: 0.0 };
        for format in [TexelFormat::Rgba8Uint, TexelFormat::Rgba32Float, TexelFormat::Depth16Unorm, TexelFormat::Stencil8] {
            assert_invalid(&texture(TextureDescriptor::d2(format, 4, 4)), &sampler, call.clone());
        }
        let gather = SampleCall::Gather { at: Location::new(&[0.5, 0.5]), component: 0 };
        assert_eq!(validate(&texture(TextureDescriptor::d2(TexelFormat::Rgba8Uint, 4, 4)), &sampler, &gather), Ok(()));
    }

    #[test]
    fn rejects_gather_on_1d_and_3d() {
        let sampler = SamplerState::default();
        let d1 = texture(TextureDescriptor::d1(TexelFormat::R8Unorm, 4));
        assert_invalid(&d1, &sampler, SampleCall::Gather { at: Location::new(&[0.5]), component: 0 });
        let d3 = texture(TextureDescriptor::d3(TexelFormat::R8Unorm, 4, 4, 4));
        assert_invalid(&d3, &sampler, SampleCall::Gather { at: Location::new(&[0.5, 0.5, 0.5]), component: 0 });
        let d2 = texture(TextureDescriptor::d2(TexelFormat::R8Unorm, 4, 4));
        assert_invalid(&d2, &sampler, SampleCall::Gather { at: Location::new(&[0.5, 0.5]), component: 4 });
    }

    #[test]
    fn multisampled_textures_only_load_with_sample_index() {
        let ms = texture(TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 4, 4).with_sample_count(4));
        let sampler = SamplerState::default();
        let load = |sample_index| SampleCall::Load { at: [1, 1].into_iter().collect(), level: 0, array_index: None, sample_index };
        assert_eq!(validate(&ms, &sampler, &load(Some(2))), Ok(()));
        assert_invalid(&ms, &sampler, load(None));
        assert_invalid(&ms, &sampler, SampleCall::SampleLevel { at: Location::new(&[0.5, 0.5]), level: 0.0 });
    }
}
