use texoracle::sampling::*;
use texoracle::texture::*;
use texoracle::*;

macro_rules! assert_rgba_near {
    ($left:expr, $right:expr, $tol:expr $(,)?) => {{
        let l: RGBA = $left;
        let r: RGBA = $right;
        let tol: f64 = $tol;
        let close = (l.r - r.r).abs() <= tol && (l.g - r.g).abs() <= tol && (l.b - r.b).abs() <= tol && (l.a - r.a).abs() <= tol;
        if !close {
            panic!("assertion failed: left != right within tol={}\n  left: {:?}\n right: {:?}", tol, l, r);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn predict(texture: &Texture, sampler: &SamplerState, call: &SampleCall) -> RGBA {
        match SamplingOracle::uncalibrated().predict(texture, sampler, call) {
            Ok(Prediction::Color(color)) => color,
            other => panic!("expected a color, got {:?}", other),
        }
    }

    fn two_texel_1d() -> Texture {
        let descriptor = TextureDescriptor::d1(TexelFormat::R32Float, 2);
        Texture::new(descriptor, vec![RGBA::new(0.0, 0.0, 0.0, 1.0), RGBA::new(1.0, 0.0, 0.0, 1.0)])
    }

    fn linear_1d(mode: AddressMode) -> SamplerState {
        // R32Float isn't filterable, so use the 16-bit twin of the texture when filtering linearly
        SamplerState { mag_filter: FilterMode::Linear, min_filter: FilterMode::Linear, ..Default::default() }
            .with_address_mode(mode)
    }

    fn two_texel_1d_filterable() -> Texture {
        let descriptor = TextureDescriptor::d1(TexelFormat::R16Float, 2);
        Texture::new(descriptor, two_texel_1d().texels)
    }

    #[test]
    fn test_linear_between_two_texels_at_half() {
        let call = SampleCall::SampleLevel { at: Location::new(&[0.5]), level: 0.0 };
        let color = predict(&two_texel_1d_filterable(), &linear_1d(AddressMode::ClampToEdge), &call);
        assert_eq!(color.r, 0.5);
    }

    #[test]
    fn test_repeat_at_one_and_a_quarter_equals_a_quarter() {
        let texture = two_texel_1d_filterable();
        let sampler = linear_1d(AddressMode::Repeat);
        let at = |u: f64| SampleCall::SampleLevel { at: Location::new(&[u]), level: 0.0 };
        assert_rgba_near!(predict(&texture, &sampler, &at(1.25)), predict(&texture, &sampler, &at(0.25)), 1e-12);
    }

    #[test]
    fn test_nearest_on_unfilterable_format() {
        let call = SampleCall::SampleLevel { at: Location::new(&[0.74]), level: 0.0 };
        assert_eq!(predict(&two_texel_1d(), &SamplerState::default(), &call).r, 1.0);
        let linear = linear_1d(AddressMode::ClampToEdge);
        assert!(matches!(
            SamplingOracle::uncalibrated().predict(&two_texel_1d(), &linear, &call),
            Err(OracleError::InvalidCallShape { .. })
        ));
    }

    fn solid_faces() -> Texture {
        let colors = [
            RGBA::new(1.0, 0.0, 0.0, 1.0),
            RGBA::new(0.0, 1.0, 0.0, 1.0),
            RGBA::new(0.0, 0.0, 1.0, 1.0),
            RGBA::new(1.0, 1.0, 0.0, 1.0),
            RGBA::new(0.0, 1.0, 1.0, 1.0),
            RGBA::new(1.0, 0.0, 1.0, 1.0),
        ];
        let descriptor = TextureDescriptor::cube(TexelFormat::Rgba8Unorm, 8).with_full_mip_chain();
        Texture::from_fn(descriptor, |l| colors[l.z as usize])
    }

    #[rstest]
    #[case(SamplerState::default())]
    #[case(SamplerState::trilinear())]
    #[case(SamplerState { mag_filter: FilterMode::Linear, ..Default::default() })]
    fn test_cube_face_centers_return_face_color(#[case] sampler: SamplerState) {
        let texture = solid_faces();
        for face in CubeFace::ALL {
            let dir = face_uv_to_direction(face, 0.5, 0.5);
            let expected = texture.texel(TexelLocation::new(0, 0, 0, face.layer()));
            for level in [0.0, 1.3, 3.0] {
                let call = SampleCall::SampleLevel { at: Location::new(&[dir.x, dir.y, dir.z]), level };
                assert_eq!(predict(&texture, &sampler, &call), expected, "{:?} level {}", face, level);
            }
        }
    }

    #[rstest]
    #[case(SamplerState::default())]
    #[case(SamplerState::trilinear())]
    fn test_cube_array_selects_and_clamps_its_cube(#[case] sampler: SamplerState) {
        let descriptor = TextureDescriptor::cube_array(TexelFormat::Rgba8Unorm, 4, 2).with_full_mip_chain();
        let texture = Texture::from_fn(descriptor, |l| RGBA::new(l.z as f64 / 11.0, 0.0, 0.0, 1.0));
        for face in CubeFace::ALL {
            let dir = face_uv_to_direction(face, 0.5, 0.5);
            let at = Location::new(&[dir.x, dir.y, dir.z]);
            for (array_index, cube) in [(0, 0), (1, 1), (7, 1), (-1, 0)] {
                let expected = texture.texel(TexelLocation::new(0, 0, 0, cube * 6 + face.layer()));
                let call = SampleCall::SampleLevel { at: at.clone().with_array_index(array_index), level: 0.0 };
                assert_eq!(predict(&texture, &sampler, &call), expected, "{:?} index {}", face, array_index);
            }
        }
        let missing_index = SampleCall::SampleLevel { at: Location::new(&[1.0, 0.0, 0.0]), level: 0.0 };
        assert!(matches!(
            SamplingOracle::uncalibrated().predict(&texture, &sampler, &missing_index),
            Err(OracleError::InvalidCallShape { .. })
        ));
    }

    #[test]
    fn test_cube_corner_raises() {
        let texture = solid_faces();
        let call = SampleCall::SampleLevel { at: Location::new(&[1.0, 0.999, 0.999]), level: 0.0 };
        let result = SamplingOracle::uncalibrated().predict(&texture, &SamplerState::trilinear(), &call);
        assert!(matches!(result, Err(OracleError::DegenerateCubeCorner { .. })));
    }

    #[rstest]
    #[case(AddressMode::ClampToEdge, FilterMode::Nearest)]
    #[case(AddressMode::ClampToEdge, FilterMode::Linear)]
    #[case(AddressMode::Repeat, FilterMode::Nearest)]
    #[case(AddressMode::Repeat, FilterMode::Linear)]
    #[case(AddressMode::MirrorRepeat, FilterMode::Nearest)]
    #[case(AddressMode::MirrorRepeat, FilterMode::Linear)]
    fn test_identical_texels_return_their_exact_value(#[case] mode: AddressMode, #[case] filter: FilterMode) {
        let value = RGBA::new(0.1, 0.7, 0.3, 0.9);
        let descriptor = TextureDescriptor::d2_array(TexelFormat::Rgba16Float, 8, 4, 3).with_full_mip_chain();
        let texture = Texture::from_fn(descriptor, |_| value);
        let sampler =
            SamplerState { mag_filter: filter, min_filter: filter, mipmap_filter: filter, ..Default::default() }.with_address_mode(mode);
        for i in 0..50 {
            let u = i as f64 * 0.173 - 2.0;
            let v = i as f64 * -0.061 + 0.4;
            let call = SampleCall::SampleLevel { at: Location::new(&[u, v]).with_array_index(i % 3), level: i as f64 * 0.07 };
            assert_eq!(predict(&texture, &sampler, &call), value);
        }
    }

    #[test]
    fn test_integer_level_with_linear_mips_matches_single_level() {
        let descriptor = TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 8, 8).with_full_mip_chain();
        let texture = Texture::from_fn(descriptor, |l| {
            RGBA::new(l.x as f64 / 8.0, l.y as f64 / 8.0, l.level as f64 / 4.0, 1.0)
        });
        let linear_mips = SamplerState::trilinear();
        let nearest_mips = SamplerState { mipmap_filter: FilterMode::Nearest, ..SamplerState::trilinear() };
        for level in 0..4 {
            for &(u, v) in &[(0.13, 0.77), (0.5, 0.5), (0.91, 0.02)] {
                let call = SampleCall::SampleLevel { at: Location::new(&[u, v]), level: level as f64 };
                assert_eq!(predict(&texture, &linear_mips, &call), predict(&texture, &nearest_mips, &call));
            }
        }
    }

    #[test]
    fn test_sample_grad_picks_coarser_level_for_larger_footprint() {
        let descriptor = TextureDescriptor::d2(TexelFormat::Rgba8Unorm, 16, 16).with_full_mip_chain();
        let texture = Texture::from_fn(descriptor, |l| RGBA::splat(l.level as f64 / 4.0));
        let sampler = SamplerState::trilinear();
        let at = |d: f64| SampleCall::SampleGrad { at: Location::new(&[0.5, 0.5]), gradients: Gradients::new(&[d, 0.0], &[0.0, d]) };
        assert_rgba_near!(predict(&texture, &sampler, &at(1.0 / 16.0)), RGBA::splat(0.0), 1e-12);
        assert_rgba_near!(predict(&texture, &sampler, &at(4.0 / 16.0)), RGBA::splat(0.5), 1e-12);
        assert_rgba_near!(predict(&texture, &sampler, &at(1.0)), RGBA::splat(1.0), 1e-12);
    }

    #[test]
    fn test_gather_from_codec_texture() {
        let descriptor = TextureDescriptor::d2(TexelFormat::Rgba8Uint, 2, 2);
        let bytes: Vec<u8> = [[1, 10, 0, 0], [2, 20, 0, 0], [3, 30, 0, 0], [4, 40, 0, 0]].concat();
        let texture = Texture::from_bytes(descriptor, &bytes, &StandardCodec);
        let call = SampleCall::Gather { at: Location::new(&[0.5, 0.5]), component: 1 };
        assert_eq!(predict(&texture, &SamplerState::default(), &call), RGBA::new(30.0, 40.0, 20.0, 10.0));
    }

    #[test]
    fn test_compare_with_implicit_derivatives() {
        let descriptor = TextureDescriptor::d2(TexelFormat::Depth32Float, 4, 4).with_full_mip_chain();
        let texture = Texture::from_fn(descriptor, |l| RGBA::new(if l.level == 0 { 0.2 } else { 0.8 }, 0.0, 0.0, 1.0));
        let sampler = SamplerState::trilinear().with_compare(CompareFunction::Less);
        let call = |d: f64| SampleCall::SampleCompare {
            at: Location::new(&[0.5, 0.5]),
            depth_ref: 0.5,
            derivatives: Some(Gradients::new(&[d, 0.0], &[0.0, d])),
        };
        // level 0 fails everywhere, level 1 passes everywhere
        assert_eq!(predict(&texture, &sampler, &call(0.25)).r, 0.0);
        assert_eq!(predict(&texture, &sampler, &call(0.5)).r, 1.0);
        assert!((predict(&texture, &sampler, &call(0.25 * 2f64.sqrt())).r - 0.5).abs() < 1e-9);
    }
}
