//! Integration tests driving shading stages the way a rasterizer does.

use std::sync::Arc;

use rstest::rstest;

use emberlit_core::math::{look_at_rh, perspective_rh, Vec3, Vec4};
use emberlit_core::mesh::generators::{generate_quad, generate_sphere};
use emberlit_core::mesh::{import, Mesh, MeshVertex};
use emberlit_core::texture::{Texture, TextureFormat};
use emberlit_shading::shaders::{
    BlinnPhongShader, BlinnPhongUniform, ShadowCastingShader, ShadowCastingUniform,
    StandardShader, StandardUniform,
};
use emberlit_shading::{
    shade_fragment, shade_vertices, ShaderContext, ShadingError, ShadingStage, VaryingKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn quad() -> Mesh {
    init_logging();
    import(&generate_quad(1.0, 1.0)).unwrap()
}

fn sphere() -> Mesh {
    init_logging();
    import(&generate_sphere(1.0, 16, 8)).unwrap()
}

// ============================================================================
// Test stages
// ============================================================================

/// Passes the texcoord u through a float varying.
struct PassThrough;

impl ShadingStage for PassThrough {
    type Uniform = ();
    type Attributes = MeshVertex;

    fn evaluate_vertex(
        &self,
        _uniform: &(),
        attributes: &MeshVertex,
        out: &mut ShaderContext,
    ) -> Result<Vec4, ShadingError> {
        out.set_float(0, attributes.texcoord.x)?;
        // Put the right edge of the quad further away.
        let w = 1.0 + attributes.texcoord.x * 3.0;
        Ok(attributes.position.push(w))
    }

    fn evaluate_fragment(&self, _uniform: &(), input: &ShaderContext) -> Vec4 {
        Vec4::new(input.float(0), 0.0, 0.0, 1.0)
    }
}

/// Writes a slot past the context capacity.
struct Overflowing;

impl ShadingStage for Overflowing {
    type Uniform = ();
    type Attributes = MeshVertex;

    fn evaluate_vertex(
        &self,
        _uniform: &(),
        _attributes: &MeshVertex,
        out: &mut ShaderContext,
    ) -> Result<Vec4, ShadingError> {
        out.set_vec4(9, Vec4::zeros())?;
        Ok(Vec4::zeros())
    }

    fn evaluate_fragment(&self, _uniform: &(), _input: &ShaderContext) -> Vec4 {
        Vec4::zeros()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_vertex_errors_propagate() {
    let err = shade_vertices(&Overflowing, &(), &quad(), 0).unwrap_err();
    assert_eq!(
        err,
        ShadingError::SlotOutOfRange {
            kind: VaryingKind::Vec4,
            slot: 9
        }
    );
}

#[rstest]
#[case::corner_0([1.0, 0.0, 0.0])]
#[case::corner_1([0.0, 1.0, 0.0])]
#[case::corner_2([0.0, 0.0, 1.0])]
fn test_fragment_at_corner_reproduces_vertex(#[case] barycentric: [f32; 3]) {
    let mesh = quad();
    let vertices = shade_vertices(&PassThrough, &(), &mesh, 0).unwrap();
    let corner = barycentric.iter().position(|&b| b == 1.0).unwrap();
    let color = shade_fragment(&PassThrough, &(), &vertices, barycentric);
    assert!((color.x - mesh.texcoord(0, corner as u32).x).abs() < 1e-6);
}

#[test]
fn test_interpolation_is_perspective_correct() {
    let mesh = quad();
    // Triangle 0 is (0,0) (1,0) (1,1) in uv; its first edge spans u 0..1.
    let vertices = shade_vertices(&PassThrough, &(), &mesh, 0).unwrap();
    assert_eq!(vertices[0].clip_position.w, 1.0);
    assert_eq!(vertices[1].clip_position.w, 4.0);

    let color = shade_fragment(&PassThrough, &(), &vertices, [0.5, 0.5, 0.0]);
    // Screen-space midpoint of the edge: (0.5 * 0 / 1 + 0.5 * 1 / 4) / (0.5 / 1 + 0.5 / 4)
    assert!((color.x - 0.2).abs() < 1e-6);
}

#[test]
fn test_out_of_range_triangle_shades_zero_attributes() {
    let mesh = quad();
    let vertices = shade_vertices(&PassThrough, &(), &mesh, 99).unwrap();
    for vertex in &vertices {
        assert_eq!(vertex.clip_position, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn test_blinn_phong_quad_facing_light() {
    let mut texture = Texture::create(TextureFormat::Rgba8UnormSrgb, 2, 2).unwrap();
    texture.set_pixels(&[255; 12]).unwrap();
    let view = look_at_rh(&Vec3::new(0.0, 0.0, 3.0), &Vec3::zeros(), &Vec3::y());
    let uniform = BlinnPhongUniform::new(view, perspective_rh(1.0, 1.0, 0.1, 10.0))
        .with_ambient(Vec3::zeros(), Vec3::zeros())
        .with_light(Vec3::z(), Vec3::repeat(0.5))
        .with_shininess(16.0)
        .with_diffuse_texture(Arc::new(texture));

    let mesh = quad();
    for triangle in 0..mesh.triangle_count() {
        let vertices = shade_vertices(&BlinnPhongShader, &uniform, &mesh, triangle).unwrap();
        let color = shade_fragment(&BlinnPhongShader, &uniform, &vertices, [1.0 / 3.0; 3]);
        // Diffuse 0.5 plus a specular highlight, never above 1 per channel here.
        assert!(color.x > 0.5 && color.x <= 1.0 + 1e-5, "color {color:?}");
        assert_eq!(color.w, 1.0);
    }
}

#[rstest]
#[case::lit_side(Vec3::new(0.0, 1.0, 0.0))]
#[case::grazing(Vec3::new(1.0, 0.0, 0.0))]
#[case::below(Vec3::new(0.0, -1.0, 0.0))]
fn test_standard_sphere_colors_are_finite(#[case] light: Vec3) {
    let uniform = StandardUniform::default()
        .with_camera_position(Vec3::new(0.0, 0.0, 4.0))
        .with_light(light, Vec3::repeat(2.0))
        .with_material(Vec3::new(0.9, 0.7, 0.3), 0.8, 0.4);

    let mesh = sphere();
    for triangle in 0..mesh.triangle_count() {
        let vertices = shade_vertices(&StandardShader, &uniform, &mesh, triangle).unwrap();
        for barycentric in [[1.0 / 3.0; 3], [0.8, 0.1, 0.1]] {
            let color = shade_fragment(&StandardShader, &uniform, &vertices, barycentric);
            assert!(color.iter().all(|c| c.is_finite() && *c >= 0.0), "{color:?}");
            assert_eq!(color.w, 1.0);
        }
    }
}

#[test]
fn test_shadow_casting_writes_no_varyings() {
    let uniform = ShadowCastingUniform::default();
    let mesh = sphere();
    let vertices = shade_vertices(&ShadowCastingShader, &uniform, &mesh, 0).unwrap();
    for (corner, vertex) in vertices.iter().enumerate() {
        assert_eq!(vertex.context, ShaderContext::new());
        assert_eq!(vertex.clip_position.xyz(), mesh.position(0, corner as u32));
    }
    let color = shade_fragment(&ShadowCastingShader, &uniform, &vertices, [0.2, 0.3, 0.5]);
    assert_eq!(color, Vec4::zeros());
}
