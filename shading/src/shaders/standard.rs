//! Physically based metallic-roughness material.
//!
//! Lambertian diffuse plus a Cook-Torrance specular lobe built from Schlick
//! Fresnel, the GGX normal distribution and the height-correlated Smith-GGX
//! visibility term, following the Filament material model. Lighting is
//! evaluated in world space for a single directional light.

use std::f32::consts::PI;
use std::sync::Arc;

use emberlit_core::math::{normalize_or_zero, upper_3x3, Mat3, Mat4, Vec2, Vec3, Vec4};
use emberlit_core::mesh::MeshVertex;
use emberlit_core::texture::{sample, Texture};

use crate::{ShaderContext, ShadingError, ShadingStage};

// Varying slots
const TEXCOORD: usize = 0;
const WORLD_POSITION: usize = 0;
const WORLD_NORMAL: usize = 1;
const WORLD_TANGENT: usize = 2;
const WORLD_BITANGENT: usize = 3;

/// Lower bound on perceptual roughness; keeps `roughness^4` representable.
pub const MIN_PERCEPTUAL_ROUGHNESS: f32 = 0.045;

/// Vertex inputs of [`StandardShader`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardAttributes {
    pub position: Vec3,
    pub normal: Vec3,
    /// Tangent in xyz, handedness in w.
    pub tangent: Vec4,
    pub texcoord: Vec2,
}

impl From<MeshVertex> for StandardAttributes {
    fn from(vertex: MeshVertex) -> Self {
        Self {
            position: vertex.position,
            normal: vertex.normal,
            tangent: vertex.tangent,
            texcoord: vertex.texcoord,
        }
    }
}

/// Uniform block of [`StandardShader`].
#[derive(Debug, Clone)]
pub struct StandardUniform {
    pub local_to_world: Mat4,
    pub world_to_clip: Mat4,
    /// Applied to tangents.
    pub local_to_world_direction: Mat3,
    /// Applied to normals.
    pub local_to_world_normal: Mat3,
    /// Camera position in world space.
    pub camera_position: Vec3,
    /// Unit direction from the surface toward the light, in world space.
    pub light_direction: Vec3,
    pub light_intensity: Vec3,

    /// Tangent-space normal map, decoded as `2 * sample - 1`. Without one
    /// the interpolated normal is used.
    pub normal_map: Option<Arc<Texture>>,
    /// Diffuse albedo for dielectrics and specular color for metals, in
    /// linear space. Multiplied by `base_color_map`.
    pub base_color: Vec3,
    pub base_color_map: Option<Arc<Texture>>,
    /// 0 for dielectric, 1 for conductor. Multiplied by the red channel of
    /// `metallic_map`.
    pub metallic: f32,
    pub metallic_map: Option<Arc<Texture>>,
    /// Perceptual roughness, 0 smooth to 1 rough. Multiplied by the red
    /// channel of `roughness_map`.
    pub roughness: f32,
    pub roughness_map: Option<Arc<Texture>>,
    /// Fresnel reflectance at normal incidence for dielectrics.
    pub reflectance: f32,
}

impl Default for StandardUniform {
    fn default() -> Self {
        Self::new(Mat4::identity(), Mat4::identity())
    }
}

impl StandardUniform {
    /// Create a uniform block for a white, fully rough dielectric lit from +Y.
    ///
    /// Both 3x3 matrices are the upper part of `local_to_world`, which is
    /// only correct without non-uniform scale.
    pub fn new(local_to_world: Mat4, world_to_clip: Mat4) -> Self {
        let direction = upper_3x3(&local_to_world);
        Self {
            local_to_world,
            world_to_clip,
            local_to_world_direction: direction,
            local_to_world_normal: direction,
            camera_position: Vec3::zeros(),
            light_direction: Vec3::y(),
            light_intensity: Vec3::repeat(1.0),
            normal_map: None,
            base_color: Vec3::repeat(1.0),
            base_color_map: None,
            metallic: 0.0,
            metallic_map: None,
            roughness: 1.0,
            roughness_map: None,
            reflectance: 0.5,
        }
    }

    pub fn with_camera_position(mut self, position: Vec3) -> Self {
        self.camera_position = position;
        self
    }

    /// Set the light; `direction` is normalized.
    pub fn with_light(mut self, direction: Vec3, intensity: Vec3) -> Self {
        self.light_direction = normalize_or_zero(direction);
        self.light_intensity = intensity;
        self
    }

    pub fn with_material(mut self, base_color: Vec3, metallic: f32, roughness: f32) -> Self {
        self.base_color = base_color;
        self.metallic = metallic;
        self.roughness = roughness;
        self
    }

    pub fn with_reflectance(mut self, reflectance: f32) -> Self {
        self.reflectance = reflectance;
        self
    }

    pub fn with_normal_map(mut self, texture: Arc<Texture>) -> Self {
        self.normal_map = Some(texture);
        self
    }

    pub fn with_base_color_map(mut self, texture: Arc<Texture>) -> Self {
        self.base_color_map = Some(texture);
        self
    }

    pub fn with_metallic_map(mut self, texture: Arc<Texture>) -> Self {
        self.metallic_map = Some(texture);
        self
    }

    pub fn with_roughness_map(mut self, texture: Arc<Texture>) -> Self {
        self.roughness_map = Some(texture);
        self
    }
}

/// Material values at one fragment, after texture lookups.
struct Surface {
    /// Tangent space.
    normal: Vec3,
    base_color: Vec3,
    metallic: f32,
    roughness: f32,
    reflectance: f32,
}

impl Surface {
    fn fetch(uniform: &StandardUniform, texcoord: Vec2) -> Self {
        let normal = match &uniform.normal_map {
            Some(map) => map.sample(texcoord).xyz() * 2.0 - Vec3::repeat(1.0),
            None => Vec3::z(),
        };
        let base_color = sample(uniform.base_color_map.as_deref(), texcoord).xyz();
        Self {
            normal,
            base_color: uniform.base_color.component_mul(&base_color),
            metallic: uniform.metallic * sample(uniform.metallic_map.as_deref(), texcoord).x,
            roughness: uniform.roughness * sample(uniform.roughness_map.as_deref(), texcoord).x,
            reflectance: uniform.reflectance,
        }
    }
}

/// Convert perceptual roughness to `alpha^2` of the GGX distribution.
fn perceptual_roughness_to_a2(perceptual_roughness: f32) -> f32 {
    let roughness = perceptual_roughness.max(MIN_PERCEPTUAL_ROUGHNESS).powi(2);
    roughness * roughness
}

fn pow5(x: f32) -> f32 {
    let x2 = x * x;
    x2 * x2 * x
}

/// Schlick's Fresnel approximation `f0 + (1 - f0) * (1 - l·h)^5`.
fn f_schlick(f0: Vec3, l_dot_h: f32) -> Vec3 {
    let f = pow5(1.0 - l_dot_h);
    f0 * (1.0 - f) + Vec3::repeat(f)
}

fn d_ggx(a2: f32, n_dot_h: f32) -> f32 {
    let f = (n_dot_h * a2 - n_dot_h) * n_dot_h + 1.0;
    a2 / (PI * f * f)
}

/// Height-correlated Smith-GGX visibility, with the `4 n·l n·v` BRDF
/// denominator folded in.
fn v_smith_ggx_correlated(a2: f32, n_dot_l: f32, n_dot_v: f32) -> f32 {
    let lambda_v = n_dot_l * ((n_dot_v - a2 * n_dot_v) * n_dot_v + a2).sqrt();
    let lambda_l = n_dot_v * ((n_dot_l - a2 * n_dot_l) * n_dot_l + a2).sqrt();
    0.5 / (lambda_v + lambda_l)
}

/// Metallic-roughness PBR material.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShader;

impl ShadingStage for StandardShader {
    type Uniform = StandardUniform;
    type Attributes = StandardAttributes;

    fn evaluate_vertex(
        &self,
        uniform: &StandardUniform,
        attributes: &StandardAttributes,
        out: &mut ShaderContext,
    ) -> Result<Vec4, ShadingError> {
        out.set_vec2(TEXCOORD, attributes.texcoord)?;

        let world_position = uniform.local_to_world * attributes.position.push(1.0);
        out.set_vec3(WORLD_POSITION, world_position.xyz())?;

        let normal = uniform.local_to_world_normal * attributes.normal;
        let tangent = uniform.local_to_world_direction * attributes.tangent.xyz();
        let bitangent = normal.cross(&tangent) * attributes.tangent.w;
        out.set_vec3(WORLD_NORMAL, normal)?;
        out.set_vec3(WORLD_TANGENT, tangent)?;
        out.set_vec3(WORLD_BITANGENT, bitangent)?;

        Ok(uniform.world_to_clip * world_position)
    }

    fn evaluate_fragment(&self, uniform: &StandardUniform, input: &ShaderContext) -> Vec4 {
        let surface = Surface::fetch(uniform, input.vec2(TEXCOORD));

        let diffuse_color = surface.base_color * (1.0 - surface.metallic);
        let dielectric_f0 =
            0.16 * surface.reflectance * surface.reflectance * (1.0 - surface.metallic);
        let f0 = surface.base_color * surface.metallic + Vec3::repeat(dielectric_f0);
        let a2 = perceptual_roughness_to_a2(surface.roughness);

        let tangent_to_world = Mat3::from_columns(&[
            normalize_or_zero(input.vec3(WORLD_TANGENT)),
            normalize_or_zero(input.vec3(WORLD_BITANGENT)),
            normalize_or_zero(input.vec3(WORLD_NORMAL)),
        ]);
        let normal = normalize_or_zero(tangent_to_world * surface.normal);
        let light = uniform.light_direction;
        let view = normalize_or_zero(uniform.camera_position - input.vec3(WORLD_POSITION));
        let halfway = normalize_or_zero(view + light);

        // Clamp n·v away from zero to avoid grazing-angle artifacts.
        let n_dot_v = normal.dot(&view).max(1e-4);
        let n_dot_l = normal.dot(&light).max(0.0);
        let n_dot_h = normal.dot(&halfway).max(0.0);
        let l_dot_h = light.dot(&halfway).max(0.0);

        let specular = f_schlick(f0, l_dot_h)
            * (d_ggx(a2, n_dot_h) * v_smith_ggx_correlated(a2, n_dot_l, n_dot_v));
        let diffuse = diffuse_color / PI;

        let color = (specular + diffuse).component_mul(&uniform.light_intensity) * n_dot_l;
        color.push(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberlit_core::texture::TextureFormat;

    fn facing_context(normal: Vec3, tangent: Vec3, bitangent: Vec3) -> ShaderContext {
        let mut input = ShaderContext::new();
        input.set_vec3(WORLD_POSITION, Vec3::zeros()).unwrap();
        input.set_vec3(WORLD_NORMAL, normal).unwrap();
        input.set_vec3(WORLD_TANGENT, tangent).unwrap();
        input.set_vec3(WORLD_BITANGENT, bitangent).unwrap();
        input
    }

    #[test]
    fn test_roughness_floor() {
        assert!((perceptual_roughness_to_a2(0.0) - 0.045f32.powi(4)).abs() < 1e-12);
        assert_eq!(perceptual_roughness_to_a2(1.0), 1.0);
    }

    #[test]
    fn test_fresnel_limits() {
        let f0 = Vec3::repeat(0.04);
        assert!((f_schlick(f0, 1.0) - f0).norm() < 1e-6);
        assert!((f_schlick(f0, 0.0) - Vec3::repeat(1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_vertex_stage_builds_frame() {
        let uniform = StandardUniform::new(
            Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0)),
            Mat4::identity(),
        );
        let attributes = StandardAttributes {
            position: Vec3::zeros(),
            normal: Vec3::z(),
            tangent: Vec4::new(1.0, 0.0, 0.0, -1.0),
            texcoord: Vec2::new(0.5, 0.5),
        };
        let mut out = ShaderContext::new();
        let clip = StandardShader
            .evaluate_vertex(&uniform, &attributes, &mut out)
            .unwrap();
        assert_eq!(clip, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(out.vec3(WORLD_POSITION), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(out.vec3(WORLD_TANGENT), Vec3::x());
        // cross(z, x) = y, flipped by the handedness.
        assert_eq!(out.vec3(WORLD_BITANGENT), -Vec3::y());
    }

    #[test]
    fn test_light_behind_surface_is_black() {
        let uniform = StandardUniform::default()
            .with_camera_position(Vec3::new(0.0, 0.0, 5.0))
            .with_light(-Vec3::z(), Vec3::repeat(3.0));
        let input = facing_context(Vec3::z(), Vec3::x(), Vec3::y());
        assert_eq!(
            StandardShader.evaluate_fragment(&uniform, &input),
            Vec4::new(0.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_rough_dielectric_is_mostly_lambert() {
        let uniform = StandardUniform::default()
            .with_camera_position(Vec3::new(0.0, 0.0, 5.0))
            .with_light(Vec3::z(), Vec3::repeat(1.0))
            .with_reflectance(0.0);
        let input = facing_context(Vec3::z(), Vec3::x(), Vec3::y());
        let color = StandardShader.evaluate_fragment(&uniform, &input);
        // f0 = 0 and l·h = 1 leave no Fresnel term at all.
        assert!((color.x - 1.0 / PI).abs() < 1e-5);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn test_flat_normal_map_matches_no_map() {
        let mut flat = Texture::create(TextureFormat::Rgba8Unorm, 1, 1).unwrap();
        // (128, 128, 255) decodes to roughly +Z.
        flat.set_pixels(&[128, 128, 255]).unwrap();
        let base = StandardUniform::default()
            .with_camera_position(Vec3::new(0.0, 2.0, 5.0))
            .with_light(Vec3::new(1.0, 1.0, 1.0), Vec3::repeat(1.0))
            .with_material(Vec3::new(0.8, 0.6, 0.4), 0.3, 0.5);
        let mapped = base.clone().with_normal_map(Arc::new(flat));
        let input = facing_context(Vec3::z(), Vec3::x(), Vec3::y());

        let without = StandardShader.evaluate_fragment(&base, &input);
        let with = StandardShader.evaluate_fragment(&mapped, &input);
        assert!((without - with).norm() < 1e-2);
    }
}
