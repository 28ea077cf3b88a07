//! Blinn-Phong lighting evaluated in view space.

use std::sync::Arc;

use emberlit_core::math::{normalize_or_zero, upper_3x3, Mat3, Mat4, Vec2, Vec3, Vec4};
use emberlit_core::mesh::MeshVertex;
use emberlit_core::texture::{sample, Texture};

use crate::{ShaderContext, ShadingError, ShadingStage};

// Varying slots
const TEXCOORD: usize = 0;
const NORMAL: usize = 0;
const POSITION: usize = 1;

/// Vertex inputs of [`BlinnPhongShader`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinnPhongAttributes {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

impl From<MeshVertex> for BlinnPhongAttributes {
    fn from(vertex: MeshVertex) -> Self {
        Self {
            position: vertex.position,
            normal: vertex.normal,
            texcoord: vertex.texcoord,
        }
    }
}

/// Uniform block of [`BlinnPhongShader`].
///
/// All lighting vectors are in view space; `light_direction` points from
/// the surface toward the light and is unit length. Colors and
/// reflectances are linear RGB multiplied per channel.
#[derive(Debug, Clone)]
pub struct BlinnPhongUniform {
    pub modelview: Mat4,
    pub projection: Mat4,
    /// Direction-only part of `modelview`, applied to normals.
    ///
    /// Only correct for rotations and uniform scales.
    pub normal_matrix: Mat3,
    pub light_direction: Vec3,
    pub light_color: Vec3,
    pub ambient_color: Vec3,
    pub ambient_reflectance: Vec3,
    pub diffuse_reflectance: Vec3,
    pub specular_reflectance: Vec3,
    pub shininess: f32,
    /// Multiplies ambient and diffuse light; absent samples as white.
    pub diffuse_texture: Option<Arc<Texture>>,
}

impl Default for BlinnPhongUniform {
    fn default() -> Self {
        Self::new(Mat4::identity(), Mat4::identity())
    }
}

impl BlinnPhongUniform {
    /// Create a uniform block with a white light along +Z and neutral
    /// material values.
    pub fn new(modelview: Mat4, projection: Mat4) -> Self {
        Self {
            modelview,
            projection,
            normal_matrix: upper_3x3(&modelview),
            light_direction: Vec3::z(),
            light_color: Vec3::repeat(1.0),
            ambient_color: Vec3::repeat(0.1),
            ambient_reflectance: Vec3::repeat(1.0),
            diffuse_reflectance: Vec3::repeat(1.0),
            specular_reflectance: Vec3::repeat(1.0),
            shininess: 32.0,
            diffuse_texture: None,
        }
    }

    /// Replace the model-view transform and the normal matrix derived from it.
    pub fn set_modelview(&mut self, modelview: Mat4) {
        self.modelview = modelview;
        self.normal_matrix = upper_3x3(&modelview);
    }

    /// Set the light; `direction` is normalized.
    pub fn with_light(mut self, direction: Vec3, color: Vec3) -> Self {
        self.light_direction = normalize_or_zero(direction);
        self.light_color = color;
        self
    }

    pub fn with_ambient(mut self, color: Vec3, reflectance: Vec3) -> Self {
        self.ambient_color = color;
        self.ambient_reflectance = reflectance;
        self
    }

    pub fn with_reflectance(mut self, diffuse: Vec3, specular: Vec3) -> Self {
        self.diffuse_reflectance = diffuse;
        self.specular_reflectance = specular;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_diffuse_texture(mut self, texture: Arc<Texture>) -> Self {
        self.diffuse_texture = Some(texture);
        self
    }
}

/// The three light terms before texturing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinnPhongLighting {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// Blinn-Phong material.
///
/// Fragment color is `(ambient + diffuse) * diffuse_texture.rgb + specular`
/// with alpha 1. The camera sits at the view-space origin, so the view
/// direction is the negated fragment position.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlinnPhongShader;

impl BlinnPhongShader {
    /// Evaluate the light terms for a view-space normal and position.
    ///
    /// The specular term is zero whenever `N·L <= 0`.
    pub fn lighting(
        &self,
        uniform: &BlinnPhongUniform,
        normal: Vec3,
        position: Vec3,
    ) -> BlinnPhongLighting {
        let normal = normalize_or_zero(normal);
        let ambient = uniform.ambient_color.component_mul(&uniform.ambient_reflectance);

        let n_dot_l = normal.dot(&uniform.light_direction);
        let diffuse =
            (uniform.light_color * n_dot_l.max(0.0)).component_mul(&uniform.diffuse_reflectance);

        let specular = if n_dot_l > 0.0 {
            let view = normalize_or_zero(-position);
            let halfway = normalize_or_zero(view + uniform.light_direction);
            let intensity = normal.dot(&halfway).max(0.0).powf(uniform.shininess);
            (uniform.light_color * intensity).component_mul(&uniform.specular_reflectance)
        } else {
            Vec3::zeros()
        };

        BlinnPhongLighting {
            ambient,
            diffuse,
            specular,
        }
    }
}

impl ShadingStage for BlinnPhongShader {
    type Uniform = BlinnPhongUniform;
    type Attributes = BlinnPhongAttributes;

    fn evaluate_vertex(
        &self,
        uniform: &BlinnPhongUniform,
        attributes: &BlinnPhongAttributes,
        out: &mut ShaderContext,
    ) -> Result<Vec4, ShadingError> {
        out.set_vec2(TEXCOORD, attributes.texcoord)?;
        out.set_vec3(NORMAL, uniform.normal_matrix * attributes.normal)?;

        let position = uniform.modelview * attributes.position.push(1.0);
        out.set_vec3(POSITION, position.xyz())?;
        Ok(uniform.projection * position)
    }

    fn evaluate_fragment(&self, uniform: &BlinnPhongUniform, input: &ShaderContext) -> Vec4 {
        let light = self.lighting(uniform, input.vec3(NORMAL), input.vec3(POSITION));
        let texture_color = sample(uniform.diffuse_texture.as_deref(), input.vec2(TEXCOORD));

        let color =
            (light.ambient + light.diffuse).component_mul(&texture_color.xyz()) + light.specular;
        color.push(1.0)
    }
}
