//! Depth-only pass from a light's point of view.

use emberlit_core::math::{look_at_rh, normalize_or_zero, orthographic_rh, Mat4, Vec3, Vec4};
use emberlit_core::mesh::MeshVertex;

use crate::{ShaderContext, ShadingError, ShadingStage};

/// Vertex inputs of [`ShadowCastingShader`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCastingAttributes {
    pub position: Vec3,
}

impl From<MeshVertex> for ShadowCastingAttributes {
    fn from(vertex: MeshVertex) -> Self {
        Self {
            position: vertex.position,
        }
    }
}

/// Uniform block of [`ShadowCastingShader`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowCastingUniform {
    /// Object space to the light's clip space.
    pub light_space_matrix: Mat4,
}

impl Default for ShadowCastingUniform {
    fn default() -> Self {
        Self {
            light_space_matrix: Mat4::identity(),
        }
    }
}

impl ShadowCastingUniform {
    /// Light-space matrix of a directional light shining along `direction`.
    ///
    /// The orthographic shadow volume is centered on the world origin, spans
    /// `2 * half_extent` across and `depth` along the light. The origin maps
    /// to depth 0 in clip space. A zero direction shines straight down.
    pub fn directional(direction: Vec3, half_extent: f32, depth: f32) -> Self {
        let direction = match normalize_or_zero(direction) {
            d if d == Vec3::zeros() => -Vec3::y(),
            d => d,
        };
        let up = if direction.cross(&Vec3::y()).norm_squared() < 1e-6 {
            Vec3::z()
        } else {
            Vec3::y()
        };
        let eye = -direction * (depth * 0.5);
        let view = look_at_rh(&eye, &Vec3::zeros(), &up);
        let projection = orthographic_rh(2.0 * half_extent, 2.0 * half_extent, 0.0, depth);
        Self {
            light_space_matrix: projection * view,
        }
    }

    /// Append an object-to-world transform.
    pub fn with_model(mut self, local_to_world: Mat4) -> Self {
        self.light_space_matrix *= local_to_world;
        self
    }
}

/// Writes only depth; produces no varyings and a zero color.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowCastingShader;

impl ShadingStage for ShadowCastingShader {
    type Uniform = ShadowCastingUniform;
    type Attributes = ShadowCastingAttributes;

    fn evaluate_vertex(
        &self,
        uniform: &ShadowCastingUniform,
        attributes: &ShadowCastingAttributes,
        _out: &mut ShaderContext,
    ) -> Result<Vec4, ShadingError> {
        Ok(uniform.light_space_matrix * attributes.position.push(1.0))
    }

    fn evaluate_fragment(&self, _uniform: &ShadowCastingUniform, _input: &ShaderContext) -> Vec4 {
        Vec4::zeros()
    }
}
