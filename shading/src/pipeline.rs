//! The calls a rasterizer makes into a [`ShadingStage`].
//!
//! A rasterizer runs [`shade_vertices`] once per mesh triangle, clips and
//! projects the returned positions itself, then calls [`shade_fragment`]
//! for every covered pixel with that pixel's screen-space barycentric
//! weights.

use emberlit_core::math::Vec4;
use emberlit_core::mesh::Mesh;
use emberlit_core::profile_function;

use crate::{ShaderContext, ShadingError, ShadingStage};

/// Output of the vertex stage for one triangle corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    /// Homogeneous clip-space position.
    pub clip_position: Vec4,
    /// Varyings written by the vertex stage.
    pub context: ShaderContext,
}

impl ShadedVertex {
    /// Reciprocal of the clip-space `w`, used for perspective correction.
    pub fn inverse_w(&self) -> f32 {
        1.0 / self.clip_position.w
    }
}

/// Run the vertex stage for the three corners of a mesh triangle.
///
/// Corners of an out-of-range triangle read zero attributes, matching
/// [`Mesh::vertex`].
pub fn shade_vertices<S: ShadingStage>(
    stage: &S,
    uniform: &S::Uniform,
    mesh: &Mesh,
    triangle: u32,
) -> Result<[ShadedVertex; 3], ShadingError> {
    profile_function!();

    let shade_corner = |corner: u32| -> Result<ShadedVertex, ShadingError> {
        let attributes = S::Attributes::from(mesh.vertex(triangle, corner));
        let mut context = ShaderContext::new();
        let clip_position = stage.evaluate_vertex(uniform, &attributes, &mut context)?;
        Ok(ShadedVertex {
            clip_position,
            context,
        })
    };
    Ok([shade_corner(0)?, shade_corner(1)?, shade_corner(2)?])
}

/// Interpolate the vertex varyings at one fragment and run the fragment
/// stage.
pub fn shade_fragment<S: ShadingStage>(
    stage: &S,
    uniform: &S::Uniform,
    vertices: &[ShadedVertex; 3],
    barycentric: [f32; 3],
) -> Vec4 {
    let input = ShaderContext::interpolate(
        [&vertices[0].context, &vertices[1].context, &vertices[2].context],
        barycentric,
        [
            vertices[0].inverse_w(),
            vertices[1].inverse_w(),
            vertices[2].inverse_w(),
        ],
    );
    stage.evaluate_fragment(uniform, &input)
}
