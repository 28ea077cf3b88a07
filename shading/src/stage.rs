use emberlit_core::math::Vec4;
use emberlit_core::mesh::MeshVertex;

use crate::{ShaderContext, ShadingError};

/// A paired vertex and fragment stage for one material.
///
/// The vertex stage turns per-vertex attributes into a clip-space position
/// and fills the varyings its fragment stage reads. Both stages receive the
/// same uniform block. Implementations are stateless; everything a draw
/// needs lives in [`Self::Uniform`].
pub trait ShadingStage {
    /// Per-draw parameters: transforms, lights, material values and maps.
    type Uniform;

    /// Per-vertex inputs, built from a mesh vertex.
    type Attributes: From<MeshVertex>;

    /// Run the vertex stage, returning the clip-space position.
    ///
    /// `out` arrives cleared.
    fn evaluate_vertex(
        &self,
        uniform: &Self::Uniform,
        attributes: &Self::Attributes,
        out: &mut ShaderContext,
    ) -> Result<Vec4, ShadingError>;

    /// Run the fragment stage on interpolated varyings, returning a linear
    /// RGBA color.
    fn evaluate_fragment(&self, uniform: &Self::Uniform, input: &ShaderContext) -> Vec4;
}
