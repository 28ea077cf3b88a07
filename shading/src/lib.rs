//! # Emberlit Shading
//!
//! The shading half of the Emberlit software renderer:
//!
//! - [`ShaderContext`] - slot storage for varyings and their perspective-correct
//!   interpolation
//! - [`ShadingStage`] - the vertex/fragment contract each material implements
//! - [`pipeline`] - the per-triangle and per-fragment calls a rasterizer makes
//! - [`shaders`] - Blinn-Phong, metallic-roughness PBR and shadow casting

pub mod context;
mod error;
pub mod pipeline;
pub mod shaders;
mod stage;

pub use context::{ShaderContext, VaryingKind, MAX_VARYINGS};
pub use error::ShadingError;
pub use pipeline::{shade_fragment, shade_vertices, ShadedVertex};
pub use stage::ShadingStage;
