//! Material shaders.
//!
//! - [`BlinnPhongShader`] - view-space Blinn-Phong with a diffuse map
//! - [`StandardShader`] - metallic-roughness PBR with normal mapping
//! - [`ShadowCastingShader`] - depth-only pass into light space

mod blinn_phong;
mod shadow_casting;
mod standard;

pub use blinn_phong::{
    BlinnPhongAttributes, BlinnPhongLighting, BlinnPhongShader, BlinnPhongUniform,
};
pub use shadow_casting::{ShadowCastingAttributes, ShadowCastingShader, ShadowCastingUniform};
pub use standard::{StandardAttributes, StandardShader, StandardUniform, MIN_PERCEPTUAL_ROUGHNESS};
