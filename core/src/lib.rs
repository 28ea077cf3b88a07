//! # Emberlit Core
//!
//! Geometry and texture foundations for the Emberlit software renderer:
//!
//! - [`math`] - nalgebra type aliases and small vector helpers
//! - [`color`] - linear/display color-space conversion and 8-bit quantization
//! - [`texture`] - CPU texture store with nearest sampling and framebuffer writes
//! - [`mesh`] - raw face import, vertex deduplication, normal and tangent derivation

pub mod color;
pub mod math;
pub mod mesh;
pub mod profiling;
pub mod texture;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
