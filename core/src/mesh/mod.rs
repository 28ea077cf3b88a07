//! CPU-side mesh import and derived vertex attributes.
//!
//! - [`RawMesh`] - independently indexed position/texcoord/normal streams plus faces
//! - [`import`] - deduplicates face-vertex index triples into a [`Mesh`]
//! - [`Mesh`] - unified vertex arrays, triangle index buffer, diffuse texture path
//! - [`compute_normals`] / [`compute_tangents`] - area-weighted normals and
//!   Lengyel tangent frames
//! - Generators for raw test shapes (sphere, quad)

mod data;
mod derive;
mod error;
pub mod generators;
mod import;

pub use data::{Mesh, MeshVertex};
pub use derive::{compute_normals, compute_tangents};
pub use error::ImportError;
pub use import::{import, import_with_options, DedupStrategy, ImportOptions, RawMesh, VertexIndex};
