//! Imported mesh data.
//!
//! This module provides:
//! - [`Mesh`] - deduplicated vertex arrays, triangle indices and material path
//! - [`MeshVertex`] - all attributes of one triangle corner

use crate::math::{Vec2, Vec3, Vec4};

/// Every attribute of a single triangle corner.
///
/// Attributes the mesh does not carry are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: Vec3,
    /// Texture coordinates.
    pub texcoord: Vec2,
    /// Unit normal.
    pub normal: Vec3,
    /// Unit tangent in xyz, handedness (+1 or -1) in w.
    pub tangent: Vec4,
}

impl Default for MeshVertex {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            texcoord: Vec2::zeros(),
            normal: Vec3::zeros(),
            tangent: Vec4::zeros(),
        }
    }
}

/// A triangle mesh produced by [`import`](super::import).
///
/// All per-vertex arrays have `vertex_count` entries. Normals are always
/// present; tangents are present iff texcoords are. Every three consecutive
/// indices form one triangle. A mesh is immutable once imported.
///
/// # Attribute access
///
/// The per-corner getters ([`position`](Self::position),
/// [`texcoord`](Self::texcoord), ...) return the zero value when the
/// triangle index is out of range, the corner is not 0, 1 or 2, or the mesh
/// lacks that attribute. Rasterizer loops can read attributes unconditionally.
#[derive(Clone)]
pub struct Mesh {
    pub(super) positions: Vec<Vec3>,
    pub(super) texcoords: Option<Vec<Vec2>>,
    pub(super) normals: Vec<Vec3>,
    pub(super) tangents: Option<Vec<Vec4>>,
    pub(super) indices: Vec<u32>,
    pub(super) diffuse_texture_path: Option<String>,
}

impl Mesh {
    /// Release all arrays of the mesh.
    pub fn destroy(self) {
        log::trace!(
            "Destroyed mesh with {} vertices, {} triangles",
            self.vertex_count(),
            self.triangle_count()
        );
    }

    /// Get the number of unique vertices.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    /// Get the triangle index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Get the vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Get the texture coordinates, if the mesh has any.
    pub fn texcoords(&self) -> Option<&[Vec2]> {
        self.texcoords.as_deref()
    }

    /// Get the unit vertex normals.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Get the tangent frames, if the mesh has texcoords.
    pub fn tangents(&self) -> Option<&[Vec4]> {
        self.tangents.as_deref()
    }

    /// Get the diffuse texture path of the mesh material.
    pub fn diffuse_texture_path(&self) -> Option<&str> {
        self.diffuse_texture_path.as_deref()
    }

    fn vertex_index(&self, triangle: u32, corner: u32) -> Option<usize> {
        if corner > 2 {
            return None;
        }
        let slot = (triangle as usize).checked_mul(3)? + corner as usize;
        self.indices.get(slot).map(|&index| index as usize)
    }

    /// Position of a triangle corner.
    pub fn position(&self, triangle: u32, corner: u32) -> Vec3 {
        self.vertex_index(triangle, corner)
            .and_then(|i| self.positions.get(i).copied())
            .unwrap_or_else(Vec3::zeros)
    }

    /// Texture coordinates of a triangle corner.
    pub fn texcoord(&self, triangle: u32, corner: u32) -> Vec2 {
        self.vertex_index(triangle, corner)
            .and_then(|i| self.texcoords.as_ref()?.get(i).copied())
            .unwrap_or_else(Vec2::zeros)
    }

    /// Normal of a triangle corner.
    pub fn normal(&self, triangle: u32, corner: u32) -> Vec3 {
        self.vertex_index(triangle, corner)
            .and_then(|i| self.normals.get(i).copied())
            .unwrap_or_else(Vec3::zeros)
    }

    /// Tangent frame of a triangle corner.
    pub fn tangent(&self, triangle: u32, corner: u32) -> Vec4 {
        self.vertex_index(triangle, corner)
            .and_then(|i| self.tangents.as_ref()?.get(i).copied())
            .unwrap_or_else(Vec4::zeros)
    }

    /// All attributes of a triangle corner.
    pub fn vertex(&self, triangle: u32, corner: u32) -> MeshVertex {
        MeshVertex {
            position: self.position(triangle, corner),
            texcoord: self.texcoord(triangle, corner),
            normal: self.normal(triangle, corner),
            tangent: self.tangent(triangle, corner),
        }
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertex_count", &self.vertex_count())
            .field("triangle_count", &self.triangle_count())
            .field("has_texcoords", &self.texcoords.is_some())
            .field("has_tangents", &self.tangents.is_some())
            .field("diffuse_texture_path", &self.diffuse_texture_path)
            .finish()
    }
}
