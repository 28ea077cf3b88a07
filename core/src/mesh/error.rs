//! Error types for mesh import.

use thiserror::Error;

/// Errors that can occur while importing a [`RawMesh`](super::RawMesh).
///
/// Import is all-or-nothing: on error no mesh is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// A face with a vertex count other than 0 or 3.
    #[error("face {face} has {vertex_count} vertices; only triangles are supported")]
    UnsupportedFace {
        /// Face index in the raw mesh.
        face: usize,
        /// Declared vertex count.
        vertex_count: u32,
    },
    /// The faces reference more face-vertex records than were supplied.
    #[error("faces reference {expected} face-vertex indices but only {available} were supplied")]
    MissingFaceIndices {
        /// Sum of all face vertex counts.
        expected: usize,
        /// Number of supplied index records.
        available: usize,
    },
    /// A per-vertex attribute slice does not match the position count.
    #[error("{attribute} has {actual} entries but there are {expected} positions")]
    MismatchedAttributes {
        /// Name of the mismatched attribute.
        attribute: &'static str,
        /// Number of positions.
        expected: usize,
        /// Length of the attribute slice.
        actual: usize,
    },
    /// A triangle index points past the vertex arrays.
    #[error("vertex index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices the index should address.
        vertex_count: usize,
    },
    /// A working or output buffer could not be allocated.
    #[error("out of memory while importing mesh")]
    OutOfMemory,
}

impl From<std::collections::TryReserveError> for ImportError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::OutOfMemory
    }
}
