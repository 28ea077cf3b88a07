//! Raw face import and vertex deduplication.

use std::collections::HashMap;

use crate::math::{normalize_or_zero, Vec2, Vec3};
use crate::{profile_function, profile_scope};

use super::{compute_normals, compute_tangents, ImportError, Mesh};

/// Indices of one face-vertex into the raw attribute arrays.
///
/// Index 0 is the reserved "unset" slot: it never marks a texcoord or normal
/// as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexIndex {
    pub position: u32,
    pub texcoord: u32,
    pub normal: u32,
}

impl VertexIndex {
    pub const fn new(position: u32, texcoord: u32, normal: u32) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// Independently indexed attribute streams and face records, as a mesh file
/// parser produces them.
///
/// Face `i` owns `face_vertex_counts[i]` consecutive entries of `indices`,
/// in face order. Element 0 of every attribute array is reserved and should
/// hold a zero value; [`RawMesh::new`] seeds it.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub positions: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub face_vertex_counts: Vec<u32>,
    pub indices: Vec<VertexIndex>,
    pub diffuse_texture_path: Option<String>,
}

impl RawMesh {
    /// Create an empty raw mesh with the reserved element 0 in place.
    pub fn new() -> Self {
        Self {
            positions: vec![Vec3::zeros()],
            texcoords: vec![Vec2::zeros()],
            normals: vec![Vec3::zeros()],
            ..Default::default()
        }
    }

    /// Replace the position array (element 0 included).
    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = positions;
        self
    }

    /// Replace the texcoord array (element 0 included).
    pub fn with_texcoords(mut self, texcoords: Vec<Vec2>) -> Self {
        self.texcoords = texcoords;
        self
    }

    /// Replace the normal array (element 0 included).
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_diffuse_texture_path(mut self, path: impl Into<String>) -> Self {
        self.diffuse_texture_path = Some(path.into());
        self
    }

    /// Append a position and return its index.
    pub fn push_position(&mut self, position: Vec3) -> u32 {
        self.positions.push(position);
        (self.positions.len() - 1) as u32
    }

    /// Append texture coordinates and return their index.
    pub fn push_texcoord(&mut self, texcoord: Vec2) -> u32 {
        self.texcoords.push(texcoord);
        (self.texcoords.len() - 1) as u32
    }

    /// Append a normal and return its index.
    pub fn push_normal(&mut self, normal: Vec3) -> u32 {
        self.normals.push(normal);
        (self.normals.len() - 1) as u32
    }

    /// Append a face with any number of vertices.
    ///
    /// Only empty and triangular faces import; anything else is kept here so
    /// [`import`] can report it.
    pub fn push_face(&mut self, vertices: &[VertexIndex]) {
        self.face_vertex_counts.push(vertices.len() as u32);
        self.indices.extend_from_slice(vertices);
    }

    pub fn push_triangle(&mut self, vertices: [VertexIndex; 3]) {
        self.push_face(&vertices);
    }

    /// Number of face records, empty faces included.
    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }
}

/// How [`import_with_options`] finds previously seen index triples.
///
/// Both strategies assign indices in first-occurrence order, so they produce
/// identical meshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupStrategy {
    /// Compare against every unique triple seen so far. O(n²).
    LinearScan,
    /// Look triples up in a hash map.
    #[default]
    Hashed,
}

/// Options for [`import_with_options`].
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dedup: DedupStrategy,
}

impl ImportOptions {
    pub fn with_dedup(mut self, dedup: DedupStrategy) -> Self {
        self.dedup = dedup;
        self
    }
}

/// Import a raw mesh with default options.
pub fn import(raw: &RawMesh) -> Result<Mesh, ImportError> {
    import_with_options(raw, &ImportOptions::default())
}

/// Import a raw mesh, deduplicating face-vertex index triples into unified
/// vertices.
///
/// Fails if any face has other than 0 or 3 vertices, if the face counts
/// reference more face-vertex records than `raw.indices` holds, or if an
/// allocation fails. Nothing is returned on failure.
///
/// Normals are derived when no face references a valid normal; tangents are
/// derived whenever any face references a valid texcoord. Out-of-range
/// attribute indices read element 0 of their array instead of failing.
pub fn import_with_options(raw: &RawMesh, options: &ImportOptions) -> Result<Mesh, ImportError> {
    profile_function!();

    let referenced = count_face_vertices(&raw.face_vertex_counts)?;
    if referenced > raw.indices.len() {
        return Err(ImportError::MissingFaceIndices {
            expected: referenced,
            available: raw.indices.len(),
        });
    }
    let references = &raw.indices[..referenced];

    let (unique, indices) = {
        profile_scope!("dedup");
        match options.dedup {
            DedupStrategy::LinearScan => dedup_linear(references)?,
            DedupStrategy::Hashed => dedup_hashed(references)?,
        }
    };

    let has_texcoords = unique
        .iter()
        .any(|v| is_set(v.texcoord, raw.texcoords.len()));
    let has_normals = unique.iter().any(|v| is_set(v.normal, raw.normals.len()));

    let mut clamped = 0usize;
    let positions = gather(
        &raw.positions,
        unique.iter().map(|v| v.position),
        Vec3::zeros(),
        &mut clamped,
    )?;
    let texcoords = if has_texcoords {
        Some(gather(
            &raw.texcoords,
            unique.iter().map(|v| v.texcoord),
            Vec2::zeros(),
            &mut clamped,
        )?)
    } else {
        None
    };
    let normals = if has_normals {
        let mut normals = gather(
            &raw.normals,
            unique.iter().map(|v| v.normal),
            Vec3::zeros(),
            &mut clamped,
        )?;
        for normal in &mut normals {
            *normal = normalize_or_zero(*normal);
        }
        normals
    } else {
        log::warn!(
            "Mesh has no normals, deriving them from {} triangles",
            indices.len() / 3
        );
        compute_normals(&positions, &indices)?
    };
    if clamped > 0 {
        log::warn!("Clamped {clamped} out-of-range attribute indices to element 0");
    }

    let tangents = match &texcoords {
        Some(texcoords) => Some(compute_tangents(&positions, texcoords, &normals, &indices)?),
        None => None,
    };

    let diffuse_texture_path = raw
        .diffuse_texture_path
        .as_ref()
        .filter(|path| !path.is_empty())
        .cloned();

    log::debug!(
        "Imported mesh: {} faces, {} references, {} unique vertices \
         (texcoords: {}, derived normals: {})",
        raw.face_count(),
        referenced,
        unique.len(),
        has_texcoords,
        !has_normals
    );

    Ok(Mesh {
        positions,
        texcoords,
        normals,
        tangents,
        indices,
        diffuse_texture_path,
    })
}

fn count_face_vertices(face_vertex_counts: &[u32]) -> Result<usize, ImportError> {
    let mut total = 0usize;
    for (face, &vertex_count) in face_vertex_counts.iter().enumerate() {
        match vertex_count {
            0 | 3 => total += vertex_count as usize,
            _ => return Err(ImportError::UnsupportedFace { face, vertex_count }),
        }
    }
    Ok(total)
}

/// Index 0 and indices past the end of the array are unset.
fn is_set(index: u32, len: usize) -> bool {
    index > 0 && (index as usize) < len
}

fn dedup_linear(references: &[VertexIndex]) -> Result<(Vec<VertexIndex>, Vec<u32>), ImportError> {
    let mut unique: Vec<VertexIndex> = Vec::new();
    let mut indices = Vec::new();
    unique.try_reserve(references.len())?;
    indices.try_reserve_exact(references.len())?;

    for reference in references {
        let index = match unique.iter().position(|seen| seen == reference) {
            Some(index) => index,
            None => {
                unique.push(*reference);
                unique.len() - 1
            }
        };
        indices.push(index as u32);
    }
    Ok((unique, indices))
}

fn dedup_hashed(references: &[VertexIndex]) -> Result<(Vec<VertexIndex>, Vec<u32>), ImportError> {
    let mut lookup: HashMap<VertexIndex, u32> = HashMap::new();
    let mut unique = Vec::new();
    let mut indices = Vec::new();
    lookup.try_reserve(references.len())?;
    unique.try_reserve(references.len())?;
    indices.try_reserve_exact(references.len())?;

    for reference in references {
        let index = *lookup.entry(*reference).or_insert_with(|| {
            unique.push(*reference);
            (unique.len() - 1) as u32
        });
        indices.push(index);
    }
    Ok((unique, indices))
}

/// Copy `source[i]` for each index, falling back to element 0 (or `zero`
/// when the source is empty) for indices past the end.
fn gather<T: Copy>(
    source: &[T],
    indices: impl ExactSizeIterator<Item = u32>,
    zero: T,
    clamped: &mut usize,
) -> Result<Vec<T>, ImportError> {
    let mut values = Vec::new();
    values.try_reserve_exact(indices.len())?;
    for index in indices {
        let value = match source.get(index as usize) {
            Some(value) => *value,
            None => {
                *clamped += 1;
                source.first().copied().unwrap_or(zero)
            }
        };
        values.push(value);
    }
    Ok(values)
}
