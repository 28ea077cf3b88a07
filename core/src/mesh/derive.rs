//! Derived per-vertex attributes: normals and tangent frames.

use crate::math::{normalize_or_zero, Vec2, Vec3, Vec4};
use crate::profile_function;

use super::ImportError;

fn triangle(indices: &[u32]) -> [usize; 3] {
    [
        indices[0] as usize,
        indices[1] as usize,
        indices[2] as usize,
    ]
}

fn check_indices(indices: &[u32], vertex_count: usize) -> Result<(), ImportError> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(ImportError::IndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

fn check_len(attribute: &'static str, actual: usize, expected: usize) -> Result<(), ImportError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ImportError::MismatchedAttributes {
            attribute,
            expected,
            actual,
        })
    }
}

fn zeroed<T: Clone>(count: usize, zero: T) -> Result<Vec<T>, ImportError> {
    let mut values = Vec::new();
    values.try_reserve_exact(count)?;
    values.resize(count, zero);
    Ok(values)
}

/// Compute area-weighted unit vertex normals.
///
/// Each triangle contributes its unnormalized face normal `(p1 - p0) x
/// (p2 - p0)` (right-handed, counter-clockwise winding) to its three
/// vertices, so larger triangles weigh more. Vertices no triangle touches
/// keep a zero normal.
///
/// Trailing indices that do not form a whole triangle are ignored. Fails with
/// [`ImportError::IndexOutOfRange`] if any index is `>= positions.len()`.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Result<Vec<Vec3>, ImportError> {
    profile_function!();
    check_indices(indices, positions.len())?;

    let mut normals = zeroed(positions.len(), Vec3::zeros())?;
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = triangle(tri);
        let u = positions[i1] - positions[i0];
        let v = positions[i2] - positions[i0];
        let n = u.cross(&v);
        normals[i0] += n;
        normals[i1] += n;
        normals[i2] += n;
    }
    for normal in &mut normals {
        *normal = normalize_or_zero(*normal);
    }
    Ok(normals)
}

/// Compute per-vertex tangent frames with Lengyel's method.
///
/// Triangles with a degenerate UV mapping (zero determinant) contribute zero
/// tangent and bitangent. Each accumulated tangent is Gram-Schmidt
/// orthogonalized against the vertex normal and normalized; `w` holds the
/// handedness, `-1.0` when `cross(n, t)` points away from the accumulated
/// bitangent and `+1.0` otherwise.
///
/// `normals` must already be unit length. `texcoords` and `normals` must be
/// as long as `positions` ([`ImportError::MismatchedAttributes`]) and every
/// index must address a position ([`ImportError::IndexOutOfRange`]).
pub fn compute_tangents(
    positions: &[Vec3],
    texcoords: &[Vec2],
    normals: &[Vec3],
    indices: &[u32],
) -> Result<Vec<Vec4>, ImportError> {
    profile_function!();

    let vertex_count = positions.len();
    check_len("texcoords", texcoords.len(), vertex_count)?;
    check_len("normals", normals.len(), vertex_count)?;
    check_indices(indices, vertex_count)?;

    let mut tangents = zeroed(vertex_count, Vec3::zeros())?;
    let mut bitangents = zeroed(vertex_count, Vec3::zeros())?;

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = triangle(tri);
        let e1 = positions[i1] - positions[i0];
        let e2 = positions[i2] - positions[i0];
        let x1 = texcoords[i1].x - texcoords[i0].x;
        let x2 = texcoords[i2].x - texcoords[i0].x;
        let y1 = texcoords[i1].y - texcoords[i0].y;
        let y2 = texcoords[i2].y - texcoords[i0].y;

        let d = x1 * y2 - x2 * y1;
        let (tangent, bitangent) = if d == 0.0 {
            (Vec3::zeros(), Vec3::zeros())
        } else {
            let r = 1.0 / d;
            ((e1 * y2 - e2 * y1) * r, (e2 * x1 - e1 * x2) * r)
        };
        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    let mut frames = zeroed(vertex_count, Vec4::zeros())?;
    for (v, frame) in frames.iter_mut().enumerate() {
        let n = normals[v];
        let t = normalize_or_zero(tangents[v] - n * n.dot(&tangents[v]));
        let handedness = if n.cross(&t).dot(&bitangents[v]) < 0.0 {
            -1.0
        } else {
            1.0
        };
        *frame = Vec4::new(t.x, t.y, t.z, handedness);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_triangle() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_flat_triangle_normal_is_plus_z() {
        let normals = compute_normals(&flat_triangle(), &[0, 1, 2]).unwrap();
        for n in normals {
            assert_eq!(n, Vec3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_clockwise_winding_flips_normal() {
        let normals = compute_normals(&flat_triangle(), &[0, 2, 1]).unwrap();
        assert_eq!(normals[0], Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_untouched_vertex_keeps_zero_normal() {
        let mut positions = flat_triangle();
        positions.push(Vec3::new(5.0, 5.0, 5.0));
        let normals = compute_normals(&positions, &[0, 1, 2]).unwrap();
        assert_eq!(normals[3], Vec3::zeros());
    }

    #[test]
    fn test_normals_are_area_weighted() {
        // Vertex 0 is shared; the large triangle faces +z, the small one +y.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.0, -0.1),
        ];
        let normals = compute_normals(&positions, &[0, 1, 2, 0, 1, 3]).unwrap();
        let shared = normals[0];
        assert!(shared.z > shared.y);
        assert!(shared.y > 0.0);
        assert!((shared.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normals_reject_out_of_range_index() {
        let err = compute_normals(&flat_triangle(), &[0, 1, 7]).unwrap_err();
        assert_eq!(
            err,
            ImportError::IndexOutOfRange {
                index: 7,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_tangents_reject_short_texcoords() {
        let texcoords = vec![Vec2::zeros(); 2];
        let normals = vec![Vec3::z(); 3];
        let err = compute_tangents(&flat_triangle(), &texcoords, &normals, &[0, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            ImportError::MismatchedAttributes {
                attribute: "texcoords",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_tangents_reject_short_normals() {
        let texcoords = vec![Vec2::zeros(); 3];
        let normals = vec![Vec3::z(); 1];
        let err = compute_tangents(&flat_triangle(), &texcoords, &normals, &[0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MismatchedAttributes {
                attribute: "normals",
                ..
            }
        ));
    }

    #[test]
    fn test_tangents_reject_out_of_range_index() {
        let texcoords = vec![Vec2::zeros(); 3];
        let normals = vec![Vec3::z(); 3];
        let err = compute_tangents(&flat_triangle(), &texcoords, &normals, &[0, 3, 2]).unwrap_err();
        assert_eq!(
            err,
            ImportError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_tangent_follows_u_direction() {
        let positions = flat_triangle();
        let texcoords = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let normals = vec![Vec3::z(); 3];
        let tangents = compute_tangents(&positions, &texcoords, &normals, &[0, 1, 2]).unwrap();
        for t in tangents {
            assert!((t.xyz() - Vec3::x()).norm() < 1e-6);
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn test_mirrored_uv_gives_negative_handedness() {
        let positions = flat_triangle();
        let texcoords = vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)];
        let normals = vec![Vec3::z(); 3];
        let tangents = compute_tangents(&positions, &texcoords, &normals, &[0, 1, 2]).unwrap();
        for t in tangents {
            assert!((t.xyz() + Vec3::x()).norm() < 1e-6);
            assert_eq!(t.w, -1.0);
        }
    }

    #[test]
    fn test_degenerate_uv_contributes_zero() {
        let positions = flat_triangle();
        let texcoords = vec![Vec2::new(0.5, 0.5); 3];
        let normals = vec![Vec3::z(); 3];
        let tangents = compute_tangents(&positions, &texcoords, &normals, &[0, 1, 2]).unwrap();
        for t in tangents {
            assert_eq!(t.xyz(), Vec3::zeros());
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn test_tangent_is_orthogonal_to_normal() {
        let positions = flat_triangle();
        let texcoords = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.2), Vec2::new(0.1, 1.0)];
        let tilted = Vec3::new(0.0, 0.3, 1.0).normalize();
        let normals = vec![tilted; 3];
        let tangents = compute_tangents(&positions, &texcoords, &normals, &[0, 1, 2]).unwrap();
        for t in tangents {
            assert!(t.xyz().dot(&tilted).abs() < 1e-5);
            assert!((t.xyz().norm() - 1.0).abs() < 1e-5);
        }
    }
}
