//! Raw mesh generators for common shapes.
//!
//! These generators produce [`RawMesh`] values shaped like parser output:
//! independent position/texcoord/normal streams with element 0 reserved.
//! Run them through [`import`](super::import) to get a renderable [`Mesh`](super::Mesh).

use std::f32::consts::PI;

use crate::math::{Vec2, Vec3};

use super::import::{RawMesh, VertexIndex};

/// Generate a UV sphere.
///
/// Each pole is a single position and the seam column reuses the positions
/// of the first column, so those points appear in several index triples with
/// different texcoords. Texcoords are a full `(rings + 1) x (segments + 1)`
/// grid with `v = 1` at the north (+Y) pole. Normals share the position
/// indexing. Triangles wind counter-clockwise seen from outside.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments, at least 3
/// * `rings` - Number of latitudinal rings from pole to pole, at least 2
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> RawMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut raw = RawMesh::new();

    let north = raw.push_position(Vec3::new(0.0, radius, 0.0));
    raw.push_normal(Vec3::y());
    let south = raw.push_position(Vec3::new(0.0, -radius, 0.0));
    raw.push_normal(-Vec3::y());

    for ring in 1..rings {
        let theta = ring as f32 * PI / rings as f32;
        for segment in 0..segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let direction =
                Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            raw.push_position(direction * radius);
            raw.push_normal(direction);
        }
    }

    for ring in 0..=rings {
        for segment in 0..=segments {
            raw.push_texcoord(Vec2::new(
                segment as f32 / segments as f32,
                1.0 - ring as f32 / rings as f32,
            ));
        }
    }

    let corner = |ring: u32, segment: u32| {
        let position = if ring == 0 {
            north
        } else if ring == rings {
            south
        } else {
            south + 1 + (ring - 1) * segments + segment % segments
        };
        let texcoord = 1 + ring * (segments + 1) + segment;
        VertexIndex::new(position, texcoord, position)
    };

    for ring in 0..rings {
        for segment in 0..segments {
            let a = corner(ring, segment);
            let b = corner(ring + 1, segment);
            let c = corner(ring, segment + 1);
            let d = corner(ring + 1, segment + 1);

            // The band touching a pole keeps only its non-degenerate half.
            if ring > 0 {
                raw.push_triangle([a, c, b]);
            }
            if ring + 1 < rings {
                raw.push_triangle([c, d, b]);
            }
        }
    }

    raw
}

/// Generate a quad on the XY plane facing +Z.
///
/// The quad is centered at the origin. UV coordinates go from (0,0) at the
/// bottom-left to (1,1) at the top-right. No normals are supplied, so
/// importing the quad derives them along with tangents.
///
/// # Arguments
///
/// * `half_width` - Half the width of the quad along the X axis
/// * `half_height` - Half the height of the quad along the Y axis
pub fn generate_quad(half_width: f32, half_height: f32) -> RawMesh {
    let mut raw = RawMesh::new();
    let corners = [
        (Vec3::new(-half_width, -half_height, 0.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(half_width, -half_height, 0.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(half_width, half_height, 0.0), Vec2::new(1.0, 1.0)),
        (Vec3::new(-half_width, half_height, 0.0), Vec2::new(0.0, 1.0)),
    ];
    let vertices = corners.map(|(position, texcoord)| {
        VertexIndex::new(raw.push_position(position), raw.push_texcoord(texcoord), 0)
    });

    raw.push_triangle([vertices[0], vertices[1], vertices[2]]);
    raw.push_triangle([vertices[2], vertices[3], vertices[0]]);
    raw
}
