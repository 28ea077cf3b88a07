//! Math type aliases and helper functions.
//!
//! All rendering math is f32 and backed by nalgebra.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Squared-length tolerance used by [`normalize_or_zero`].
pub const SMALL_ABSOLUTE_FLOAT: f32 = 1.0e-8;

/// Normalize a vector, returning the zero vector when it is too short.
///
/// Vectors already within tolerance of unit length are returned unchanged.
pub fn normalize_or_zero<const D: usize>(
    v: nalgebra::SVector<f32, D>,
) -> nalgebra::SVector<f32, D> {
    let square_magnitude = v.norm_squared();
    if (square_magnitude - 1.0).abs() < SMALL_ABSOLUTE_FLOAT {
        v
    } else if square_magnitude < SMALL_ABSOLUTE_FLOAT {
        nalgebra::SVector::zeros()
    } else {
        v / square_magnitude.sqrt()
    }
}

/// Clamp a scalar to `[0, 1]`.
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Upper-left 3x3 (direction-only) part of a 4x4 transform.
pub fn upper_3x3(m: &Mat4) -> Mat3 {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Build a right-handed perspective projection with OpenGL depth range [-1, 1].
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov / 2.0).tan();
    let nf = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0,  0.0,                  0.0,
        0.0,        f,    0.0,                  0.0,
        0.0,        0.0,  (zfar + znear) * nf,  2.0 * znear * zfar * nf,
        0.0,        0.0,  -1.0,                 0.0,
    );
    result
}

/// Build a right-handed orthographic projection with OpenGL depth range [-1, 1].
pub fn orthographic_rh(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
    let fmn = far - near;
    #[rustfmt::skip]
    let result = Mat4::new(
        2.0 / width, 0.0,          0.0,         0.0,
        0.0,         2.0 / height, 0.0,         0.0,
        0.0,         0.0,          -2.0 / fmn,  -(far + near) / fmn,
        0.0,         0.0,          0.0,         1.0,
    );
    result
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let eye_point = nalgebra::Point3::from(*eye);
    let target_point = nalgebra::Point3::from(*target);
    nalgebra::Isometry3::look_at_rh(&eye_point, &target_point, up).to_homogeneous()
}
