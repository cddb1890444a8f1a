//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The [`Transform`](crate::transform::Transform)
//! component lives in its own module since it's a store kind, not a plain
//! math type.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Degrees-to-radians factor, for call sites that keep angles in degrees.
pub const DEG2RAD: f32 = std::f32::consts::PI / 180.0;

/// Radians-to-degrees factor.
pub const RAD2DEG: f32 = 180.0 / std::f32::consts::PI;

/// Rotate a direction vector by the rotation/scale part of `matrix`,
/// ignoring translation.
///
/// Uses the inverse-transpose of the upper 3×3 — the same "normal matrix"
/// a shader applies to normals — so directions stay correct under
/// non-uniform scale.
pub fn rotate_direction(matrix: Mat4, direction: Vec3) -> Vec3 {
    let linear = Mat3::from_mat4(matrix);
    linear.inverse().transpose() * direction
}
