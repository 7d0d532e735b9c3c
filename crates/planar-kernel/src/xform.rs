//! Builders for the homogeneous transforms fed to [`Kernel::transform`].
//!
//! [`Kernel::transform`]: crate::traits::Kernel::transform

use nalgebra::{Matrix4, Rotation3, Vector3};

pub fn translation(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(dx, dy, dz))
}

pub fn rotation_x_deg(degrees: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.to_radians()).to_homogeneous()
}

pub fn rotation_y_deg(degrees: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.to_radians()).to_homogeneous()
}

pub fn rotation_z_deg(degrees: f64) -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians()).to_homogeneous()
}

/// Reflection across the x = 0 plane.
pub fn mirror_x() -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0))
}

/// Reflection across the y = 0 plane.
pub fn mirror_y() -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, -1.0, 1.0))
}

/// Reflection across the horizontal plane at height `z`.
pub fn mirror_z_at(z: f64) -> Matrix4<f64> {
    translation(0.0, 0.0, 2.0 * z) * Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0))
}

/// Determinant of the linear 3x3 block. Negative means the transform flips
/// orientation and tessellation must reverse triangle winding.
pub fn linear_determinant(m: &Matrix4<f64>) -> f64 {
    m.fixed_view::<3, 3>(0, 0).clone_owned().determinant()
}
