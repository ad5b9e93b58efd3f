//! Math utilities for surface classification

use glam::Vec3;

/// Calculates the unnormalized geometric normal `(b - a) x (c - a)` of a triangle
#[inline]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Cosine of the angle between a triangle's normal and the `down` direction.
///
/// Returns 0 for degenerate triangles or a zero `down` vector.
pub fn surface_dot(a: Vec3, b: Vec3, c: Vec3, down: Vec3) -> f32 {
    triangle_normal(a, b, c)
        .normalize_or_zero()
        .dot(down.normalize_or_zero())
}

/// Converts a maximum walkable slope in degrees into a threshold for [`surface_dot`].
///
/// Angles of 90 degrees or more give exactly 0, so a face is walkable when its
/// normal has any positive component along `down`.
pub fn walkable_threshold(max_slope_angle: f32) -> f32 {
    if max_slope_angle >= 90.0 {
        0.0
    } else {
        max_slope_angle.max(0.0).to_radians().cos()
    }
}
