//! 2D geometry operations on the XZ plane
//!
//! Navigation queries are 2.5-D: membership and orientation tests ignore height
//! and work on the XZ projection of the mesh (Y-up coordinate system).

use glam::Vec3;

/// Calculate twice the signed area of a triangle projected on the XZ plane.
///
/// The sign gives the winding of `a -> b -> c` seen from above:
/// - Positive: `c` lies to the right of the ray `a -> b`
/// - Negative: `c` lies to the left of the ray `a -> b`
/// - Zero: degenerate (collinear points)
#[inline]
pub fn tri_area_2d(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let abx = b.x - a.x;
    let abz = b.z - a.z;
    let acx = c.x - a.x;
    let acz = c.z - a.z;
    acx * abz - abx * acz
}

/// Unsigned area of a triangle projected on the XZ plane.
#[inline]
pub fn tri_area_2d_abs(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    tri_area_2d(a, b, c).abs() * 0.5
}

/// Calculate squared distance between two points on the XZ plane.
#[inline]
pub fn dist_sqr_2d(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}

/// Calculate distance between two points on the XZ plane.
#[inline]
pub fn dist_2d(a: Vec3, b: Vec3) -> f32 {
    dist_sqr_2d(a, b).sqrt()
}

/// Checks whether two points coincide on the XZ plane, within `eps_sqr` squared length.
#[inline]
pub fn v_equal_2d(a: Vec3, b: Vec3, eps_sqr: f32) -> bool {
    dist_sqr_2d(a, b) < eps_sqr
}

/// Rotates the XZ component of `dir` a quarter turn to its right side.
///
/// "Right" is the side where [`tri_area_2d`] is positive, so for any `p`,
/// `tri_area_2d(p, p + dir, p + perp_right_2d(dir)) > 0` unless `dir` is zero.
#[inline]
pub fn perp_right_2d(dir: Vec3) -> Vec3 {
    Vec3::new(dir.z, 0.0, -dir.x)
}

/// Dot product of the XZ components of two vectors.
#[inline]
pub fn dot_2d(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.z * b.z
}

/// Tests whether `p` lies inside (or on the boundary of) triangle `abc` on the XZ plane.
///
/// Uses the area-sum test: the three sub-triangles formed by `p` and each edge
/// must add up to the full triangle area. `eps` is an absolute tolerance on the
/// area for triangles up to unit area and scales with the area beyond that.
/// Triangles with no projected area never contain anything.
pub fn point_in_triangle_2d(p: Vec3, a: Vec3, b: Vec3, c: Vec3, eps: f32) -> bool {
    let area = tri_area_2d_abs(a, b, c);
    if area <= f32::EPSILON {
        return false;
    }

    let sub = tri_area_2d_abs(p, a, b) + tri_area_2d_abs(p, b, c) + tri_area_2d_abs(p, c, a);
    (sub - area).abs() <= eps * area.max(1.0)
}

/// Calculate the squared distance from a point to a line segment on the XZ plane.
pub fn dist_point_segment_sqr_2d(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    let px = p.x - a.x;
    let pz = p.z - a.z;

    let d = dx * dx + dz * dz;
    if d < f32::EPSILON {
        return px * px + pz * pz;
    }

    let t = ((px * dx + pz * dz) / d).clamp(0.0, 1.0);
    let qx = a.x + t * dx - p.x;
    let qz = a.z + t * dz - p.z;
    qx * qx + qz * qz
}

/// Axis-aligned bounds of a set of points, or `None` for an empty set.
pub fn calc_bounds<I>(points: I) -> Option<(Vec3, Vec3)>
where
    I: IntoIterator<Item = Vec3>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
}
