//! Point location: which face is a world point standing on

use glam::Vec3;
use navmesh_common::point_in_triangle_2d;

use crate::bvh_tree::{fringe_scale, Aabb2d};
use crate::nav_mesh::{FaceIndex, NavMesh};
use crate::QueryConfig;

/// A face whose footprint contains the query point
#[derive(Debug, Clone, Copy)]
struct Candidate {
    face: FaceIndex,
    below: bool,
    distance: f32,
}

impl Candidate {
    /// Faces at or below the point win over faces above it, then the closest in height wins
    fn is_better_than(&self, other: &Candidate) -> bool {
        match (self.below, other.below) {
            (true, false) => true,
            (false, true) => false,
            _ => self.distance < other.distance,
        }
    }
}

/// Finds the face containing `point` in the XZ projection.
///
/// When several walkable surfaces overlap (a bridge over a floor), the face
/// whose centroid is closest below the point is chosen; if every match is
/// above the point, the closest one above is used. Ties go to the lowest
/// face index.
pub(crate) fn locate_face(mesh: &NavMesh, point: Vec3, config: &QueryConfig) -> Option<FaceIndex> {
    if !point.is_finite() || mesh.is_empty() {
        return None;
    }

    let mut best: Option<Candidate> = None;
    let mut consider = |face: FaceIndex| {
        let Some(candidate) = classify(mesh, face, point, config) else {
            return;
        };
        if best.as_ref().map_or(true, |b| candidate.is_better_than(b)) {
            best = Some(candidate);
        }
    };

    match mesh.bv_tree() {
        Some(tree) => tree
            .query_point(point, config.area_epsilon)
            .into_iter()
            .for_each(&mut consider),
        None => (0..mesh.face_count())
            .map(|i| FaceIndex::new(i as u32))
            .for_each(&mut consider),
    }

    best.map(|c| c.face)
}

fn classify(mesh: &NavMesh, face: FaceIndex, point: Vec3, config: &QueryConfig) -> Option<Candidate> {
    let data = mesh.face(face)?;
    let corners = mesh.face_corners(data);
    let margin = config.area_epsilon.max(0.0) * fringe_scale(corners);
    if !Aabb2d::from_triangle(corners, 0.0).contains_point_within(point, margin) {
        return None;
    }

    let [a, b, c] = corners;
    if !point_in_triangle_2d(point, a, b, c, config.area_epsilon) {
        return None;
    }

    let offset = point.y - data.center.y;
    Some(Candidate {
        face,
        below: offset >= -config.height_tolerance,
        distance: offset.abs(),
    })
}
