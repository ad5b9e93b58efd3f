//! Portals: the shared edges a face corridor passes through

use glam::Vec3;
use navmesh_common::{dot_2d, perp_right_2d};

use crate::nav_mesh::{FaceIndex, NavMesh};
use crate::{QueryResult, Status};

/// Shared edge between two consecutive faces of a corridor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Portal {
    /// Vertex on the left of the travel direction
    pub left_index: u32,
    /// Vertex on the right of the travel direction
    pub right_index: u32,
    /// Left end of the edge after the agent radius inset
    pub left: Vec3,
    /// Right end of the edge after the agent radius inset
    pub right: Vec3,
}

impl Portal {
    /// Midpoint of the inset edge
    pub fn midpoint(&self) -> Vec3 {
        (self.left + self.right) * 0.5
    }

    /// Length of the inset edge
    pub fn width(&self) -> f32 {
        self.left.distance(self.right)
    }
}

/// Builds one portal per consecutive face pair of `path`.
///
/// Edge endpoints are pulled towards each other by `agent_radius`; edges
/// narrower than the agent collapse to their midpoint.
pub(crate) fn build_portals(
    mesh: &NavMesh,
    path: &[FaceIndex],
    agent_radius: f32,
) -> QueryResult<Vec<Portal>> {
    if !agent_radius.is_finite() || agent_radius < 0.0 {
        return Err(Status::InvalidParam);
    }

    path.windows(2)
        .map(|pair| portal_between(mesh, pair[0], pair[1], agent_radius))
        .collect()
}

fn portal_between(
    mesh: &NavMesh,
    from: FaceIndex,
    to: FaceIndex,
    agent_radius: f32,
) -> QueryResult<Portal> {
    let current = mesh.face(from).ok_or(Status::InvalidParam)?;
    let next = mesh.face(to).ok_or(Status::InvalidParam)?;
    let slot = current.slot_to(to).ok_or(Status::PathInvalid)?;

    let (a, b) = current.edge(slot);
    let pa = mesh.vertex(a).ok_or(Status::PathInvalid)?;
    let pb = mesh.vertex(b).ok_or(Status::PathInvalid)?;

    let heading = next.center - current.center;
    let right_dir = perp_right_2d(heading);
    let (right_index, left_index, mut right, mut left) =
        if dot_2d(pa - current.center, right_dir) >= dot_2d(pb - current.center, right_dir) {
            (a, b, pa, pb)
        } else {
            (b, a, pb, pa)
        };

    let edge = left - right;
    let length = edge.length();
    let degenerate = dot_2d(heading, heading) <= f32::EPSILON || length <= f32::EPSILON;

    if agent_radius > 0.0 && !degenerate {
        if 2.0 * agent_radius >= length {
            let mid = (left + right) * 0.5;
            left = mid;
            right = mid;
        } else {
            let inset = edge / length * agent_radius;
            right += inset;
            left -= inset;
        }
    }

    Ok(Portal {
        left_index,
        right_index,
        left,
        right,
    })
}
