//! Bounding Volume Hierarchy (BVH) over navmesh faces
//!
//! Point location only needs the XZ footprint of each face, so the tree is
//! built and queried on the horizontal plane. It replaces the O(n) scan over
//! all faces with an O(log n) descent. Each footprint is grown by the reach of
//! the locator's area tolerance, see [`fringe_scale`], and the locator applies
//! the same grown footprint on a linear scan, so both find the same faces.

use glam::Vec3;
use navmesh_common::{dist_2d, tri_area_2d_abs};

use crate::nav_mesh::{Face, FaceIndex};

/// How far the tolerant area test of a triangle reaches past its edges, per
/// unit of area epsilon.
///
/// A point `h` outside an edge of length `l` grows the sub-area sum by `l * h`,
/// and the test accepts up to `eps * max(1, area)`, so the fringe is widest
/// across the shortest edge. Triangles with no projected area contain nothing.
pub fn fringe_scale(corners: [Vec3; 3]) -> f32 {
    let [a, b, c] = corners;
    let area = tri_area_2d_abs(a, b, c);
    let shortest = dist_2d(a, b).min(dist_2d(b, c)).min(dist_2d(c, a));
    if area <= f32::EPSILON || shortest <= f32::EPSILON {
        return 0.0;
    }
    area.max(1.0) / shortest
}

/// Axis-aligned rectangle on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2d {
    /// Minimum x and z (y unused)
    pub min: Vec3,
    /// Maximum x and z (y unused)
    pub max: Vec3,
}

impl Aabb2d {
    /// Creates an empty box (invalid bounds)
    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f32::MAX, 0.0, f32::MAX),
            max: Vec3::new(f32::MIN, 0.0, f32::MIN),
        }
    }

    /// Footprint of a triangle, grown by `margin` on every side
    pub fn from_triangle(corners: [Vec3; 3], margin: f32) -> Self {
        let mut bounds = Self::empty();
        for corner in corners {
            bounds.expand_point(corner);
        }
        bounds.min -= Vec3::new(margin, 0.0, margin);
        bounds.max += Vec3::new(margin, 0.0, margin);
        bounds
    }

    /// Expands this box to include another box
    pub fn expand(&mut self, other: &Aabb2d) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Expands this box to include a point
    pub fn expand_point(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.z = self.max.z.max(point.z);
    }

    /// Checks if the point's XZ projection lies inside the box
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.contains_point_within(point, 0.0)
    }

    /// Checks if the point's XZ projection lies inside the box grown by `margin`
    pub fn contains_point_within(&self, point: Vec3, margin: f32) -> bool {
        point.x >= self.min.x - margin
            && point.x <= self.max.x + margin
            && point.z >= self.min.z - margin
            && point.z <= self.max.z + margin
    }

    /// Gets the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Axis (0 = x, 2 = z) along which the box is widest
    fn longest_axis(&self) -> usize {
        if self.max.x - self.min.x >= self.max.z - self.min.z {
            0
        } else {
            2
        }
    }
}

/// Item stored in the BVH tree
#[derive(Debug, Clone)]
struct BvhItem {
    face: FaceIndex,
    bounds: Aabb2d,
    fringe: f32,
}

/// Node in the BVH tree
#[derive(Debug, Clone)]
enum BvhNode {
    Leaf {
        bounds: Aabb2d,
        fringe: f32,
        items: Vec<BvhItem>,
    },
    Internal {
        bounds: Aabb2d,
        fringe: f32,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Bounds of the subtree and the widest fringe below it
    fn extent(&self) -> (&Aabb2d, f32) {
        match self {
            BvhNode::Leaf { bounds, fringe, .. } => (bounds, *fringe),
            BvhNode::Internal { bounds, fringe, .. } => (bounds, *fringe),
        }
    }

    fn query_point(&self, point: Vec3, epsilon: f32, results: &mut Vec<FaceIndex>) {
        let (bounds, fringe) = self.extent();
        if !bounds.contains_point_within(point, epsilon * fringe) {
            return;
        }

        match self {
            BvhNode::Leaf { items, .. } => {
                results.extend(
                    items
                        .iter()
                        .filter(|item| item.bounds.contains_point_within(point, epsilon * item.fringe))
                        .map(|item| item.face),
                );
            }
            BvhNode::Internal { left, right, .. } => {
                left.query_point(point, epsilon, results);
                right.query_point(point, epsilon, results);
            }
        }
    }
}

/// Bounding volume tree over face footprints
#[derive(Debug, Clone)]
pub struct FaceBvh {
    root: BvhNode,
}

impl FaceBvh {
    /// Maximum items per leaf node
    const MAX_LEAF_SIZE: usize = 4;

    /// Builds the tree from the faces of a mesh
    pub fn build(vertices: &[Vec3], faces: &[Face]) -> Self {
        let items = faces
            .iter()
            .enumerate()
            .map(|(i, face)| {
                let corners = face.indices.map(|v| vertices[v as usize]);
                BvhItem {
                    face: FaceIndex::new(i as u32),
                    bounds: Aabb2d::from_triangle(corners, 0.0),
                    fringe: fringe_scale(corners),
                }
            })
            .collect();

        Self {
            root: Self::build_node(items),
        }
    }

    /// Recursively splits items at the median center along the widest axis
    fn build_node(mut items: Vec<BvhItem>) -> BvhNode {
        let mut bounds = Aabb2d::empty();
        let mut fringe = 0.0f32;
        for item in &items {
            bounds.expand(&item.bounds);
            fringe = fringe.max(item.fringe);
        }

        if items.len() <= Self::MAX_LEAF_SIZE {
            return BvhNode::Leaf {
                bounds,
                fringe,
                items,
            };
        }

        let axis = bounds.longest_axis();
        items.sort_by(|a, b| {
            a.bounds.center()[axis]
                .total_cmp(&b.bounds.center()[axis])
                .then(a.face.cmp(&b.face))
        });

        let right_items = items.split_off(items.len() / 2);

        BvhNode::Internal {
            bounds,
            fringe,
            left: Box::new(Self::build_node(items)),
            right: Box::new(Self::build_node(right_items)),
        }
    }

    /// Faces whose footprint, grown by `area_epsilon` times its [`fringe_scale`],
    /// contains the XZ projection of `point`, in ascending index order
    pub fn query_point(&self, point: Vec3, area_epsilon: f32) -> Vec<FaceIndex> {
        let mut results = Vec::new();
        self.root.query_point(point, area_epsilon.max(0.0), &mut results);
        results.sort_unstable();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mesh_helpers::*;

    #[test]
    fn test_aabb_contains_point_ignores_height() {
        let bounds = Aabb2d::from_triangle([Vec3::ZERO, Vec3::X, Vec3::new(0.0, 5.0, 1.0)], 0.0);
        assert!(bounds.contains_point(Vec3::new(0.5, -100.0, 0.5)));
        assert!(bounds.contains_point(Vec3::new(1.0, 0.0, 1.0)));
        assert!(!bounds.contains_point(Vec3::new(1.1, 0.0, 0.5)));
    }

    #[test]
    fn test_bvh_query_matches_linear_scan() {
        let mesh = create_grid_navmesh(8, 6);
        let bvh = FaceBvh::build(mesh.vertices(), mesh.faces());
        let epsilon = 1e-3;

        for p in [
            Vec3::new(0.25, 0.0, 0.25),
            Vec3::new(3.5, 2.0, 4.1),
            Vec3::new(7.9, 0.0, 5.9),
            Vec3::new(4.0, 0.0, 3.0),
        ] {
            let expected: Vec<FaceIndex> = mesh
                .iter_faces()
                .filter(|(_, face)| {
                    let corners = mesh.face_corners(face);
                    Aabb2d::from_triangle(corners, 0.0)
                        .contains_point_within(p, epsilon * fringe_scale(corners))
                })
                .map(|(index, _)| index)
                .collect();

            assert!(!expected.is_empty());
            assert_eq!(bvh.query_point(p, epsilon), expected);
        }
    }

    #[test]
    fn test_bvh_query_outside() {
        let mesh = create_grid_navmesh(4, 4);
        let bvh = FaceBvh::build(mesh.vertices(), mesh.faces());
        assert!(bvh.query_point(Vec3::new(-1.0, 0.0, 2.0), 1e-3).is_empty());
        assert!(bvh.query_point(Vec3::new(2.0, 0.0, 4.5), 1e-3).is_empty());
    }

    #[test]
    fn test_fringe_scale() {
        let unit = [Vec3::ZERO, Vec3::X, Vec3::Z];
        assert_eq!(fringe_scale(unit), 1.0);

        // Small triangles keep the unit area floor, so their fringe grows as they shrink
        let tiny = unit.map(|v| v * 0.01);
        assert!((fringe_scale(tiny) - 100.0).abs() < 1e-3);

        let large = unit.map(|v| v * 100.0);
        assert!((fringe_scale(large) - 50.0).abs() < 1e-3);

        let flat = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert_eq!(fringe_scale(flat), 0.0);
    }
}
