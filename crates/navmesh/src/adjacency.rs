//! Face connectivity from shared edges

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::nav_mesh::{Face, FaceIndex};

/// Edge connectivity counts gathered while linking faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AdjacencyStats {
    /// Edges linking exactly two faces
    pub shared_edges: usize,
    /// Edges used by a single face (mesh boundary)
    pub boundary_edges: usize,
    /// Edges used by more than two faces; only the first two are linked
    pub non_manifold_edges: usize,
}

/// Canonical, winding independent key of an edge
#[inline]
pub(crate) fn edge_key(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

struct EdgeEntry {
    first: (usize, usize),
    touches: usize,
}

/// Links every pair of faces sharing an edge.
///
/// The first face to reach an edge registers it; the second links both faces
/// reciprocally. Boundary edges and the extra faces of non-manifold edges keep
/// `None` on that slot.
pub(crate) fn build_adjacency(faces: &mut [Face]) -> AdjacencyStats {
    let mut edges: HashMap<(u32, u32), EdgeEntry> = HashMap::with_capacity(faces.len() * 2);

    for face in 0..faces.len() {
        for slot in 0..3 {
            let (a, b) = faces[face].edge(slot);

            match edges.entry(edge_key(a, b)) {
                Entry::Vacant(vacant) => {
                    vacant.insert(EdgeEntry {
                        first: (face, slot),
                        touches: 1,
                    });
                }
                Entry::Occupied(mut occupied) => {
                    let entry = occupied.get_mut();
                    entry.touches += 1;

                    if entry.touches == 2 {
                        let (other, other_slot) = entry.first;
                        faces[face].connections[slot] = Some(FaceIndex::new(other as u32));
                        faces[other].connections[other_slot] = Some(FaceIndex::new(face as u32));
                    }
                }
            }
        }
    }

    let mut stats = AdjacencyStats::default();
    for entry in edges.values() {
        match entry.touches {
            1 => stats.boundary_edges += 1,
            2 => stats.shared_edges += 1,
            _ => stats.non_manifold_edges += 1,
        }
    }

    if stats.non_manifold_edges > 0 {
        log::warn!(
            "{} edges are shared by more than two faces; extra faces stay unlinked on them",
            stats.non_manifold_edges
        );
    }

    log::debug!(
        "Adjacency: {} shared, {} boundary, {} non-manifold edges",
        stats.shared_edges,
        stats.boundary_edges,
        stats.non_manifold_edges
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn face(indices: [u32; 3]) -> Face {
        Face::new(indices, Vec3::ZERO, 1.0)
    }

    fn assert_symmetric(faces: &[Face]) {
        for (f, face) in faces.iter().enumerate() {
            for (slot, connection) in face.connections.iter().enumerate() {
                if let Some(g) = connection {
                    let other = &faces[g.index()];
                    let back = other
                        .slot_to(FaceIndex::new(f as u32))
                        .expect("missing back link");
                    let (a, b) = face.edge(slot);
                    let (c, d) = other.edge(back);
                    assert_eq!(edge_key(a, b), edge_key(c, d));
                }
            }
        }
    }

    #[test]
    fn test_edge_key_is_order_independent() {
        assert_eq!(edge_key(4, 2), (2, 4));
        assert_eq!(edge_key(2, 4), (2, 4));
    }

    #[test]
    fn test_links_shared_edge_regardless_of_winding() {
        let mut faces = vec![face([0, 1, 2]), face([1, 3, 2])];
        let stats = build_adjacency(&mut faces);

        assert_eq!(faces[0].connections, [None, Some(FaceIndex::new(1)), None]);
        assert_eq!(faces[1].connections, [None, None, Some(FaceIndex::new(0))]);
        assert_eq!(stats.shared_edges, 1);
        assert_eq!(stats.boundary_edges, 4);
        assert_symmetric(&faces);
    }

    #[test]
    fn test_non_manifold_edge_links_first_pair_only() {
        let mut faces = vec![face([0, 1, 2]), face([1, 0, 3]), face([0, 1, 4])];
        let stats = build_adjacency(&mut faces);

        assert_eq!(faces[0].connections[0], Some(FaceIndex::new(1)));
        assert_eq!(faces[1].connections[0], Some(FaceIndex::new(0)));
        assert_eq!(faces[2].connections, [None; 3]);
        assert_eq!(stats.non_manifold_edges, 1);
        assert_symmetric(&faces);
    }

    #[test]
    fn test_fan_around_vertex() {
        // Six triangles around vertex 0
        let mut faces: Vec<Face> = (0..6)
            .map(|i| face([0, 1 + i, 1 + (i + 1) % 6]))
            .collect();
        let stats = build_adjacency(&mut faces);

        assert_eq!(stats.shared_edges, 6);
        assert_eq!(stats.boundary_edges, 6);
        for f in &faces {
            assert_eq!(f.neighbors().count(), 2);
        }
        assert_symmetric(&faces);
    }

    #[test]
    fn test_disconnected_faces() {
        let mut faces = vec![face([0, 1, 2]), face([3, 4, 5])];
        let stats = build_adjacency(&mut faces);
        assert!(faces.iter().all(|f| f.neighbors().next().is_none()));
        assert_eq!(stats.boundary_edges, 6);
    }
}
