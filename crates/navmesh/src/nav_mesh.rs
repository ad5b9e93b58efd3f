//! Navigation mesh data: vertices, walkable faces and their connectivity
//!
//! A [`NavMesh`] is built once from raw triangles and never mutated afterwards.
//! Face and vertex indices are stable for the lifetime of the mesh, so callers
//! may cache [`FaceIndex`] values across frames.

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use navmesh_common::{calc_bounds, Error, Result, TriMesh};
use web_time::Instant;

use crate::adjacency::{build_adjacency, edge_key, AdjacencyStats};
use crate::bvh_tree::FaceBvh;
use crate::ingest::ingest;
use crate::BuildConfig;

/// Index of a face within its navigation mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FaceIndex(u32);

impl FaceIndex {
    /// Creates a face index from its raw value
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index value
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Position of the face in [`NavMesh::faces`]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A walkable triangle of the navigation mesh
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Face {
    /// Vertex indices into [`NavMesh::vertices`]
    pub indices: [u32; 3],
    /// Neighbour across edge slot `i`, the edge from `indices[i]` to `indices[(i + 1) % 3]`
    pub connections: [Option<FaceIndex>; 3],
    /// Unweighted centroid of the three corners
    pub center: Vec3,
    /// Cosine between the face normal and the build's down vector
    pub dot: f32,
}

impl Face {
    pub(crate) fn new(indices: [u32; 3], center: Vec3, dot: f32) -> Self {
        Self {
            indices,
            connections: [None; 3],
            center,
            dot,
        }
    }

    /// Vertex indices of edge `slot`
    #[inline]
    pub fn edge(&self, slot: usize) -> (u32, u32) {
        (self.indices[slot], self.indices[(slot + 1) % 3])
    }

    /// Neighbouring faces, in edge slot order
    pub fn neighbors(&self) -> impl Iterator<Item = FaceIndex> + '_ {
        self.connections.iter().flatten().copied()
    }

    /// Edge slot shared with `other`, if the faces are adjacent
    pub fn slot_to(&self, other: FaceIndex) -> Option<usize> {
        self.connections.iter().position(|&c| c == Some(other))
    }
}

/// Summary of what happened while building a mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct MeshStats {
    /// Triangles in the input
    pub input_triangles: usize,
    /// Triangles dropped by the walkability test
    pub culled_triangles: usize,
    /// Triangles dropped because their corners collapsed onto one vertex
    pub degenerate_triangles: usize,
    /// Edge connectivity counts
    pub edges: AdjacencyStats,
}

/// Immutable navigation mesh
///
/// Deserialized meshes are validated and get a fresh BV tree, so corrupt data
/// is rejected while decoding rather than at query time.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawNavMesh")
)]
pub struct NavMesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    bounds: Option<(Vec3, Vec3)>,
    stats: MeshStats,
    #[cfg_attr(feature = "serialization", serde(skip))]
    bv_tree: Option<FaceBvh>,
}

/// Serialized form of a [`NavMesh`], checked before it becomes one
#[cfg(feature = "serialization")]
#[derive(serde::Deserialize)]
struct RawNavMesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    bounds: Option<(Vec3, Vec3)>,
    stats: MeshStats,
}

#[cfg(feature = "serialization")]
impl TryFrom<RawNavMesh> for NavMesh {
    type Error = Error;

    fn try_from(raw: RawNavMesh) -> Result<Self> {
        let mut mesh = NavMesh {
            vertices: raw.vertices,
            faces: raw.faces,
            bounds: raw.bounds,
            stats: raw.stats,
            bv_tree: None,
        };
        mesh.validate()?;
        if !mesh.faces.is_empty() {
            mesh.bv_tree = Some(FaceBvh::build(&mesh.vertices, &mesh.faces));
        }
        Ok(mesh)
    }
}

impl NavMesh {
    /// Builds a navigation mesh from vertex positions and a triangle index buffer.
    ///
    /// Vertices are deduplicated by input index unless the config asks for
    /// positional welding. Triangles failing the walkability test are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMesh`] when the index buffer is malformed or
    /// references missing or non-finite vertices, and [`Error::NavMeshBuild`]
    /// when the configuration is unusable.
    pub fn build(vertices: &[Vec3], indices: &[u32], config: &BuildConfig) -> Result<Self> {
        let started = Instant::now();

        let ingested = ingest(vertices, indices, config)?;
        let mut faces = ingested.faces;
        let edges = build_adjacency(&mut faces);

        let bounds = calc_bounds(ingested.vertices.iter().copied());
        let bv_tree = (config.build_bv_tree && !faces.is_empty())
            .then(|| FaceBvh::build(&ingested.vertices, &faces));

        let stats = MeshStats {
            input_triangles: indices.len() / 3,
            culled_triangles: ingested.culled,
            degenerate_triangles: ingested.degenerate,
            edges,
        };

        log::debug!(
            "Built navmesh: {} faces, {} vertices ({} culled, {} degenerate) in {:?}",
            faces.len(),
            ingested.vertices.len(),
            stats.culled_triangles,
            stats.degenerate_triangles,
            started.elapsed()
        );

        Ok(Self {
            vertices: ingested.vertices,
            faces,
            bounds,
            stats,
            bv_tree,
        })
    }

    /// Builds a navigation mesh from a triangle soup.
    ///
    /// Corners with bit-identical positions share one input index, so adjacent
    /// triangles of the soup become connected.
    pub fn from_triangles(triangles: &[[Vec3; 3]], config: &BuildConfig) -> Result<Self> {
        let mut lookup: HashMap<[u32; 3], u32> = HashMap::with_capacity(triangles.len() * 2);
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(triangles.len() * 3);

        for corner in triangles.iter().flatten() {
            // -0.0 and 0.0 are the same position
            let key = corner
                .to_array()
                .map(|c| if c == 0.0 { 0 } else { c.to_bits() });
            let next = u32::try_from(vertices.len())
                .map_err(|_| Error::NavMeshBuild("too many vertices".to_string()))?;
            let index = *lookup.entry(key).or_insert_with(|| {
                vertices.push(*corner);
                next
            });
            indices.push(index);
        }

        Self::build(&vertices, &indices, config)
    }

    /// Builds a navigation mesh from an imported triangle mesh
    pub fn from_tri_mesh(mesh: &TriMesh, config: &BuildConfig) -> Result<Self> {
        Self::build(&mesh.vertices, &mesh.indices, config)
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Walkable faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Face by index
    pub fn face(&self, index: FaceIndex) -> Option<&Face> {
        self.faces.get(index.index())
    }

    /// Vertex position by index
    pub fn vertex(&self, index: u32) -> Option<Vec3> {
        self.vertices.get(index as usize).copied()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// True when no face survived the walkability test
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Axis-aligned bounds of the mesh vertices
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }

    /// Build statistics
    pub fn stats(&self) -> &MeshStats {
        &self.stats
    }

    /// Iterates faces together with their indices
    pub fn iter_faces(&self) -> impl Iterator<Item = (FaceIndex, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, face)| (FaceIndex(i as u32), face))
    }

    /// Corner positions of a face
    pub fn face_corners(&self, face: &Face) -> [Vec3; 3] {
        face.indices.map(|i| self.vertices[i as usize])
    }

    pub(crate) fn bv_tree(&self) -> Option<&FaceBvh> {
        self.bv_tree.as_ref()
    }

    /// Checks the structural invariants of the mesh: every index in range and
    /// every connection reciprocated across the same edge.
    ///
    /// Built and deserialized meshes always pass.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();

        for (index, face) in self.iter_faces() {
            if let Some(&bad) = face.indices.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(Error::InvalidMesh(format!(
                    "face {index} references vertex {bad} of {vertex_count}"
                )));
            }

            for slot in 0..3 {
                let Some(neighbor) = face.connections[slot] else {
                    continue;
                };

                let other = self.face(neighbor).ok_or_else(|| {
                    Error::InvalidMesh(format!("face {index} links to missing face {neighbor}"))
                })?;

                let (a, b) = face.edge(slot);
                let reciprocated = other.slot_to(index).is_some_and(|back| {
                    let (c, d) = other.edge(back);
                    edge_key(a, b) == edge_key(c, d)
                });

                if !reciprocated {
                    return Err(Error::InvalidMesh(format!(
                        "face {index} links to {neighbor} without a matching back link"
                    )));
                }
            }
        }

        Ok(())
    }
}
