//! Navigation mesh pathfinding for single agents on static 2.5-D worlds
//!
//! A [`NavMesh`] is built once from raw triangles: faces that do not lean
//! towards the configured down vector are culled, the rest are linked through
//! their shared edges. [`NavMeshQuery`] then answers path queries: it locates
//! both endpoints on the mesh, searches a corridor of faces between them,
//! shrinks the corridor's portals by the agent radius and pulls a taut
//! waypoint path through it.
//!
//! ```
//! use glam::Vec3;
//! use navmesh::{BuildConfig, NavMesh, NavMeshQuery};
//!
//! // A 2x1 quad split into two triangles, wound clockwise seen from above
//! let vertices = [
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(2.0, 0.0, 0.0),
//!     Vec3::new(0.0, 0.0, 1.0),
//!     Vec3::new(2.0, 0.0, 1.0),
//! ];
//! let indices = [0, 1, 2, 1, 3, 2];
//! let mesh = NavMesh::build(&vertices, &indices, &BuildConfig::default())?;
//!
//! let start = Vec3::new(0.1, 0.0, 0.1);
//! let end = Vec3::new(1.9, 0.0, 0.9);
//! let path = NavMeshQuery::new(&mesh).query(start, end, 0.0);
//! assert_eq!(path, vec![start, end]);
//! # Ok::<(), navmesh::Error>(())
//! ```

mod adjacency;
mod bvh_tree;
mod config;
mod funnel;
mod ingest;
mod locate;
mod nav_mesh;
mod nav_mesh_query;
mod portal;
mod registry;
mod search;
mod status;

#[cfg(all(test, feature = "serialization"))]
mod serialization_tests;
#[cfg(test)]
mod test_mesh_helpers;

pub use adjacency::AdjacencyStats;
pub use bvh_tree::{fringe_scale, Aabb2d, FaceBvh};
pub use config::{BuildConfig, QueryConfig, SearchStrategy};
pub use nav_mesh::{Face, FaceIndex, MeshStats, NavMesh};
pub use nav_mesh_query::{NavMeshQuery, Path};
pub use portal::Portal;
pub use registry::{MeshHandle, NavMeshRegistry};
pub use status::{QueryResult, Status};

pub use navmesh_common::{Error, Result, TriMesh};
