//! Registry of loaded navigation meshes addressed by handle
//!
//! Meshes are built outside the lock and published under the write lock, so a
//! query never observes a mesh under construction. Queries clone the `Arc`s
//! they need and release the lock before searching.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::Vec3;
use navmesh_common::{Result, TriMesh};

use crate::{BuildConfig, NavMesh, NavMeshQuery, QueryConfig};

/// Handle of a mesh registered in a [`NavMeshRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct MeshHandle(u32);

impl MeshHandle {
    /// Raw handle value
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh:{}", self.0)
    }
}

/// Thread-safe collection of navigation meshes
#[derive(Debug)]
pub struct NavMeshRegistry {
    meshes: RwLock<Vec<(MeshHandle, Arc<NavMesh>)>>,
    next_handle: AtomicU32,
    build_config: BuildConfig,
    query_config: QueryConfig,
}

impl Default for NavMeshRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NavMeshRegistry {
    /// Creates an empty registry with default settings
    pub fn new() -> Self {
        Self::with_configs(BuildConfig::default(), QueryConfig::default())
    }

    /// Creates an empty registry that builds and queries meshes with the given settings
    pub fn with_configs(build_config: BuildConfig, query_config: QueryConfig) -> Self {
        Self {
            meshes: RwLock::new(Vec::new()),
            next_handle: AtomicU32::new(1),
            build_config,
            query_config,
        }
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build_config
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.query_config
    }

    // Writers only push or remove whole entries, so a poisoned list is still consistent
    fn read(&self) -> RwLockReadGuard<'_, Vec<(MeshHandle, Arc<NavMesh>)>> {
        self.meshes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<(MeshHandle, Arc<NavMesh>)>> {
        self.meshes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds a mesh from a triangle soup and registers it
    pub fn build_mesh(&self, triangles: &[[Vec3; 3]]) -> Result<MeshHandle> {
        let mesh = NavMesh::from_triangles(triangles, &self.build_config)?;
        Ok(self.insert(mesh))
    }

    /// Builds a mesh from an imported triangle mesh and registers it
    pub fn build_mesh_from_tri_mesh(&self, tri_mesh: &TriMesh) -> Result<MeshHandle> {
        let mesh = NavMesh::from_tri_mesh(tri_mesh, &self.build_config)?;
        Ok(self.insert(mesh))
    }

    /// Registers an already built mesh
    pub fn insert(&self, mesh: NavMesh) -> MeshHandle {
        let handle = MeshHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        log::debug!("Registered {handle} with {} faces", mesh.face_count());
        self.write().push((handle, Arc::new(mesh)));
        handle
    }

    /// Gets a registered mesh
    pub fn get(&self, handle: MeshHandle) -> Option<Arc<NavMesh>> {
        self.read()
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, mesh)| Arc::clone(mesh))
    }

    /// Unregisters a mesh; queries already running on it finish normally
    pub fn remove(&self, handle: MeshHandle) -> Option<Arc<NavMesh>> {
        let mut meshes = self.write();
        let at = meshes.iter().position(|(h, _)| *h == handle)?;
        Some(meshes.remove(at).1)
    }

    /// Handles in registration order
    pub fn handles(&self) -> Vec<MeshHandle> {
        self.read().iter().map(|(h, _)| *h).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Path on one mesh; empty when the handle is unknown or there is no path
    pub fn query(&self, handle: MeshHandle, start: Vec3, end: Vec3, agent_radius: f32) -> Vec<Vec3> {
        let Some(mesh) = self.get(handle) else {
            log::debug!("Query on unknown {handle}");
            return Vec::new();
        };

        NavMeshQuery::with_config(&mesh, self.query_config.clone()).query(start, end, agent_radius)
    }

    /// Path on the first mesh, in registration order, that contains both points
    pub fn query_any_mesh(&self, start: Vec3, end: Vec3, agent_radius: f32) -> Vec<Vec3> {
        let meshes: Vec<(MeshHandle, Arc<NavMesh>)> = self.read().clone();

        for (handle, mesh) in &meshes {
            let query = NavMeshQuery::with_config(mesh, self.query_config.clone());
            if query.locate(start).is_some() && query.locate(end).is_some() {
                log::trace!("Both endpoints located on {handle}");
                return query.query(start, end, agent_radius);
            }
        }

        Vec::new()
    }
}
