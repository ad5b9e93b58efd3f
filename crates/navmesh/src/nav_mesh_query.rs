//! Path queries against a navigation mesh
//!
//! A query runs the whole pipeline: locate both endpoints, search the face
//! corridor between them, turn the corridor into agent-sized portals and pull
//! a taut waypoint path through them. Each stage is also exposed on its own.

use glam::Vec3;

use crate::funnel::string_pull;
use crate::locate::locate_face;
use crate::nav_mesh::{FaceIndex, NavMesh};
use crate::portal::{build_portals, Portal};
use crate::search::find_face_path;
use crate::{QueryConfig, QueryResult, Status};

/// Result of a successful path query
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Path {
    /// Points to walk through, from the start point to the end point
    pub waypoints: Vec<Vec3>,
    /// Faces the path was pulled through, from start face to end face
    pub faces: Vec<FaceIndex>,
}

impl Path {
    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Total length of the waypoint polyline
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// Navigation mesh query structure
///
/// Holds no per-query state, so one instance can serve any number of queries
/// and several instances can share a mesh across threads.
#[derive(Debug, Clone)]
pub struct NavMeshQuery<'a> {
    nav_mesh: &'a NavMesh,
    config: QueryConfig,
}

impl<'a> NavMeshQuery<'a> {
    /// Creates a new query with default settings
    pub fn new(nav_mesh: &'a NavMesh) -> Self {
        Self::with_config(nav_mesh, QueryConfig::default())
    }

    /// Creates a new query with the given settings
    pub fn with_config(nav_mesh: &'a NavMesh, config: QueryConfig) -> Self {
        Self { nav_mesh, config }
    }

    /// Gets the navigation mesh
    pub fn nav_mesh(&self) -> &NavMesh {
        self.nav_mesh
    }

    /// Gets the query settings
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Finds the face a point stands on, see [`QueryConfig::height_tolerance`]
    pub fn locate(&self, point: Vec3) -> Option<FaceIndex> {
        locate_face(self.nav_mesh, point, &self.config)
    }

    /// Finds a corridor of adjacent faces from `start` to `end`, heading for `goal`
    pub fn find_face_path(
        &self,
        start: FaceIndex,
        end: FaceIndex,
        goal: Vec3,
    ) -> QueryResult<Vec<FaceIndex>> {
        find_face_path(self.nav_mesh, start, end, goal, &self.config)
    }

    /// Builds the portals crossed by a face corridor, inset by `agent_radius`
    pub fn build_portals(&self, path: &[FaceIndex], agent_radius: f32) -> QueryResult<Vec<Portal>> {
        build_portals(self.nav_mesh, path, agent_radius)
    }

    /// Pulls the shortest waypoint path from `start` to `end` through `portals`
    pub fn find_straight_path(&self, start: Vec3, end: Vec3, portals: &[Portal]) -> Vec<Vec3> {
        string_pull(start, end, portals, self.config.apex_epsilon)
    }

    /// Finds a path for an agent of `agent_radius` from `start` to `end`.
    ///
    /// When both points stand on the same face the path is the straight line
    /// `[start, end]`.
    pub fn find_path(&self, start: Vec3, end: Vec3, agent_radius: f32) -> QueryResult<Path> {
        if !start.is_finite() || !end.is_finite() || !agent_radius.is_finite() || agent_radius < 0.0 {
            return Err(Status::InvalidParam);
        }

        if self.nav_mesh.is_empty() {
            return Err(Status::EmptyMesh);
        }

        let start_face = self.locate(start).ok_or(Status::StartNotOnMesh)?;
        let end_face = self.locate(end).ok_or(Status::EndNotOnMesh)?;

        if start_face == end_face {
            return Ok(Path {
                waypoints: vec![start, end],
                faces: vec![start_face],
            });
        }

        let faces = self.find_face_path(start_face, end_face, end)?;
        let portals = self.build_portals(&faces, agent_radius)?;
        let waypoints = self.find_straight_path(start, end, &portals);

        log::trace!(
            "Path {} -> {}: {} faces, {} waypoints",
            start_face,
            end_face,
            faces.len(),
            waypoints.len()
        );

        Ok(Path { waypoints, faces })
    }

    /// Waypoints from `start` to `end`, or an empty vector when there is no path
    pub fn query(&self, start: Vec3, end: Vec3, agent_radius: f32) -> Vec<Vec3> {
        match self.find_path(start, end, agent_radius) {
            Ok(path) => path.waypoints,
            Err(status) => {
                log::debug!("No path from {start} to {end}: {status}");
                Vec::new()
            }
        }
    }
}
