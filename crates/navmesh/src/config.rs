//! Configuration for navigation mesh construction and path queries

use glam::Vec3;

/// Parameters controlling how raw triangles become a navigation mesh
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BuildConfig {
    /// Direction a walkable face's normal must lean towards.
    ///
    /// Normals are `(b - a) x (c - a)`, so the default `-Y` keeps triangles wound
    /// clockwise when seen from above. Use `+Y` for counter-clockwise sources.
    pub down: Vec3,
    /// Maximum angle in degrees between a face normal and `down`.
    /// 90 keeps every face whose normal has a positive component along `down`.
    pub max_slope_angle: f32,
    /// Weld vertices by position instead of by input index
    pub weld_vertices: bool,
    /// Grid size used to snap positions when `weld_vertices` is set
    pub weld_tolerance: f32,
    /// Build a bounding volume tree to accelerate point location
    pub build_bv_tree: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            down: Vec3::NEG_Y,
            max_slope_angle: 90.0,
            weld_vertices: false,
            weld_tolerance: 1e-4,
            build_bv_tree: true,
        }
    }
}

impl BuildConfig {
    /// Creates a new BuildConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_down(mut self, down: Vec3) -> Self {
        self.down = down;
        self
    }

    pub fn with_max_slope_angle(mut self, max_slope_angle: f32) -> Self {
        self.max_slope_angle = max_slope_angle;
        self
    }

    pub fn with_welding(mut self, weld_tolerance: f32) -> Self {
        self.weld_vertices = true;
        self.weld_tolerance = weld_tolerance;
        self
    }

    pub fn with_bv_tree(mut self, build_bv_tree: bool) -> Self {
        self.build_bv_tree = build_bv_tree;
        self
    }
}

/// Graph search used to find the face corridor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SearchStrategy {
    /// Expands the frontier face closest to the goal first.
    ///
    /// Fast and usually good, but it can settle on a longer corridor than the
    /// shortest one.
    #[default]
    GreedyBestFirst,
    /// A* keyed on travelled centroid distance plus remaining distance to the goal
    AStar,
}

/// Parameters controlling path queries
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct QueryConfig {
    /// Face search algorithm
    pub search: SearchStrategy,
    /// Tolerance of the point-in-face area test
    pub area_epsilon: f32,
    /// Squared XZ distance under which funnel points are considered equal
    pub apex_epsilon: f32,
    /// How far a face centroid may sit above the query point and still count as "below" it
    pub height_tolerance: f32,
    /// Cap on search expansions; `None` uses the face count
    pub max_iterations: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search: SearchStrategy::GreedyBestFirst,
            area_epsilon: 1e-3,
            apex_epsilon: 1e-6,
            height_tolerance: 0.0,
            max_iterations: None,
        }
    }
}

impl QueryConfig {
    /// Creates a new QueryConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    pub fn with_area_epsilon(mut self, area_epsilon: f32) -> Self {
        self.area_epsilon = area_epsilon;
        self
    }

    pub fn with_apex_epsilon(mut self, apex_epsilon: f32) -> Self {
        self.apex_epsilon = apex_epsilon;
        self
    }

    pub fn with_height_tolerance(mut self, height_tolerance: f32) -> Self {
        self.height_tolerance = height_tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Effective expansion cap for a mesh with `face_count` faces
    pub(crate) fn iteration_limit(&self, face_count: usize) -> usize {
        self.max_iterations.unwrap_or(face_count + 1)
    }
}
