//! Status codes for path queries

/// Result type for path queries
pub type QueryResult<T> = std::result::Result<T, Status>;

/// Reason a path query produced no path
///
/// Every variant is a recoverable, expected outcome. Callers that only want
/// waypoints use [`NavMeshQuery::query`](crate::NavMeshQuery::query), which maps
/// all of them to an empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Provided parameter was invalid (non-finite point, negative radius, unknown face)
    InvalidParam,
    /// The navigation mesh has no walkable faces
    EmptyMesh,
    /// The start point is not above or below any walkable face
    StartNotOnMesh,
    /// The end point is not above or below any walkable face
    EndNotOnMesh,
    /// Start and end lie in regions with no connecting faces
    Disconnected,
    /// The search or backtrace hit its iteration cap
    IterationLimit,
    /// A face path did not follow mesh adjacency
    PathInvalid,
}

impl Status {
    /// Whether the failure is caused by the query points rather than the mesh
    pub fn is_location_failure(&self) -> bool {
        matches!(self, Status::StartNotOnMesh | Status::EndNotOnMesh)
    }
}

impl std::error::Error for Status {}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::InvalidParam => write!(f, "Invalid parameter"),
            Status::EmptyMesh => write!(f, "Navigation mesh has no walkable faces"),
            Status::StartNotOnMesh => write!(f, "Start point is not on the navigation mesh"),
            Status::EndNotOnMesh => write!(f, "End point is not on the navigation mesh"),
            Status::Disconnected => write!(f, "No connection between start and end"),
            Status::IterationLimit => write!(f, "Search iteration limit reached"),
            Status::PathInvalid => write!(f, "Invalid path"),
        }
    }
}
