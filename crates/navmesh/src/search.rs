//! Face corridor search over mesh adjacency
//!
//! Two strategies are available. The default greedy best-first search always
//! expands the frontier face whose centroid is closest to the goal point. It
//! touches few faces but can settle on a corridor longer than the shortest one.
//! A* trades a few more expansions for the shortest corridor measured between
//! face centroids.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;

use crate::nav_mesh::{Face, FaceIndex, NavMesh};
use crate::{QueryConfig, QueryResult, SearchStrategy, Status};

/// Frontier entry of the greedy search
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PathNode {
    /// Face reached
    pub face: FaceIndex,
    /// Squared distance from the face centroid to the goal point
    pub weight: f32,
}

/// Node wrapper for the binary heap (priority queue)
#[derive(Debug, Clone, Copy)]
struct HeapNode {
    face: FaceIndex,
    /// Total cost (f value)
    f: f32,
}

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapNode {}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; lower face index first on equal cost
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.face.cmp(&self.face))
    }
}

/// Finds a chain of adjacent faces from `start` to `end`, both inclusive.
///
/// `goal` is the world position the search heads for; the greedy strategy
/// ranks faces by their distance to it.
pub(crate) fn find_face_path(
    mesh: &NavMesh,
    start: FaceIndex,
    end: FaceIndex,
    goal: Vec3,
    config: &QueryConfig,
) -> QueryResult<Vec<FaceIndex>> {
    let face_count = mesh.face_count();
    if start.index() >= face_count || end.index() >= face_count || !goal.is_finite() {
        return Err(Status::InvalidParam);
    }

    if start == end {
        return Ok(vec![start]);
    }

    let limit = config.iteration_limit(face_count);
    let parents = match config.search {
        SearchStrategy::GreedyBestFirst => greedy_best_first(mesh.faces(), start, end, goal, limit)?,
        SearchStrategy::AStar => a_star(mesh.faces(), start, end, limit)?,
    };

    let path = backtrace(&parents, start, end)?;
    log::trace!(
        "Face path {} -> {}: {} faces ({:?})",
        start,
        end,
        path.len(),
        config.search
    );
    Ok(path)
}

/// Inserts `node` keeping the frontier sorted by descending weight, so the
/// closest face sits at the end. Among equal weights the older entry pops first.
fn insert_sorted(frontier: &mut Vec<PathNode>, node: PathNode) {
    let at = frontier.partition_point(|n| n.weight > node.weight);
    frontier.insert(at, node);
}

fn greedy_best_first(
    faces: &[Face],
    start: FaceIndex,
    end: FaceIndex,
    goal: Vec3,
    limit: usize,
) -> QueryResult<Vec<Option<FaceIndex>>> {
    let mut visited = vec![false; faces.len()];
    let mut parents = vec![None; faces.len()];
    let mut frontier: Vec<PathNode> = Vec::new();

    visited[start.index()] = true;
    let mut current = start;
    let mut expansions = 0;

    loop {
        expansions += 1;
        if expansions > limit {
            log::warn!("Greedy search {start} -> {end} stopped after {limit} expansions");
            return Err(Status::IterationLimit);
        }

        for neighbor in faces[current.index()].neighbors() {
            let Some(seen) = visited.get_mut(neighbor.index()) else {
                return Err(Status::PathInvalid);
            };
            if *seen {
                continue;
            }
            *seen = true;
            parents[neighbor.index()] = Some(current);
            insert_sorted(
                &mut frontier,
                PathNode {
                    face: neighbor,
                    weight: faces[neighbor.index()].center.distance_squared(goal),
                },
            );
        }

        let Some(node) = frontier.pop() else {
            return Err(Status::Disconnected);
        };

        if node.face == end {
            return Ok(parents);
        }

        current = node.face;
    }
}

fn a_star(
    faces: &[Face],
    start: FaceIndex,
    end: FaceIndex,
    limit: usize,
) -> QueryResult<Vec<Option<FaceIndex>>> {
    let target = faces[end.index()].center;
    let heuristic = |face: FaceIndex| faces[face.index()].center.distance(target);

    let mut costs = vec![f32::INFINITY; faces.len()];
    let mut closed = vec![false; faces.len()];
    let mut parents = vec![None; faces.len()];
    let mut open = BinaryHeap::new();

    costs[start.index()] = 0.0;
    open.push(HeapNode {
        face: start,
        f: heuristic(start),
    });

    let mut expansions = 0;
    while let Some(HeapNode { face, .. }) = open.pop() {
        if face == end {
            return Ok(parents);
        }
        if closed[face.index()] {
            continue;
        }
        closed[face.index()] = true;

        expansions += 1;
        if expansions > limit {
            log::warn!("A* search {start} -> {end} stopped after {limit} expansions");
            return Err(Status::IterationLimit);
        }

        let center = faces[face.index()].center;
        for neighbor in faces[face.index()].neighbors() {
            let Some(next) = faces.get(neighbor.index()) else {
                return Err(Status::PathInvalid);
            };
            if closed[neighbor.index()] {
                continue;
            }

            let cost = costs[face.index()] + center.distance(next.center);
            if cost < costs[neighbor.index()] {
                costs[neighbor.index()] = cost;
                parents[neighbor.index()] = Some(face);
                open.push(HeapNode {
                    face: neighbor,
                    f: cost + heuristic(neighbor),
                });
            }
        }
    }

    Err(Status::Disconnected)
}

/// Walks the parent links back from `end`, returning the faces in start to end order
fn backtrace(
    parents: &[Option<FaceIndex>],
    start: FaceIndex,
    end: FaceIndex,
) -> QueryResult<Vec<FaceIndex>> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        // A face appears once on a valid chain; anything longer is a cycle
        if path.len() > parents.len() {
            log::warn!("Backtrace {end} -> {start} exceeded {} faces", parents.len());
            return Err(Status::IterationLimit);
        }
        current = parents
            .get(current.index())
            .copied()
            .flatten()
            .ok_or(Status::PathInvalid)?;
        path.push(current);
    }

    path.reverse();
    Ok(path)
}
