//! Geometry ingest: validates raw triangles, culls non-walkable ones and
//! compacts the survivors into a vertex/face table.

use std::collections::HashMap;

use glam::Vec3;
use navmesh_common::{surface_dot, walkable_threshold, Error, Result};

use crate::nav_mesh::Face;
use crate::BuildConfig;

/// Output of the ingest pass
pub(crate) struct Ingested {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub culled: usize,
    pub degenerate: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WeldKey {
    Index(u32),
    Position([i64; 3]),
}

/// Maps input vertices onto the compact vertex array
struct VertexWelder {
    lookup: HashMap<WeldKey, u32>,
    tolerance: Option<f32>,
    vertices: Vec<Vec3>,
}

impl VertexWelder {
    fn new(config: &BuildConfig) -> Self {
        Self {
            lookup: HashMap::new(),
            tolerance: config.weld_vertices.then_some(config.weld_tolerance),
            vertices: Vec::new(),
        }
    }

    fn insert(&mut self, input: u32, pos: Vec3) -> Result<u32> {
        let key = match self.tolerance {
            Some(t) => WeldKey::Position([
                (pos.x / t).round() as i64,
                (pos.y / t).round() as i64,
                (pos.z / t).round() as i64,
            ]),
            None => WeldKey::Index(input),
        };

        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }

        let index = u32::try_from(self.vertices.len())
            .map_err(|_| Error::NavMeshBuild("too many vertices".to_string()))?;
        self.vertices.push(pos);
        self.lookup.insert(key, index);
        Ok(index)
    }
}

fn check_config(config: &BuildConfig) -> Result<()> {
    if !config.down.is_finite() || config.down.length_squared() <= f32::EPSILON {
        return Err(Error::NavMeshBuild(format!(
            "down vector {:?} must be finite and non-zero",
            config.down
        )));
    }

    if config.weld_vertices && !(config.weld_tolerance.is_finite() && config.weld_tolerance > 0.0) {
        return Err(Error::NavMeshBuild(format!(
            "weld tolerance {} must be positive",
            config.weld_tolerance
        )));
    }

    Ok(())
}

fn fetch_corner(vertices: &[Vec3], tri: usize, index: u32) -> Result<Vec3> {
    let pos = vertices.get(index as usize).copied().ok_or_else(|| {
        Error::InvalidMesh(format!(
            "triangle {tri} references vertex {index}, but only {} vertices exist",
            vertices.len()
        ))
    })?;

    if !pos.is_finite() {
        return Err(Error::InvalidMesh(format!(
            "triangle {tri} references vertex {index} with non-finite position {pos:?}"
        )));
    }

    Ok(pos)
}

/// Validates, culls and compacts raw triangles.
///
/// Every triangle is validated, including the ones that end up culled, so a
/// corrupt index buffer always fails the build.
pub(crate) fn ingest(vertices: &[Vec3], indices: &[u32], config: &BuildConfig) -> Result<Ingested> {
    check_config(config)?;

    if indices.len() % 3 != 0 {
        return Err(Error::InvalidMesh(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }

    let threshold = walkable_threshold(config.max_slope_angle);
    let mut welder = VertexWelder::new(config);
    let mut faces = Vec::new();
    let mut culled = 0;
    let mut degenerate = 0;

    for (tri, idx) in indices.chunks_exact(3).enumerate() {
        let a = fetch_corner(vertices, tri, idx[0])?;
        let b = fetch_corner(vertices, tri, idx[1])?;
        let c = fetch_corner(vertices, tri, idx[2])?;

        let dot = surface_dot(a, b, c, config.down);
        if dot <= threshold {
            culled += 1;
            continue;
        }

        let compact = [
            welder.insert(idx[0], a)?,
            welder.insert(idx[1], b)?,
            welder.insert(idx[2], c)?,
        ];

        if compact[0] == compact[1] || compact[1] == compact[2] || compact[0] == compact[2] {
            log::trace!("Dropping triangle {tri}: corners collapse to {compact:?}");
            degenerate += 1;
            continue;
        }

        let [pa, pb, pc] = compact.map(|i| welder.vertices[i as usize]);
        faces.push(Face::new(compact, (pa + pb + pc) / 3.0, dot));
    }

    if u32::try_from(faces.len()).is_err() {
        return Err(Error::NavMeshBuild(format!(
            "{} walkable faces exceed the face index range",
            faces.len()
        )));
    }

    Ok(Ingested {
        vertices: welder.vertices,
        faces,
        culled,
        degenerate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mesh_helpers::*;

    #[test]
    fn test_culls_non_walkable_triangles() {
        let floor = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let ceiling = [Vec3::ZERO, Vec3::Z, Vec3::X];
        let wall = [Vec3::ZERO, Vec3::X, Vec3::Y];

        let mut vertices = Vec::new();
        for tri in [floor, ceiling, wall] {
            vertices.extend(tri);
        }
        let indices: Vec<u32> = (0..9).collect();

        let ingested = ingest(&vertices, &indices, &BuildConfig::default()).unwrap();
        assert_eq!(ingested.faces.len(), 1);
        assert_eq!(ingested.culled, 2);
        assert_eq!(ingested.vertices, vec![Vec3::ZERO, Vec3::X, Vec3::Z]);
        assert_eq!(ingested.faces[0].indices, [0, 1, 2]);
    }

    #[test]
    fn test_only_referenced_vertices_are_kept() {
        let vertices = vec![
            Vec3::new(9.0, 9.0, 9.0),
            Vec3::ZERO,
            Vec3::X,
            Vec3::Z,
        ];
        let ingested = ingest(&vertices, &[1, 2, 3], &BuildConfig::default()).unwrap();
        assert_eq!(ingested.vertices.len(), 3);
        assert_eq!(ingested.faces[0].center, Vec3::new(1.0 / 3.0, 0.0, 1.0 / 3.0));
    }

    #[test]
    fn test_slope_limit() {
        // Rises one unit over one unit of run: 45 degrees
        let slope = [Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::Z];
        let indices = [0, 1, 2];

        let steep = BuildConfig::default().with_max_slope_angle(30.0);
        assert_eq!(ingest(&slope, &indices, &steep).unwrap().faces.len(), 0);

        let lenient = BuildConfig::default().with_max_slope_angle(50.0);
        assert_eq!(ingest(&slope, &indices, &lenient).unwrap().faces.len(), 1);
    }

    #[test]
    fn test_index_dedup_keeps_colocated_vertices_distinct() {
        // Two cells whose shared edge uses different input vertices
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for tri in cell_triangles(0, 0, 0.0)
            .into_iter()
            .chain(cell_triangles(1, 0, 0.0))
        {
            let base = vertices.len() as u32;
            vertices.extend(tri);
            indices.extend([base, base + 1, base + 2]);
        }

        let by_index = ingest(&vertices, &indices, &BuildConfig::default()).unwrap();
        assert_eq!(by_index.vertices.len(), 12);

        let welded = ingest(&vertices, &indices, &BuildConfig::default().with_welding(1e-3)).unwrap();
        assert_eq!(welded.vertices.len(), 6);
    }

    #[test]
    fn test_welding_drops_collapsed_triangles() {
        let vertices = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.004),
        ];
        let config = BuildConfig::default().with_welding(0.01);
        let ingested = ingest(&vertices, &[0, 1, 2], &config).unwrap();
        assert!(ingested.faces.is_empty());
        assert_eq!(ingested.degenerate, 1);
    }

    #[test]
    fn test_malformed_input_fails() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let config = BuildConfig::default();

        assert!(matches!(
            ingest(&vertices, &[0, 1], &config),
            Err(Error::InvalidMesh(_))
        ));
        assert!(matches!(
            ingest(&vertices, &[0, 1, 3], &config),
            Err(Error::InvalidMesh(_))
        ));

        // Out-of-range indices fail even on triangles that would be culled
        assert!(matches!(
            ingest(&vertices, &[0, 1, 2, 0, 2, 7], &config),
            Err(Error::InvalidMesh(_))
        ));

        let nan = vec![Vec3::ZERO, Vec3::X, Vec3::new(f32::NAN, 0.0, 1.0)];
        assert!(matches!(
            ingest(&nan, &[0, 1, 2], &config),
            Err(Error::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_bad_config_fails() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Z];

        let zero_down = BuildConfig::default().with_down(Vec3::ZERO);
        assert!(matches!(
            ingest(&vertices, &[0, 1, 2], &zero_down),
            Err(Error::NavMeshBuild(_))
        ));

        let zero_weld = BuildConfig::default().with_welding(0.0);
        assert!(matches!(
            ingest(&vertices, &[0, 1, 2], &zero_weld),
            Err(Error::NavMeshBuild(_))
        ));
    }
}
