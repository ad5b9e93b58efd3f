//! Test mesh creation helpers
//!
//! Meshes are laid out on unit cells of the XZ plane. Every cell is split
//! along its `(x + 1, z) - (x, z + 1)` diagonal into a lower-left and an
//! upper-right triangle, wound clockwise from above so the default build
//! settings keep them. Faces come out in cell order, two per cell.

use glam::Vec3;

use crate::{BuildConfig, NavMesh};

/// The two triangles of cell `(x, z)` at height `y`
pub fn cell_triangles(x: i32, z: i32, y: f32) -> [[Vec3; 3]; 2] {
    let (x0, z0) = (x as f32, z as f32);
    let v00 = Vec3::new(x0, y, z0);
    let v10 = Vec3::new(x0 + 1.0, y, z0);
    let v01 = Vec3::new(x0, y, z0 + 1.0);
    let v11 = Vec3::new(x0 + 1.0, y, z0 + 1.0);
    [[v00, v10, v01], [v10, v11, v01]]
}

/// Shared-vertex grid of `cols` x `rows` cells covering `[0, cols] x [0, rows]`
///
/// Vertex `(x, z)` has index `z * (cols + 1) + x`; cells are emitted row by row.
pub fn create_grid_geometry(cols: u32, rows: u32) -> (Vec<Vec3>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);
    for z in 0..=rows {
        for x in 0..=cols {
            vertices.push(Vec3::new(x as f32, 0.0, z as f32));
        }
    }

    let index = |x: u32, z: u32| z * (cols + 1) + x;
    let mut indices = Vec::with_capacity((cols * rows * 6) as usize);
    for z in 0..rows {
        for x in 0..cols {
            let (v00, v10) = (index(x, z), index(x + 1, z));
            let (v01, v11) = (index(x, z + 1), index(x + 1, z + 1));
            indices.extend([v00, v10, v01, v10, v11, v01]);
        }
    }

    (vertices, indices)
}

/// Flat grid navmesh, see [`create_grid_geometry`]
pub fn create_grid_navmesh(cols: u32, rows: u32) -> NavMesh {
    let (vertices, indices) = create_grid_geometry(cols, rows);
    NavMesh::build(&vertices, &indices, &BuildConfig::default()).expect("grid mesh")
}

/// Navmesh made of the given cells, in order, at height `y`
pub fn create_cells_navmesh(cells: &[(i32, i32)], y: f32) -> NavMesh {
    let triangles: Vec<[Vec3; 3]> = cells
        .iter()
        .flat_map(|&(x, z)| cell_triangles(x, z, y))
        .collect();
    NavMesh::from_triangles(&triangles, &BuildConfig::default()).expect("cell mesh")
}

/// One cell wide corridor of `length` cells along +X
pub fn create_corridor_navmesh(length: u32) -> NavMesh {
    create_grid_navmesh(length, 1)
}

/// Corridor running three cells along +X, then turning left for two cells along +Z.
/// The inner corner is at `(2, 0, 1)`.
pub fn create_l_corridor_navmesh() -> NavMesh {
    create_cells_navmesh(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)], 0.0)
}

/// Two single-cell islands at `x = 0` and `x = 3` with no shared edges
pub fn create_islands_navmesh() -> NavMesh {
    create_cells_navmesh(&[(0, 0), (3, 0)], 0.0)
}

/// 3x3 floor at `y = 0` crossed by a one cell wide bridge at `y = 5` over
/// `x` in `[0, 3]`, `z` in `[1, 2]`. The bridge is not connected to the floor.
pub fn create_bridge_navmesh() -> NavMesh {
    let mut triangles = Vec::new();
    for z in 0..3 {
        for x in 0..3 {
            triangles.extend(cell_triangles(x, z, 0.0));
        }
    }
    for x in 0..3 {
        triangles.extend(cell_triangles(x, 1, 5.0));
    }
    NavMesh::from_triangles(&triangles, &BuildConfig::default()).expect("bridge mesh")
}
