//! Triangle mesh import
//!
//! [`TriMesh`] is the raw geometry handed to navigation mesh construction: a
//! vertex list plus an index buffer with three indices per triangle. Indices
//! are not validated here; the navmesh builder rejects out-of-range ones.

use crate::{Error, Result};
use glam::Vec3;

#[cfg(feature = "std")]
use std::fs::File;
#[cfg(feature = "std")]
use std::io::{BufRead, BufReader};
#[cfg(feature = "std")]
use std::path::Path;

/// Prefixes an OBJ parse error with its 1-based line number
fn at_line(error: Error, line: usize) -> Error {
    match error {
        Error::InvalidMesh(message) => Error::InvalidMesh(format!("line {line}: {message}")),
        other => other,
    }
}

/// A simple indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TriMesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Vertex indices, 3 per triangle
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Creates a new empty triangle mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from existing vertex and index buffers
    pub fn from_parts(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of vertices in the mesh
    pub fn vert_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of complete triangles in the index buffer
    pub fn tri_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `tri`, or `None` if it is missing or references
    /// a vertex that does not exist
    pub fn triangle(&self, tri: usize) -> Option<[Vec3; 3]> {
        let idx = self.indices.get(tri * 3..tri * 3 + 3)?;
        Some([
            *self.vertices.get(idx[0] as usize)?,
            *self.vertices.get(idx[1] as usize)?,
            *self.vertices.get(idx[2] as usize)?,
        ])
    }

    /// Loads a mesh from an OBJ file
    ///
    /// This method is only available when the `std` feature is enabled.
    #[cfg(feature = "std")]
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut mesh = Self::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            mesh.parse_obj_line(&line).map_err(|e| at_line(e, number + 1))?;
        }

        Ok(mesh)
    }

    /// Parses OBJ content from a string
    ///
    /// # Example
    ///
    /// ```
    /// use navmesh_common::TriMesh;
    ///
    /// let obj_content = r#"
    /// v 0.0 0.0 0.0
    /// v 1.0 0.0 0.0
    /// v 0.0 0.0 1.0
    /// f 1 2 3
    /// "#;
    ///
    /// let mesh = TriMesh::from_obj_str(obj_content).unwrap();
    /// assert_eq!(mesh.vert_count(), 3);
    /// assert_eq!(mesh.tri_count(), 1);
    /// ```
    pub fn from_obj_str(content: &str) -> Result<Self> {
        let mut mesh = Self::new();

        for (number, line) in content.lines().enumerate() {
            mesh.parse_obj_line(line).map_err(|e| at_line(e, number + 1))?;
        }

        Ok(mesh)
    }

    fn parse_obj_line(&mut self, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coord = |axis: &str| -> Result<f32> {
                    tokens
                        .next()
                        .ok_or_else(|| {
                            Error::InvalidMesh(format!("Invalid vertex: missing {axis} coordinate"))
                        })?
                        .parse::<f32>()
                        .map_err(|_| {
                            Error::InvalidMesh(format!(
                                "Invalid vertex: {axis} coordinate is not a number"
                            ))
                        })
                };

                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                self.vertices.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let mut face_indices = Vec::new();

                for token in tokens {
                    face_indices.push(self.resolve_obj_index(token)?);
                }

                if face_indices.len() < 3 {
                    return Err(Error::InvalidMesh(
                        "Invalid face: less than 3 vertices".to_string(),
                    ));
                }

                // Polygons are fan triangulated around their first vertex
                for i in 1..(face_indices.len() - 1) {
                    self.indices.push(face_indices[0]);
                    self.indices.push(face_indices[i]);
                    self.indices.push(face_indices[i + 1]);
                }
            }
            _ => {
                // Normals, texture coordinates, groups, materials and comments
            }
        }

        Ok(())
    }

    /// Converts one `f` token (`v`, `v/vt`, `v//vn`, `v/vt/vn`) into a 0-based index.
    /// Negative OBJ indices count back from the most recent vertex.
    fn resolve_obj_index(&self, token: &str) -> Result<u32> {
        let index_str = token.split('/').next().unwrap_or_default();

        let index = index_str.parse::<i64>().map_err(|_| {
            Error::InvalidMesh(format!("Invalid face: vertex index '{token}' is not a number"))
        })?;

        let resolved = match index {
            0 => None,
            i if i > 0 => Some(i - 1),
            i => Some(self.vertices.len() as i64 + i),
        };

        resolved
            .filter(|&i| i >= 0)
            .and_then(|i| u32::try_from(i).ok())
            .ok_or_else(|| Error::InvalidMesh(format!("Invalid face: vertex index {index}")))
    }

    /// Calculates the axis-aligned bounding box of the mesh
    pub fn calculate_bounds(&self) -> (Vec3, Vec3) {
        crate::calc_bounds(self.vertices.iter().copied()).unwrap_or((Vec3::ZERO, Vec3::ZERO))
    }
}
