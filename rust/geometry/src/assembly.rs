// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Combining per-shape solids into one exportable mesh

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::shape::{Shape, ShapeCounts};
use crate::solid::{build_meshes, MeshConfig};
use crate::stl::{write_stl, StlFormat};
use std::path::{Path, PathBuf};

/// Concatenate meshes in order
///
/// All inputs already live in the shared world frame, so vertices are
/// copied as-is and only indices are offset.
pub fn assemble(meshes: Vec<Mesh>) -> Result<Mesh> {
    if meshes.is_empty() {
        return Err(Error::EmptyInput("no meshes to assemble".to_string()));
    }

    let mut combined = Mesh::new();
    combined.merge_all(&meshes);
    Ok(combined)
}

/// Extrude shapes and assemble them without touching the filesystem
pub fn shapes_to_mesh(shapes: &[Shape], config: &MeshConfig) -> Result<Mesh> {
    assemble(build_meshes(shapes, config)?)
}

/// Extrude shapes with the default config and write a binary STL
///
/// Returns the written path. Fails with [`Error::EmptyInput`] on an empty
/// shape list, in which case nothing is written.
pub fn shapes_to_mesh_file(shapes: &[Shape], output_path: impl AsRef<Path>) -> Result<PathBuf> {
    shapes_to_mesh_file_with(shapes, output_path, &MeshConfig::default(), StlFormat::Binary)
}

/// Like [`shapes_to_mesh_file`] with explicit extrusion and format settings
pub fn shapes_to_mesh_file_with(
    shapes: &[Shape],
    output_path: impl AsRef<Path>,
    config: &MeshConfig,
    format: StlFormat,
) -> Result<PathBuf> {
    let output_path = output_path.as_ref();
    let mesh = shapes_to_mesh(shapes, config)?;
    write_stl(&mesh, output_path, format)?;

    let counts = ShapeCounts::of(shapes);
    tracing::info!(
        path = %output_path.display(),
        walls = counts.walls,
        doors = counts.doors,
        windows = counts.windows,
        circles = counts.circles,
        triangles = mesh.triangle_count(),
        "mesh file written"
    );
    Ok(output_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_empty() {
        assert!(matches!(assemble(Vec::new()), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_assemble_concatenates() {
        let shapes = vec![
            Shape::wall(0.0, 0.0, 10.0, 5.0).unwrap(),
            Shape::window(20.0, 0.0, 10.0, 5.0).unwrap(),
        ];
        let meshes = build_meshes(&shapes, &MeshConfig::default()).unwrap();
        let combined = assemble(meshes).unwrap();
        assert_eq!(combined.triangle_count(), 24);
        assert_eq!(combined.vertex_count(), 16);
        assert_eq!(*combined.indices.iter().max().unwrap(), 15);
    }
}
