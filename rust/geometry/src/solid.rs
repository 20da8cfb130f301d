// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion of shape records into triangulated solids
//!
//! Rectangular shapes become axis-aligned boxes and circles become
//! 32-sided prisms. Every solid stands on z = 0 and grows towards +z.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::shape::{Disk, Rect, Shape};
use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Whether circle prisms get top and bottom faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleCaps {
    /// Side ring only (2 triangles per segment)
    #[default]
    Open,
    /// Side ring plus a triangle fan on each end
    Closed,
}

/// Extrusion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Extrusion height of walls
    pub wall_thickness: f64,
    /// Extrusion height of doors and windows
    pub opening_thickness: f64,
    /// Extrusion height of circular fixtures
    pub circle_height: f64,
    /// Circumferential segments of a circle prism
    pub circle_segments: u32,
    pub circle_caps: CircleCaps,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 20.0,
            opening_thickness: 10.0,
            circle_height: 5.0,
            circle_segments: 32,
            circle_caps: CircleCaps::Open,
        }
    }
}

/// Box triangulation: bottom, top, front, right, back, left.
///
/// Vertices 0..4 are the base corners (x, y), (x+w, y), (x+w, y+h), (x, y+h);
/// 4..8 are the same corners lifted to the top.
const BOX_TRIANGLES: [[u32; 3]; 12] = [
    [0, 2, 1], [0, 3, 2], // bottom (-z)
    [4, 5, 6], [4, 6, 7], // top (+z)
    [0, 1, 5], [0, 5, 4], // front (-y)
    [1, 2, 6], [1, 6, 5], // right (+x)
    [2, 3, 7], [2, 7, 6], // back (+y)
    [3, 0, 4], [3, 4, 7], // left (-x)
];

/// Extrude a rectangle footprint into a 12-triangle box
pub fn build_box(rect: &Rect, thickness: f64) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, BOX_TRIANGLES.len());

    for z in [0.0, thickness] {
        mesh.add_vertex(Point3::new(rect.x, rect.y, z));
        mesh.add_vertex(Point3::new(rect.max_x(), rect.y, z));
        mesh.add_vertex(Point3::new(rect.max_x(), rect.max_y(), z));
        mesh.add_vertex(Point3::new(rect.x, rect.max_y(), z));
    }

    for [a, b, c] in BOX_TRIANGLES {
        mesh.add_triangle(a, b, c);
    }

    mesh
}

/// Extrude a disk into a prism approximated with `segments` sides
///
/// Ring vertices alternate bottom/top: `2i` is at z = 0, `2i + 1` at
/// z = `height`, for angle `2πi / segments`.
pub fn build_cylinder(disk: &Disk, height: f64, segments: u32, caps: CircleCaps) -> Mesh {
    let segments = segments.max(3);
    let cap_vertices = if caps == CircleCaps::Closed { 2 } else { 0 };
    let cap_triangles = if caps == CircleCaps::Closed { 2 * segments as usize } else { 0 };
    let mut mesh = Mesh::with_capacity(
        2 * segments as usize + cap_vertices,
        2 * segments as usize + cap_triangles,
    );

    let step = 2.0 * PI / segments as f64;
    for i in 0..segments {
        let theta = i as f64 * step;
        let x = disk.cx + disk.r * theta.cos();
        let y = disk.cy + disk.r * theta.sin();
        mesh.add_vertex(Point3::new(x, y, 0.0));
        mesh.add_vertex(Point3::new(x, y, height));
    }

    for i in 0..segments {
        let j = (i + 1) % segments;
        mesh.add_triangle(i * 2, j * 2, i * 2 + 1);
        mesh.add_triangle(j * 2, j * 2 + 1, i * 2 + 1);
    }

    if caps == CircleCaps::Closed {
        let bottom_center = mesh.add_vertex(Point3::new(disk.cx, disk.cy, 0.0));
        let top_center = mesh.add_vertex(Point3::new(disk.cx, disk.cy, height));
        for i in 0..segments {
            let j = (i + 1) % segments;
            mesh.add_triangle(bottom_center, j * 2, i * 2);
            mesh.add_triangle(top_center, i * 2 + 1, j * 2 + 1);
        }
    }

    mesh
}

/// Build the solid for a single shape
pub fn build_shape_mesh(shape: &Shape, config: &MeshConfig) -> Mesh {
    match shape {
        Shape::Wall(rect) => build_box(rect, config.wall_thickness),
        Shape::Door(rect) | Shape::Window(rect) => build_box(rect, config.opening_thickness),
        Shape::Circle(disk) => build_cylinder(
            disk,
            config.circle_height,
            config.circle_segments,
            config.circle_caps,
        ),
    }
}

/// Build one mesh per shape, in input order
///
/// Shapes are independent, so they are extruded on the rayon pool.
/// Shapes violating the positive-size invariant are rejected up front.
pub fn build_meshes(shapes: &[Shape], config: &MeshConfig) -> Result<Vec<Mesh>> {
    if shapes.is_empty() {
        return Err(Error::EmptyInput("no shapes to extrude".to_string()));
    }

    for shape in shapes {
        shape.validate()?;
    }

    let meshes: Vec<Mesh> = shapes
        .par_iter()
        .map(|shape| build_shape_mesh(shape, config))
        .collect();

    tracing::debug!(shapes = shapes.len(), "built per-shape meshes");
    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::facet_normal;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn centroid(mesh: &Mesh) -> Point3<f32> {
        let n = mesh.vertex_count() as f32;
        let mut sum = Vector3::zeros();
        for chunk in mesh.positions.chunks_exact(3) {
            sum += Vector3::new(chunk[0], chunk[1], chunk[2]);
        }
        Point3::from(sum / n)
    }

    /// Every facet normal points away from the solid's centroid
    fn assert_outward(mesh: &Mesh) {
        let center = centroid(mesh);
        for tri in mesh.triangles() {
            let normal = facet_normal(&tri);
            let face_center = Point3::from((tri[0].coords + tri[1].coords + tri[2].coords) / 3.0);
            assert!(
                normal.dot(&(face_center - center)) > 0.0,
                "inward facet {:?}",
                tri
            );
        }
    }

    #[test]
    fn test_box_faces_point_outwards() {
        let mesh = build_box(&Rect::new(3.0, 4.0, 10.0, 6.0), 20.0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward(&mesh);
    }

    #[test]
    fn test_box_face_normals_are_axis_aligned() {
        let mesh = build_box(&Rect::new(0.0, 0.0, 2.0, 3.0), 1.0);
        let normals: Vec<_> = mesh.triangles().map(|t| facet_normal(&t)).collect();
        let expected = [
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        ];
        for (face, normal) in expected.iter().enumerate() {
            assert_relative_eq!(normals[face * 2], *normal);
            assert_relative_eq!(normals[face * 2 + 1], *normal);
        }
    }

    #[test]
    fn test_open_cylinder() {
        let disk = Disk::new(50.0, 60.0, 8.0);
        let mesh = build_cylinder(&disk, 5.0, 32, CircleCaps::Open);
        assert_eq!(mesh.vertex_count(), 64);
        assert_eq!(mesh.triangle_count(), 64);
        assert_outward(&mesh);

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 5.0);
        assert_relative_eq!(max.x, 58.0, epsilon = 1e-4);
        assert_relative_eq!(min.x, 42.0, epsilon = 1e-4);
    }

    #[test]
    fn test_closed_cylinder_adds_caps() {
        let disk = Disk::new(0.0, 0.0, 4.0);
        let mesh = build_cylinder(&disk, 5.0, 32, CircleCaps::Closed);
        assert_eq!(mesh.vertex_count(), 66);
        assert_eq!(mesh.triangle_count(), 128);
        assert_outward(&mesh);
    }

    #[test]
    fn test_thickness_per_kind() {
        let config = MeshConfig::default();
        let wall = build_shape_mesh(&Shape::wall(0.0, 0.0, 10.0, 5.0).unwrap(), &config);
        let door = build_shape_mesh(&Shape::door(0.0, 0.0, 10.0, 5.0).unwrap(), &config);
        let window = build_shape_mesh(&Shape::window(0.0, 0.0, 10.0, 5.0).unwrap(), &config);
        assert_relative_eq!(wall.bounds().1.z, 20.0);
        assert_relative_eq!(door.bounds().1.z, 10.0);
        assert_relative_eq!(window.bounds().1.z, 10.0);
    }

    #[test]
    fn test_build_meshes_rejects_empty() {
        let err = build_meshes(&[], &MeshConfig::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn test_build_meshes_rejects_invalid_shape() {
        let bad = Shape::Wall(Rect::new(0.0, 0.0, 0.0, 3.0));
        let err = build_meshes(&[bad], &MeshConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }

    #[test]
    fn test_build_meshes_keeps_order() {
        let shapes = vec![
            Shape::circle(100.0, 100.0, 5.0).unwrap(),
            Shape::wall(0.0, 0.0, 10.0, 5.0).unwrap(),
        ];
        let meshes = build_meshes(&shapes, &MeshConfig::default()).unwrap();
        assert_eq!(meshes[0].triangle_count(), 64);
        assert_eq!(meshes[1].triangle_count(), 12);
    }
}
