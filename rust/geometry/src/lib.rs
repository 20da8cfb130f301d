// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PlanForge Geometry
//!
//! Shape records for floor-plan primitives, their extrusion into box and
//! cylinder solids, and STL export of the assembled mesh.
//!
//! ```rust,ignore
//! use planforge_geometry::{shapes_to_mesh_file, Shape};
//!
//! let shapes = vec![Shape::wall(10.0, 20.0, 100.0, 10.0)?];
//! let written = shapes_to_mesh_file(&shapes, "out/plan.stl")?;
//! ```

pub mod assembly;
pub mod error;
pub mod mesh;
pub mod shape;
pub mod solid;
pub mod stl;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use assembly::{assemble, shapes_to_mesh, shapes_to_mesh_file, shapes_to_mesh_file_with};
pub use error::{Error, Result};
pub use mesh::{facet_normal, Mesh};
pub use shape::{Disk, Rect, Shape, ShapeCounts, ShapeKind};
pub use solid::{build_box, build_cylinder, build_meshes, build_shape_mesh, CircleCaps, MeshConfig};
pub use stl::{write_stl, StlFormat};
