// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan sketch recognition
//!
//! This crate turns a raster sketch into a list of [`Shape`] records:
//! 1. Luminance conversion and Gaussian smoothing
//! 2. Walls from straight edges (Canny, closing, probabilistic Hough)
//! 3. Doors, windows and circular fixtures from dark closed markings
//!    (inverse threshold, opening, contour classification)
//! 4. An annotated preview raster of everything found
//!
//! # Usage
//!
//! ```rust,ignore
//! use planforge_geometry::shapes_to_mesh_file;
//! use planforge_vision::parse_blueprint;
//!
//! let shapes = parse_blueprint("sketch.png")?;
//! let stl = shapes_to_mesh_file(&shapes, "generated_stls/sketch.stl")?;
//! ```

pub mod blueprint_parser;
pub mod contour_classifier;
pub mod error;
pub mod image_ops;
pub mod line_ops;
pub mod preview;
pub mod types;
pub mod wall_detector;

// Re-export commonly used types and functions
pub use blueprint_parser::{parse_blueprint, BlueprintParser, Detection};
pub use contour_classifier::{classify, classify_contours, ContourMetrics};
pub use error::{Error, Result};
pub use image_ops::{decode_image, load_image, preprocess};
pub use types::{DetectionConfig, LineSegment, Point2D};
pub use wall_detector::detect_walls;

pub use planforge_geometry::{Shape, ShapeKind};
