// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch parsing and STL generation for request handlers.
//!
//! Both functions are CPU-bound and meant to run under
//! `tokio::task::spawn_blocking`.

use planforge_geometry::{shapes_to_mesh_file, Rect, Shape};
use planforge_vision::{BlueprintParser, DetectionConfig};
use std::path::{Path, PathBuf};

/// Shapes returned by `/upload` when a sketch cannot be parsed.
pub fn upload_fallback() -> Vec<Shape> {
    vec![
        Shape::Wall(Rect::new(10.0, 20.0, 100.0, 10.0)),
        Shape::Door(Rect::new(120.0, 20.0, 30.0, 10.0)),
        Shape::Window(Rect::new(160.0, 20.0, 40.0, 10.0)),
    ]
}

/// Shapes extruded by `/generate_stl` when a sketch yields nothing usable.
pub fn generate_fallback() -> Vec<Shape> {
    vec![Shape::Wall(Rect::new(0.0, 0.0, 100.0, 10.0))]
}

fn parser(preview_path: &Path) -> BlueprintParser {
    BlueprintParser::new(DetectionConfig {
        preview_path: Some(preview_path.to_path_buf()),
        ..Default::default()
    })
}

/// Parse a sketch, substituting `fallback` when parsing fails.
pub fn parse_or(image: &Path, preview_path: &Path, fallback: fn() -> Vec<Shape>) -> Vec<Shape> {
    match parser(preview_path).parse_file(image) {
        Ok(shapes) => shapes,
        Err(e) => {
            tracing::warn!(path = %image.display(), error = %e, "blueprint parse failed, using fallback shapes");
            fallback()
        }
    }
}

/// Parse a stored sketch and write its STL to `output`.
///
/// A failed parse or an empty shape list falls back to a single wall so the
/// caller always gets a file.
pub fn generate_stl(
    image: &Path,
    preview_path: &Path,
    output: &Path,
) -> planforge_geometry::Result<PathBuf> {
    let mut shapes = parse_or(image, preview_path, generate_fallback);
    if shapes.is_empty() {
        tracing::warn!(path = %image.display(), "no shapes detected, using fallback shapes");
        shapes = generate_fallback();
    }
    shapes_to_mesh_file(&shapes, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_geometry::stl::read_binary_triangle_count;

    #[test]
    fn test_fallbacks_are_valid() {
        assert!(upload_fallback().iter().all(|s| s.is_valid()));
        assert!(generate_fallback().iter().all(|s| s.is_valid()));
        assert_eq!(upload_fallback().len(), 3);
    }

    #[test]
    fn test_unreadable_sketch_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("broken.png");
        std::fs::write(&image, b"garbage").unwrap();

        let shapes = parse_or(&image, &dir.path().join("preview.jpg"), upload_fallback);
        assert_eq!(shapes, upload_fallback());
    }

    #[test]
    fn test_generate_from_blank_sketch_writes_fallback_wall() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("blank.png");
        image::RgbImage::from_pixel(64, 64, image::Rgb([255, 255, 255]))
            .save(&image)
            .unwrap();

        let out = dir.path().join("stl/out.stl");
        let written = generate_stl(&image, &dir.path().join("preview.jpg"), &out).unwrap();

        let bytes = std::fs::read(written).unwrap();
        assert_eq!(read_binary_triangle_count(&bytes).unwrap(), 12);
    }
}
