// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end sketch parsing and STL export

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect as PixelRect;
use planforge_geometry::{shapes_to_mesh_file, stl, ShapeCounts, ShapeKind};
use planforge_vision::{parse_blueprint, BlueprintParser, DetectionConfig, Error};
use std::path::Path;

/// Thin outer walls, a door slab, a square window mark and a round fixture
fn sketch() -> GrayImage {
    let mut img = GrayImage::from_pixel(400, 300, Luma([255]));

    for x in 30..370 {
        for y in [30, 31, 269, 270] {
            img.put_pixel(x, y, Luma([0]));
        }
    }
    for y in 30..271 {
        for x in [30, 31, 369, 370] {
            img.put_pixel(x, y, Luma([0]));
        }
    }

    draw_filled_rect_mut(&mut img, PixelRect::at(80, 90).of_size(20, 50), Luma([0]));
    draw_filled_rect_mut(&mut img, PixelRect::at(160, 90).of_size(50, 50), Luma([0]));
    draw_filled_circle_mut(&mut img, (290, 180), 40, Luma([0]));
    img
}

fn quiet_parser() -> BlueprintParser {
    BlueprintParser::new(DetectionConfig {
        preview_path: None,
        ..Default::default()
    })
}

fn save(img: &GrayImage, dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn sketch_yields_every_kind() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&sketch(), dir.path(), "plan.png");

    let shapes = quiet_parser().parse_file(&path).unwrap();
    let counts = ShapeCounts::of(&shapes);

    assert!(counts.walls >= 4, "walls: {:?}", counts);
    assert_eq!(counts.doors, 1, "{:?}", shapes);
    assert_eq!(counts.windows, 1, "{:?}", shapes);
    assert_eq!(counts.circles, 1, "{:?}", shapes);
    assert!(shapes.iter().all(|s| s.is_valid()));

    let first_other = shapes
        .iter()
        .position(|s| s.kind() != ShapeKind::Wall)
        .unwrap();
    assert_eq!(first_other, counts.walls);
}

#[test]
fn parsed_sketch_becomes_stl() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&sketch(), dir.path(), "plan.png");

    let shapes = quiet_parser().parse_file(&path).unwrap();
    let counts = ShapeCounts::of(&shapes);

    let out = shapes_to_mesh_file(&shapes, dir.path().join("out/plan.stl")).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(
        stl::read_binary_triangle_count(&bytes).unwrap(),
        12 * counts.boxes() + 64 * counts.circles
    );
}

#[test]
fn blank_sketch_has_no_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let source = RgbImage::from_pixel(120, 90, Rgb([255, 255, 255]));
    let path = dir.path().join("blank.png");
    source.save(&path).unwrap();

    let preview_path = dir.path().join("preview.png");
    let parser = BlueprintParser::new(DetectionConfig {
        preview_path: Some(preview_path.clone()),
        ..Default::default()
    });

    let shapes = parser.parse_file(&path).unwrap();
    assert!(shapes.is_empty());

    let preview = image::open(&preview_path).unwrap().to_rgb8();
    assert_eq!(preview, source);
}

#[test]
fn preview_failure_does_not_abort_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&sketch(), dir.path(), "plan.png");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let parser = BlueprintParser::new(DetectionConfig {
        preview_path: Some(blocker.join("preview.jpg")),
        ..Default::default()
    });
    assert!(!parser.parse_file(&path).unwrap().is_empty());
}

#[test]
fn missing_file_is_not_found() {
    let err = parse_blueprint("does/not/exist.png").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn garbage_file_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let err = quiet_parser().parse_file(&path).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "{:?}", err);
}
