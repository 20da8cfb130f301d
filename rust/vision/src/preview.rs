// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Annotated preview raster
//!
//! Overlays are drawn 2 pixels thick on an RGB copy of the source:
//! walls in blue, circles in yellow, doors in green, windows in red.

use crate::types::LineSegment;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;
use planforge_geometry::{Rect, Shape};
use std::path::Path;

pub const WALL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const CIRCLE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
pub const DOOR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const WINDOW_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const THICKNESS: i32 = 2;

/// Draw detected primitives over a copy of `source`
///
/// Walls are drawn from their Hough segments, not their boxes. Wall shapes
/// in `shapes` are ignored.
pub fn render_preview(source: &RgbImage, wall_segments: &[LineSegment], shapes: &[Shape]) -> RgbImage {
    let mut preview = source.clone();

    for seg in wall_segments {
        draw_thick_line(&mut preview, seg, WALL_COLOR);
    }

    for shape in shapes {
        match shape {
            Shape::Wall(_) => {}
            Shape::Door(rect) => draw_thick_rect(&mut preview, rect, DOOR_COLOR),
            Shape::Window(rect) => draw_thick_rect(&mut preview, rect, WINDOW_COLOR),
            Shape::Circle(disk) => {
                let center = (disk.cx as i32, disk.cy as i32);
                let r = disk.r as i32;
                for offset in 0..THICKNESS {
                    draw_hollow_circle_mut(&mut preview, center, r + offset, CIRCLE_COLOR);
                }
            }
        }
    }

    preview
}

/// Write the preview, logging instead of failing
///
/// Creates the parent directory first. Returns whether the file was written.
pub fn save_best_effort(preview: &RgbImage, path: &Path) -> bool {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(path = %path.display(), error = %e, "could not create preview directory");
            return false;
        }
    }

    match preview.save(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "preview saved");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not save preview");
            false
        }
    }
}

fn draw_thick_line(img: &mut RgbImage, seg: &LineSegment, color: Rgb<u8>) {
    let horizontal = (seg.end.x - seg.start.x).abs() >= (seg.end.y - seg.start.y).abs();
    for offset in 0..THICKNESS {
        let (dx, dy) = if horizontal {
            (0.0, offset as f32)
        } else {
            (offset as f32, 0.0)
        };
        draw_line_segment_mut(
            img,
            (seg.start.x as f32 + dx, seg.start.y as f32 + dy),
            (seg.end.x as f32 + dx, seg.end.y as f32 + dy),
            color,
        );
    }
}

fn draw_thick_rect(img: &mut RgbImage, rect: &Rect, color: Rgb<u8>) {
    let (x, y) = (rect.x as i32, rect.y as i32);
    let (w, h) = (rect.width as u32, rect.height as u32);
    for inset in 0..THICKNESS {
        let iw = w.saturating_sub(2 * inset as u32);
        let ih = h.saturating_sub(2 * inset as u32);
        if iw == 0 || ih == 0 {
            break;
        }
        draw_hollow_rect_mut(img, PixelRect::at(x + inset, y + inset).of_size(iw, ih), color);
    }
}
