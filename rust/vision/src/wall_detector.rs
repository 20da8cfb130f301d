// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall detection from straight edges

use crate::image_ops::{canny_edges, morphological_close};
use crate::line_ops::{detect_segments, filter_short_segments, HoughParams};
use crate::types::{DetectionConfig, LineSegment};
use image::GrayImage;
use planforge_geometry::{Rect, Shape};

/// Find straight segments that may be walls
///
/// Pipeline: Canny edges, closing to bridge small breaks, then the
/// probabilistic Hough transform.
pub fn detect_wall_segments(blurred: &GrayImage, config: &DetectionConfig) -> Vec<LineSegment> {
    let edges = canny_edges(blurred, config.canny_low, config.canny_high);
    let closed = morphological_close(&edges, config.close_iterations);

    let segments = detect_segments(
        &closed,
        &HoughParams {
            threshold: config.hough_threshold,
            min_line_length: config.hough_min_line_length,
            max_line_gap: config.hough_max_line_gap,
            max_peaks: config.hough_max_peaks,
        },
    );

    tracing::debug!(segments = segments.len(), "hough segments");
    segments
}

/// Keep segments long enough to be walls, paired with their wall shape
///
/// Each wall is the segment's bounding box; an axis-aligned segment gets
/// `wall_min_thickness` on its flat axis.
pub fn segments_to_walls(
    segments: &[LineSegment],
    config: &DetectionConfig,
) -> Vec<(LineSegment, Shape)> {
    filter_short_segments(segments, config.min_segment_length)
        .into_iter()
        .map(|seg| {
            let rect = Rect::from_segment(
                seg.start.x,
                seg.start.y,
                seg.end.x,
                seg.end.y,
                config.wall_min_thickness,
            );
            (seg, Shape::Wall(rect))
        })
        .collect()
}

/// Main wall detection pipeline
pub fn detect_walls(blurred: &GrayImage, config: &DetectionConfig) -> Vec<(LineSegment, Shape)> {
    let segments = detect_wall_segments(blurred, config);
    segments_to_walls(&segments, config)
}
