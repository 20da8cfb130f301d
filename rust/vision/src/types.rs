// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor-plan sketch recognition

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A 2D point in image coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Straight segment found by the Hough stage, endpoints in pixel units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LineSegment {
    pub start: Point2D,
    pub end: Point2D,
}

impl LineSegment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Thresholds and kernel sizes for the detection pipeline
///
/// Defaults reproduce the tuned values for hand-drawn sketches scanned on
/// light paper. Every field can be overridden for unusual inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian blur kernel size (odd); sigma is derived from it
    pub blur_kernel_size: u32,
    /// Canny edge detection low threshold
    pub canny_low: f32,
    /// Canny edge detection high threshold
    pub canny_high: f32,
    /// Closing iterations (3x3 element) applied to the edge map
    pub close_iterations: u8,
    /// Hough accumulator vote threshold
    pub hough_threshold: u32,
    /// Minimum segment length reported by the Hough stage
    pub hough_min_line_length: f64,
    /// Maximum gap bridged inside one Hough segment
    pub hough_max_line_gap: f64,
    /// Upper bound on accumulator peaks examined
    pub hough_max_peaks: usize,
    /// Segments shorter than this never become walls
    pub min_segment_length: f64,
    /// Replacement for a zero wall width or height
    pub wall_min_thickness: f64,
    /// Gray level above which a pixel counts as background paper
    pub binary_threshold: u8,
    /// Opening iterations (3x3 element) applied to the binary mask
    pub open_iterations: u8,
    /// Contours enclosing less area are noise
    pub min_contour_area: f64,
    /// Polygon approximation tolerance as a fraction of the perimeter
    pub approx_epsilon_ratio: f64,
    /// Minimum approximated vertices for a circle
    pub circle_min_vertices: usize,
    /// Circularity must be strictly greater than this for a circle
    pub circularity_min: f64,
    /// Circularity must be at most this for a circle
    pub circularity_max: f64,
    /// Open width/height intervals classified as doors
    pub door_aspect_ranges: Vec<(f64, f64)>,
    /// Where the annotated preview is written; `None` disables it
    pub preview_path: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            close_iterations: 2,
            hough_threshold: 80,
            hough_min_line_length: 40.0,
            hough_max_line_gap: 10.0,
            hough_max_peaks: 500,
            min_segment_length: 30.0,
            wall_min_thickness: 5.0,
            binary_threshold: 200,
            open_iterations: 2,
            min_contour_area: 150.0,
            approx_epsilon_ratio: 0.02,
            circle_min_vertices: 8,
            circularity_min: 0.7,
            circularity_max: 1.2,
            door_aspect_ranges: vec![(0.2, 0.6), (1.5, 2.5)],
            preview_path: Some(PathBuf::from("uploads/preview.jpg")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_length() {
        let seg = LineSegment::from_coords(0.0, 0.0, 30.0, 40.0);
        assert!((seg.length() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_partial_json_keeps_defaults() {
        let config: DetectionConfig =
            serde_json::from_str(r#"{"hough_threshold": 40, "preview_path": null}"#).unwrap();
        assert_eq!(config.hough_threshold, 40);
        assert_eq!(config.min_contour_area, 150.0);
        assert!(config.preview_path.is_none());
    }
}
