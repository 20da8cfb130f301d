// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line segment detection

use crate::types::{LineSegment, Point2D};
use image::GrayImage;
use std::f64::consts::PI;

/// Parameters of the probabilistic Hough transform
#[derive(Debug, Clone, Copy)]
pub struct HoughParams {
    /// Minimum votes (unclaimed edge pixels) for a line
    pub threshold: u32,
    pub min_line_length: f64,
    pub max_line_gap: f64,
    /// Accumulator peaks examined, strongest first
    pub max_peaks: usize,
}

/// Detect line segments using a probabilistic Hough transform
///
/// Votes are cast at 1 pixel / 1 degree resolution. Peaks are visited by
/// descending vote count; each one claims the unclaimed edge pixels lying
/// within 2 pixels of its line, and splits them into segments wherever
/// consecutive pixels are more than `max_line_gap` apart. Pixels of an
/// accepted segment are never reused by later peaks.
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let width = edges.width() as i32;
    let height = edges.height() as i32;

    let rho_resolution = 1.0;
    let theta_resolution = PI / 180.0;
    let num_thetas = (PI / theta_resolution).round() as usize;

    let mut cos_table = Vec::with_capacity(num_thetas);
    let mut sin_table = Vec::with_capacity(num_thetas);
    for i in 0..num_thetas {
        let theta = i as f64 * theta_resolution;
        cos_table.push(theta.cos());
        sin_table.push(theta.sin());
    }

    let max_rho = ((width * width + height * height) as f64).sqrt();
    let num_rhos = (2.0 * max_rho / rho_resolution) as usize + 1;
    let rho_offset = max_rho;

    let edge_points: Vec<(i32, i32)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 128)
        .map(|(x, y, _)| (x as i32, y as i32))
        .collect();

    if edge_points.is_empty() {
        return Vec::new();
    }

    let mut accumulator = vec![0u32; num_thetas * num_rhos];
    for &(x, y) in &edge_points {
        for theta_idx in 0..num_thetas {
            let rho = x as f64 * cos_table[theta_idx] + y as f64 * sin_table[theta_idx];
            let rho_idx = ((rho + rho_offset) / rho_resolution) as usize;
            if rho_idx < num_rhos {
                accumulator[theta_idx * num_rhos + rho_idx] += 1;
            }
        }
    }

    let mut peaks: Vec<(usize, usize, u32)> = Vec::new();
    for theta_idx in 0..num_thetas {
        for rho_idx in 0..num_rhos {
            let votes = accumulator[theta_idx * num_rhos + rho_idx];
            if votes >= params.threshold {
                peaks.push((theta_idx, rho_idx, votes));
            }
        }
    }
    peaks.sort_by(|a, b| b.2.cmp(&a.2));

    let mut segments = Vec::new();
    let mut used_points = vec![false; edge_points.len()];

    for &(theta_idx, rho_idx, _votes) in peaks.iter().take(params.max_peaks) {
        let rho = rho_idx as f64 * rho_resolution - rho_offset;
        let cos_t = cos_table[theta_idx];
        let sin_t = sin_table[theta_idx];

        let mut line_points: Vec<(i32, i32, usize)> = edge_points
            .iter()
            .enumerate()
            .filter(|(i, _)| !used_points[*i])
            .filter(|(_, &(x, y))| (x as f64 * cos_t + y as f64 * sin_t - rho).abs() < 2.0)
            .map(|(i, &(x, y))| (x, y, i))
            .collect();

        // Earlier peaks may have claimed most of this line already
        if (line_points.len() as u32) < params.threshold {
            continue;
        }

        // Order along the line direction
        line_points.sort_by(|a, b| {
            let proj_a = a.0 as f64 * (-sin_t) + a.1 as f64 * cos_t;
            let proj_b = b.0 as f64 * (-sin_t) + b.1 as f64 * cos_t;
            proj_a.total_cmp(&proj_b)
        });

        let mut segment_start = 0;
        for i in 1..=line_points.len() {
            let split = i == line_points.len() || {
                let dx = (line_points[i].0 - line_points[i - 1].0) as f64;
                let dy = (line_points[i].1 - line_points[i - 1].1) as f64;
                (dx * dx + dy * dy).sqrt() > params.max_line_gap
            };
            if !split {
                continue;
            }

            if i - segment_start >= 2 {
                let start_pt = line_points[segment_start];
                let end_pt = line_points[i - 1];
                let segment = LineSegment::new(
                    Point2D::new(start_pt.0 as f64, start_pt.1 as f64),
                    Point2D::new(end_pt.0 as f64, end_pt.1 as f64),
                );

                if segment.length() >= params.min_line_length {
                    segments.push(segment);
                    for point in &line_points[segment_start..i] {
                        used_points[point.2] = true;
                    }
                }
            }
            segment_start = i;
        }
    }

    segments
}

/// Drop segments shorter than `min_length`
pub fn filter_short_segments(segments: &[LineSegment], min_length: f64) -> Vec<LineSegment> {
    segments
        .iter()
        .filter(|s| s.length() >= min_length)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn params() -> HoughParams {
        HoughParams {
            threshold: 40,
            min_line_length: 40.0,
            max_line_gap: 10.0,
            max_peaks: 500,
        }
    }

    #[test]
    fn test_empty_edge_map() {
        let edges = GrayImage::new(50, 50);
        assert!(detect_segments(&edges, &params()).is_empty());
    }

    #[test]
    fn test_single_horizontal_edge() {
        let mut edges = GrayImage::new(120, 60);
        for x in 10..110 {
            edges.put_pixel(x, 30, Luma([255]));
        }

        let segments = detect_segments(&edges, &params());

        assert_eq!(segments.len(), 1);
        let seg = segments[0];
        assert_eq!(seg.start.y, 30.0);
        assert_eq!(seg.end.y, 30.0);
        assert!((seg.length() - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_gap_splits_line() {
        let mut edges = GrayImage::new(200, 40);
        for x in (5..65).chain(100..160) {
            edges.put_pixel(x, 20, Luma([255]));
        }

        let segments = detect_segments(
            &edges,
            &HoughParams {
                threshold: 50,
                ..params()
            },
        );

        assert_eq!(segments.len(), 2);
        for seg in &segments {
            assert!((seg.length() - 59.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_short_runs_are_not_segments() {
        let mut edges = GrayImage::new(100, 100);
        for x in 10..30 {
            edges.put_pixel(x, 50, Luma([255]));
        }
        let segments = detect_segments(
            &edges,
            &HoughParams {
                threshold: 10,
                ..params()
            },
        );
        assert!(segments.is_empty());
    }

    #[test]
    fn test_filter_short_segments() {
        let segments = vec![
            LineSegment::from_coords(0.0, 0.0, 29.9, 0.0),
            LineSegment::from_coords(0.0, 0.0, 30.0, 0.0),
        ];
        let kept = filter_short_segments(&segments, 30.0);
        assert_eq!(kept, vec![segments[1]]);
    }
}
