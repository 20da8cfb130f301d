// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door, window and fixture detection via contour finding
//!
//! Dark closed markings are traced as outer contours and classified by
//! shape metrics. Roundness is tested first; anything not round enough is
//! a door or a window depending only on its bounding-box aspect ratio.

use crate::image_ops::{morphological_open, threshold_binary_inv};
use crate::types::{DetectionConfig, Point2D};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use planforge_geometry::Shape;
use std::f64::consts::PI;

/// Integer bounding box with inclusive pixel extents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Measurements of one contour that drive classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourMetrics {
    pub area: f64,
    pub perimeter: f64,
    pub circularity: f64,
    /// Vertex count of the simplified polygon
    pub approx_vertices: usize,
    pub bounds: BoundingBox,
    pub enclosing_center: Point2D,
    pub enclosing_radius: f64,
}

/// Detect doors, windows and circular fixtures
pub fn classify_contours(blurred: &GrayImage, config: &DetectionConfig) -> Vec<Shape> {
    let binary = threshold_binary_inv(blurred, config.binary_threshold);
    let cleaned = morphological_open(&binary, config.open_iterations);

    let contours = find_contours::<i32>(&cleaned);
    let mut shapes = Vec::new();

    for contour in contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
    {
        let points: Vec<Point2D> = contour
            .points
            .iter()
            .map(|p| Point2D::new(p.x as f64, p.y as f64))
            .collect();

        let Some(metrics) = measure_contour(&points, config) else {
            continue;
        };

        match classify(&metrics, config) {
            Some(shape) => shapes.push(shape),
            None => tracing::debug!(?metrics, "skipping degenerate contour"),
        }
    }

    tracing::debug!(
        contours = contours.len(),
        shapes = shapes.len(),
        "contour classification"
    );
    shapes
}

/// Compute classification metrics, or `None` for noise
///
/// Contours below `min_contour_area` and zero-perimeter contours are
/// rejected here rather than reported as errors.
pub fn measure_contour(points: &[Point2D], config: &DetectionConfig) -> Option<ContourMetrics> {
    let area = contour_area(points);
    if area < config.min_contour_area {
        return None;
    }

    let perimeter = arc_length(points);
    if perimeter == 0.0 {
        return None;
    }

    let approx = approximate_polygon(points, config.approx_epsilon_ratio * perimeter);
    let bounds = bounding_rect(points)?;
    let (enclosing_center, enclosing_radius) = min_enclosing_circle(points);

    Some(ContourMetrics {
        area,
        perimeter,
        circularity: circularity(area, perimeter),
        approx_vertices: approx.len(),
        bounds,
        enclosing_center,
        enclosing_radius,
    })
}

/// True when the metrics pass the roundness test
pub fn is_circle(metrics: &ContourMetrics, config: &DetectionConfig) -> bool {
    metrics.approx_vertices >= config.circle_min_vertices
        && metrics.circularity > config.circularity_min
        && metrics.circularity <= config.circularity_max
}

/// True when `aspect` falls strictly inside one of the door bands
pub fn is_door_aspect(aspect: f64, config: &DetectionConfig) -> bool {
    config
        .door_aspect_ranges
        .iter()
        .any(|&(low, high)| low < aspect && aspect < high)
}

/// Turn contour metrics into a shape record
///
/// Returns `None` when the result would violate the positive-size
/// invariant (e.g. an enclosing radius that truncates to zero).
pub fn classify(metrics: &ContourMetrics, config: &DetectionConfig) -> Option<Shape> {
    if is_circle(metrics, config) {
        return Shape::circle(
            metrics.enclosing_center.x.trunc(),
            metrics.enclosing_center.y.trunc(),
            metrics.enclosing_radius.trunc(),
        )
        .ok();
    }

    let b = metrics.bounds;
    let (x, y, w, h) = (b.x as f64, b.y as f64, b.width as f64, b.height as f64);
    if is_door_aspect(b.aspect_ratio(), config) {
        Shape::door(x, y, w, h).ok()
    } else {
        Shape::window(x, y, w, h).ok()
    }
}

/// Isoperimetric ratio, 1.0 for a perfect circle
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    4.0 * PI * area / (perimeter * perimeter)
}

/// Enclosed area of a closed polygon (shoelace formula)
pub fn contour_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    (area / 2.0).abs()
}

/// Perimeter of a closed polygon
pub fn arc_length(points: &[Point2D]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.distance_to(b))
        .sum()
}

/// Inclusive integer bounding box of the points
pub fn bounding_rect(points: &[Point2D]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let x = min_x.floor() as i32;
    let y = min_y.floor() as i32;
    Some(BoundingBox {
        x,
        y,
        width: max_x.floor() as i32 - x + 1,
        height: max_y.floor() as i32 - y + 1,
    })
}

/// Simplify a closed contour with Douglas-Peucker
///
/// The ring is cut at the first point and the point farthest from it; both
/// halves are simplified as open polylines and joined. The returned polygon
/// does not repeat its first vertex.
pub fn approximate_polygon(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let far_idx = points
        .iter()
        .enumerate()
        .max_by(|a, b| first.distance_to(a.1).total_cmp(&first.distance_to(b.1)))
        .map(|(i, _)| i)
        .unwrap_or(0);

    if far_idx == 0 {
        return vec![first];
    }

    let mut closed = points.to_vec();
    closed.push(first);

    let mut result = douglas_peucker(&closed[..=far_idx], epsilon);
    let second = douglas_peucker(&closed[far_idx..], epsilon);
    result.extend_from_slice(&second[1..]);
    result.pop();
    result
}

/// Douglas-Peucker line simplification algorithm
fn douglas_peucker(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = &points[0];
    let last = &points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        let left = douglas_peucker(&points[..=max_idx], epsilon);
        let right = douglas_peucker(&points[max_idx..], epsilon);

        let mut result = left;
        result.extend_from_slice(&right[1..]);
        result
    } else {
        vec![*first, *last]
    }
}

/// Calculate perpendicular distance from point to line
fn perpendicular_distance(point: &Point2D, line_start: &Point2D, line_end: &Point2D) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-10 {
        return point.distance_to(line_start);
    }

    let length = length_sq.sqrt();
    ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs() / length
}

/// Smallest circle containing every point (incremental Welzl)
pub fn min_enclosing_circle(points: &[Point2D]) -> (Point2D, f64) {
    let Some(&first) = points.first() else {
        return (Point2D::new(0.0, 0.0), 0.0);
    };

    let mut center = first;
    let mut radius = 0.0;

    for i in 1..points.len() {
        if contains(center, radius, &points[i]) {
            continue;
        }
        center = points[i];
        radius = 0.0;

        for j in 0..i {
            if contains(center, radius, &points[j]) {
                continue;
            }
            center = points[i].midpoint(&points[j]);
            radius = points[i].distance_to(&points[j]) / 2.0;

            for k in 0..j {
                if contains(center, radius, &points[k]) {
                    continue;
                }
                (center, radius) = circle_through(&points[i], &points[j], &points[k]);
            }
        }
    }

    (center, radius)
}

fn contains(center: Point2D, radius: f64, point: &Point2D) -> bool {
    center.distance_to(point) <= radius * (1.0 + 1e-9) + 1e-9
}

/// Circle through three points; collinear triples fall back to the
/// circle spanning the farthest pair
fn circle_through(a: &Point2D, b: &Point2D, c: &Point2D) -> (Point2D, f64) {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        let pairs = [(a, b), (a, c), (b, c)];
        let (p, q) = pairs
            .into_iter()
            .max_by(|x, y| x.0.distance_to(x.1).total_cmp(&y.0.distance_to(y.1)))
            .unwrap_or((a, b));
        return (p.midpoint(q), p.distance_to(q) / 2.0);
    }

    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point2D::new(ux, uy);
    (center, center.distance_to(a))
}
