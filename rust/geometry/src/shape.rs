// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape records extracted from floor-plan sketches
//!
//! Coordinates are in image pixel space: origin at the top-left corner,
//! y pointing down. The mesh stage keeps the same frame and adds z upwards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned footprint of a wall, door or window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Bounding box of a line segment.
    ///
    /// A perfectly horizontal or vertical segment has a zero extent on one
    /// axis; that extent is replaced by `min_thickness` so the footprint
    /// never collapses.
    pub fn from_segment(x1: f64, y1: f64, x2: f64, y2: f64, min_thickness: f64) -> Self {
        let width = (x2 - x1).abs();
        let height = (y2 - y1).abs();
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: if width > 0.0 { width } else { min_thickness },
            height: if height > 0.0 { height } else { min_thickness },
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidShape(format!("non-finite rectangle {:?}", self)));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidShape(format!(
                "rectangle must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Circular fixture footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Disk {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self { cx, cy, r }
    }

    fn validate(&self) -> Result<()> {
        if !(self.cx.is_finite() && self.cy.is_finite() && self.r.is_finite()) {
            return Err(Error::InvalidShape(format!("non-finite disk {:?}", self)));
        }
        if self.r <= 0.0 {
            return Err(Error::InvalidShape(format!(
                "disk radius must be positive, got {}",
                self.r
            )));
        }
        Ok(())
    }
}

/// Shape kind, without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Wall,
    Door,
    Window,
    Circle,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Wall => "wall",
            ShapeKind::Door => "door",
            ShapeKind::Window => "window",
            ShapeKind::Circle => "circle",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled 2D primitive detected in a floor plan
///
/// Serialized with an inline `type` tag, e.g.
/// `{"type":"wall","x":10,"y":20,"width":100,"height":10}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Wall(Rect),
    Door(Rect),
    Window(Rect),
    Circle(Disk),
}

impl Shape {
    pub fn wall(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let rect = Rect::new(x, y, width, height);
        rect.validate()?;
        Ok(Shape::Wall(rect))
    }

    pub fn door(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let rect = Rect::new(x, y, width, height);
        rect.validate()?;
        Ok(Shape::Door(rect))
    }

    pub fn window(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        let rect = Rect::new(x, y, width, height);
        rect.validate()?;
        Ok(Shape::Window(rect))
    }

    pub fn circle(cx: f64, cy: f64, r: f64) -> Result<Self> {
        let disk = Disk::new(cx, cy, r);
        disk.validate()?;
        Ok(Shape::Circle(disk))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Wall(_) => ShapeKind::Wall,
            Shape::Door(_) => ShapeKind::Door,
            Shape::Window(_) => ShapeKind::Window,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    /// Footprint rectangle for box-extruded kinds
    pub fn rect(&self) -> Option<&Rect> {
        match self {
            Shape::Wall(rect) | Shape::Door(rect) | Shape::Window(rect) => Some(rect),
            Shape::Circle(_) => None,
        }
    }

    /// Check the positive-size invariant
    ///
    /// Variants can be built directly (e.g. when deserialized from a
    /// request body), so consumers re-check before extruding.
    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Wall(rect) | Shape::Door(rect) | Shape::Window(rect) => rect.validate(),
            Shape::Circle(disk) => disk.validate(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Per-kind counts, used in logs and CLI summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShapeCounts {
    pub walls: usize,
    pub doors: usize,
    pub windows: usize,
    pub circles: usize,
}

impl ShapeCounts {
    pub fn of(shapes: &[Shape]) -> Self {
        shapes.iter().fold(Self::default(), |mut counts, shape| {
            match shape.kind() {
                ShapeKind::Wall => counts.walls += 1,
                ShapeKind::Door => counts.doors += 1,
                ShapeKind::Window => counts.windows += 1,
                ShapeKind::Circle => counts.circles += 1,
            }
            counts
        })
    }

    pub fn boxes(&self) -> usize {
        self.walls + self.doors + self.windows
    }

    pub fn total(&self) -> usize {
        self.boxes() + self.circles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segment_horizontal_gets_min_thickness() {
        let rect = Rect::from_segment(120.0, 40.0, 20.0, 40.0, 5.0);
        assert_eq!(rect, Rect::new(20.0, 40.0, 100.0, 5.0));
    }

    #[test]
    fn test_from_segment_vertical_gets_min_thickness() {
        let rect = Rect::from_segment(7.0, 90.0, 7.0, 10.0, 5.0);
        assert_eq!(rect, Rect::new(7.0, 10.0, 5.0, 80.0));
    }

    #[test]
    fn test_from_segment_diagonal() {
        let rect = Rect::from_segment(10.0, 50.0, 40.0, 10.0, 5.0);
        assert_eq!(rect, Rect::new(10.0, 10.0, 30.0, 40.0));
    }

    #[test]
    fn test_constructors_reject_degenerate_sizes() {
        assert!(Shape::wall(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(Shape::door(0.0, 0.0, 10.0, -1.0).is_err());
        assert!(Shape::window(f64::NAN, 0.0, 10.0, 10.0).is_err());
        assert!(Shape::circle(5.0, 5.0, 0.0).is_err());
        assert!(Shape::circle(5.0, 5.0, 2.0).is_ok());
    }

    #[test]
    fn test_json_uses_inline_type_tag() {
        let wall = Shape::wall(10.0, 20.0, 100.0, 10.0).unwrap();
        let json = serde_json::to_value(wall).unwrap();
        assert_eq!(json["type"], "wall");
        assert_eq!(json["width"], 100.0);

        let parsed: Shape =
            serde_json::from_str(r#"{"type":"circle","cx":4,"cy":5,"r":3}"#).unwrap();
        assert_eq!(parsed, Shape::Circle(Disk::new(4.0, 5.0, 3.0)));
    }

    #[test]
    fn test_validate_catches_deserialized_zero_size() {
        let parsed: Shape =
            serde_json::from_str(r#"{"type":"door","x":1,"y":1,"width":0,"height":4}"#).unwrap();
        assert!(!parsed.is_valid());
    }

    #[test]
    fn test_counts() {
        let shapes = vec![
            Shape::wall(0.0, 0.0, 10.0, 5.0).unwrap(),
            Shape::wall(0.0, 0.0, 5.0, 10.0).unwrap(),
            Shape::door(0.0, 0.0, 4.0, 10.0).unwrap(),
            Shape::circle(3.0, 3.0, 3.0).unwrap(),
        ];
        let counts = ShapeCounts::of(&shapes);
        assert_eq!(counts.walls, 2);
        assert_eq!(counts.doors, 1);
        assert_eq!(counts.windows, 0);
        assert_eq!(counts.boxes(), 3);
        assert_eq!(counts.total(), 4);
    }
}
