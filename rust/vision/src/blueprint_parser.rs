// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch-to-shapes orchestration

use crate::contour_classifier::classify_contours;
use crate::error::Result;
use crate::image_ops::{load_image, preprocess};
use crate::preview::{render_preview, save_best_effort};
use crate::types::{DetectionConfig, LineSegment};
use crate::wall_detector::detect_walls;
use image::{DynamicImage, RgbImage};
use planforge_geometry::{Shape, ShapeCounts};
use std::path::Path;

/// Everything one detection pass produces
#[derive(Debug, Clone)]
pub struct Detection {
    /// Walls in line order, then doors/windows/circles in contour order
    pub shapes: Vec<Shape>,
    /// Hough segments behind each wall, index-aligned with the wall shapes
    pub wall_segments: Vec<LineSegment>,
    pub preview: RgbImage,
}

impl Detection {
    pub fn counts(&self) -> ShapeCounts {
        ShapeCounts::of(&self.shapes)
    }
}

/// Floor-plan sketch parser
#[derive(Debug, Clone, Default)]
pub struct BlueprintParser {
    config: DetectionConfig,
}

impl BlueprintParser {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run both detectors on a decoded image
    ///
    /// Never fails: a sketch with nothing recognisable yields an empty
    /// shape list and an untouched preview.
    pub fn detect(&self, image: &DynamicImage) -> Detection {
        let blurred = preprocess(image, &self.config);

        let walls = detect_walls(&blurred, &self.config);
        let contour_shapes = classify_contours(&blurred, &self.config);

        let mut wall_segments = Vec::with_capacity(walls.len());
        let mut shapes = Vec::with_capacity(walls.len() + contour_shapes.len());
        for (segment, wall) in walls {
            wall_segments.push(segment);
            shapes.push(wall);
        }
        shapes.extend(contour_shapes);

        let preview = render_preview(&image.to_rgb8(), &wall_segments, &shapes);

        Detection {
            shapes,
            wall_segments,
            preview,
        }
    }

    /// Load, detect, and persist the preview
    ///
    /// # Errors
    /// `NotFound` when the path is missing, `Decode` when it is not a
    /// readable raster. A failed preview write is only logged.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<Shape>> {
        let path = path.as_ref();
        let image = load_image(path)?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "parsing blueprint"
        );

        let detection = self.detect(&image);

        if let Some(preview_path) = &self.config.preview_path {
            save_best_effort(&detection.preview, preview_path);
        }

        let counts = detection.counts();
        tracing::info!(
            walls = counts.walls,
            doors = counts.doors,
            windows = counts.windows,
            circles = counts.circles,
            "blueprint parsed"
        );

        Ok(detection.shapes)
    }
}

/// Parse a sketch with the default detection settings
pub fn parse_blueprint(path: impl AsRef<Path>) -> Result<Vec<Shape>> {
    BlueprintParser::default().parse_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{Luma, Rgb};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect as PixelRect;
    use planforge_geometry::ShapeKind;

    fn quiet_parser() -> BlueprintParser {
        BlueprintParser::new(DetectionConfig {
            preview_path: None,
            ..Default::default()
        })
    }

    #[test]
    fn test_walls_precede_contour_shapes() {
        let mut img = image::GrayImage::from_pixel(240, 160, Luma([255]));
        for x in 20..220 {
            img.put_pixel(x, 20, Luma([0]));
            img.put_pixel(x, 21, Luma([0]));
        }
        draw_filled_rect_mut(&mut img, PixelRect::at(60, 70).of_size(20, 50), Luma([0]));

        let detection = quiet_parser().detect(&DynamicImage::ImageLuma8(img));

        let kinds: Vec<ShapeKind> = detection.shapes.iter().map(|s| s.kind()).collect();
        let first_non_wall = kinds.iter().position(|k| *k != ShapeKind::Wall);
        if let Some(idx) = first_non_wall {
            assert!(kinds[idx..].iter().all(|k| *k != ShapeKind::Wall));
        }
        assert_eq!(detection.counts().walls, detection.wall_segments.len());
        assert!(detection.counts().walls > 0);
        assert!(kinds.contains(&ShapeKind::Door));
    }

    #[test]
    fn test_blank_detection() {
        let source = image::RgbImage::from_pixel(50, 40, Rgb([255, 255, 255]));
        let detection = quiet_parser().detect(&DynamicImage::ImageRgb8(source.clone()));
        assert!(detection.shapes.is_empty());
        assert_eq!(detection.preview, source);
    }

    #[test]
    fn test_missing_file() {
        let err = quiet_parser().parse_file("no/such/sketch.png").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
