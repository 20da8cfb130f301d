// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image loading and preprocessing operations

use crate::error::{Error, Result};
use crate::types::DetectionConfig;
use image::{DynamicImage, GrayImage, ImageReader, Luma};
use imageproc::distance_transform::Norm;
use std::path::Path;

/// Open and decode an image file
///
/// The format is sniffed from the content, so a mislabeled extension still
/// decodes. A missing path is reported before any I/O is attempted.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Decode an in-memory encoded image
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Convert any supported raster to 8-bit luminance (ITU-R BT.601 weights)
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    let rgba = image.to_rgba8();
    let mut gray = GrayImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        gray.put_pixel(x, y, Luma([luma.round().min(255.0) as u8]));
    }

    gray
}

/// Sigma for a Gaussian kernel of the given size, derived the way
/// OpenCV does when sigma is left at zero
pub fn gaussian_sigma(kernel_size: u32) -> f32 {
    let k = kernel_size.max(1) as f32;
    (0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8).max(0.1)
}

/// Apply Gaussian blur for noise reduction
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Luminance conversion followed by Gaussian smoothing
///
/// Output has the same dimensions as the input.
pub fn preprocess(image: &DynamicImage, config: &DetectionConfig) -> GrayImage {
    let gray = to_grayscale(image);
    gaussian_blur(&gray, gaussian_sigma(config.blur_kernel_size))
}

/// Apply Canny edge detection (3x3 Sobel gradients)
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Morphological closing with a 3x3 square element repeated `iterations` times
///
/// Repeating a 3x3 dilation n times equals one dilation with a
/// (2n+1)x(2n+1) square, which is the L-infinity ball of radius n.
pub fn morphological_close(image: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return image.clone();
    }
    imageproc::morphology::close(image, Norm::LInf, iterations)
}

/// Morphological opening with a 3x3 square element repeated `iterations` times
pub fn morphological_open(image: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return image.clone();
    }
    imageproc::morphology::open(image, Norm::LInf, iterations)
}

/// Inverse binary threshold: pixels brighter than `level` become black,
/// everything else white
pub fn threshold_binary_inv(image: &GrayImage, level: u8) -> GrayImage {
    let mut result = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if pixel.0[0] > level { 0 } else { 255 };
        result.put_pixel(x, y, Luma([value]));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_threshold_binary_inv() {
        let mut img = GrayImage::new(10, 10);
        for x in 0..10 {
            for y in 0..10 {
                let value = if x < 5 { 100 } else { 230 };
                img.put_pixel(x, y, Luma([value]));
            }
        }

        let result = threshold_binary_inv(&img, 200);

        assert_eq!(result.get_pixel(0, 0).0[0], 255);
        assert_eq!(result.get_pixel(9, 0).0[0], 0);
    }

    #[test]
    fn test_threshold_level_is_exclusive() {
        let img = GrayImage::from_pixel(1, 1, Luma([200]));
        assert_eq!(threshold_binary_inv(&img, 200).get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_to_grayscale() {
        let mut rgb = RgbImage::new(3, 1);
        rgb.put_pixel(0, 0, Rgb([255, 255, 255]));
        rgb.put_pixel(1, 0, Rgb([0, 0, 0]));
        rgb.put_pixel(2, 0, Rgb([255, 0, 0]));

        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));

        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
        assert_eq!(gray.get_pixel(2, 0).0[0], 76);
    }

    #[test]
    fn test_gaussian_sigma_matches_auto_rule() {
        assert!((gaussian_sigma(5) - 1.1).abs() < 1e-6);
        assert!((gaussian_sigma(3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_preprocess_keeps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(37, 21, Rgb([200, 10, 10])));
        let out = preprocess(&img, &DetectionConfig::default());
        assert_eq!(out.dimensions(), (37, 21));
    }

    #[test]
    fn test_opening_removes_speck() {
        let mut img = GrayImage::new(20, 20);
        img.put_pixel(10, 10, Luma([255]));
        let opened = morphological_open(&img, 2);
        assert!(opened.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_image(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_image(b"not an image at all").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
