// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing stage — downsample to the working width, convert to
// grayscale, blur, and extract a binary edge map.

use image::{DynamicImage, GrayImage, imageops::FilterType};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use snapdoc_core::SnapConfig;

use crate::logger::SnapLogger;

/// Edge map at working resolution plus the factor relating working
/// coordinates back to the original image.
pub struct Preprocessed {
    /// Binary Canny edge map (255 = edge, 0 = background).
    pub edges: GrayImage,
    /// `original_width / working_width`; multiply working-resolution
    /// coordinates by this to get full-resolution coordinates.
    pub ratio: f64,
}

/// Run the preprocessing stage on a non-empty input image.
///
/// Detection runs at a fixed working width so thresholds behave the same
/// regardless of input resolution. The downsample uses a triangle filter,
/// which area-averages the source footprint and avoids aliasing.
pub fn preprocess(image: &DynamicImage, config: &SnapConfig, logger: &dyn SnapLogger) -> Preprocessed {
    let ratio = f64::from(image.width()) / f64::from(config.working_width);
    // Extreme aspect ratios could truncate to zero rows; keep the working
    // image at least one pixel tall.
    let working_height = ((f64::from(image.height()) / ratio) as u32).max(1);

    let resized = image.resize_exact(config.working_width, working_height, FilterType::Triangle);
    logger.debug(&format!(
        "preprocess: resized {}x{} -> {}x{} (ratio={ratio:.4})",
        image.width(),
        image.height(),
        resized.width(),
        resized.height(),
    ));

    let gray = resized.to_luma8();
    let blurred = gaussian_blur_f32(&gray, config.blur_sigma);
    let edges = canny(&blurred, config.canny_low, config.canny_high);
    logger.trace(&format!(
        "preprocess: canny complete (low={}, high={})",
        config.canny_low, config.canny_high
    ));

    Preprocessed { edges, ratio }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use image::{Rgb, RgbImage};

    #[test]
    fn resizes_to_working_width_and_reports_ratio() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1200, 900, Rgb([200, 200, 200])));
        let pre = preprocess(&img, &SnapConfig::default(), &NullLogger);

        assert_eq!(pre.edges.width(), 600);
        assert_eq!(pre.edges.height(), 450);
        assert!((pre.ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn upsamples_narrow_input() {
        // Inputs narrower than the working width are scaled up, matching the
        // fixed-width contract.
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([90, 90, 90])));
        let pre = preprocess(&img, &SnapConfig::default(), &NullLogger);

        assert_eq!(pre.edges.width(), 600);
        assert_eq!(pre.edges.height(), 600);
        assert!((pre.ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn uniform_image_yields_no_edges() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(800, 600, Rgb([128, 128, 128])));
        let pre = preprocess(&img, &SnapConfig::default(), &NullLogger);

        assert!(pre.edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn high_contrast_rectangle_yields_edges() {
        let mut img = RgbImage::from_pixel(800, 600, Rgb([255, 255, 255]));
        for y in 150..450 {
            for x in 200..600 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        let pre = preprocess(&DynamicImage::ImageRgb8(img), &SnapConfig::default(), &NullLogger);

        let edge_pixels = pre.edges.pixels().filter(|p| p.0[0] == 255).count();
        assert!(edge_pixels > 100, "expected edge response, got {edge_pixels} pixels");
    }
}
