// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification stage — derive the target rectangle from the
// ordered corners, warp the full-resolution image through the projective
// mapping, and optionally binarize for a scanned look.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use snapdoc_core::{Result, SnapError};

use crate::corners::Quad;
use crate::logger::SnapLogger;

/// Warp the source image so the quadrilateral fills an axis-aligned
/// rectangle.
///
/// The target width is the larger of the two horizontal edge lengths and
/// the height the larger of the two vertical ones, so a trapezoidal
/// (foreshortened) document is never cropped along its longer edge. The
/// mapping is a full homography; a degenerate one (zero-area
/// quadrilateral) is reported as [`SnapError::DocumentNotFound`].
pub fn rectify(image: &DynamicImage, quad: &Quad, logger: &dyn SnapLogger) -> Result<RgbImage> {
    let (max_width, max_height) = target_dimensions(quad);
    logger.debug(&format!(
        "rectify: target dimensions {max_width:.1}x{max_height:.1}"
    ));

    let out_w = max_width as u32;
    let out_h = max_height as u32;
    if out_w == 0 || out_h == 0 {
        logger.warn("rectify: quadrilateral has no span");
        return Err(SnapError::DocumentNotFound);
    }

    let src = quad.corners();
    let dst: [(f32, f32); 4] = [
        (0.0, 0.0),
        (max_width as f32 - 1.0, 0.0),
        (max_width as f32 - 1.0, max_height as f32 - 1.0),
        (0.0, max_height as f32 - 1.0),
    ];

    let projection = Projection::from_control_points(src, dst).ok_or_else(|| {
        logger.warn("rectify: degenerate projective mapping");
        SnapError::DocumentNotFound
    })?;

    let rgb = image.to_rgb8();
    let mut warped = RgbImage::new(out_w, out_h);
    warp_into(
        &rgb,
        &projection,
        Interpolation::Bilinear,
        Rgb([255, 255, 255]),
        &mut warped,
    );
    logger.debug(&format!("rectify: warped to {out_w}x{out_h}"));

    Ok(warped)
}

/// Max-of-edge-lengths target rectangle, before integer truncation.
fn target_dimensions(quad: &Quad) -> (f64, f64) {
    let width_bottom = distance(quad.br, quad.bl);
    let width_top = distance(quad.tr, quad.tl);
    let height_right = distance(quad.tr, quad.br);
    let height_left = distance(quad.tl, quad.bl);
    (
        width_bottom.max(width_top),
        height_right.max(height_left),
    )
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f64 {
    (f64::from(a.0 - b.0).powi(2) + f64::from(a.1 - b.1).powi(2)).sqrt()
}

/// Adaptive mean thresholding for the scanned black/white look.
///
/// For each pixel the threshold is the mean intensity of the surrounding
/// `block_size` x `block_size` neighbourhood (clamped at the borders)
/// minus `offset`; pixels above it become white, all others black. Uses a
/// summed-area table so the cost is independent of the block size.
pub fn binarize_adaptive_mean(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let radius = block_size / 2;
    let integral = integral_image(gray);
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let local_mean = region_mean(&integral, width, height, x, y, radius);
            let threshold = local_mean - f64::from(offset);
            let value = if f64::from(gray.get_pixel(x, y).0[0]) > threshold {
                255u8
            } else {
                0u8
            };
            output.put_pixel(x, y, Luma([value]));
        }
    }

    output
}

/// Summed-area table with a zero-padded border. Entry `(x, y)` holds the
/// sum over the rectangle [0, x) x [0, y).
fn integral_image(gray: &GrayImage) -> Vec<u64> {
    let (w, h) = gray.dimensions();
    let stride = (w + 1) as usize;
    let mut table = vec![0u64; stride * (h + 1) as usize];

    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += u64::from(gray.get_pixel(x, y).0[0]);
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            let above = y as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[above];
        }
    }

    table
}

/// Mean pixel value of the square region centred on `(cx, cy)`, clamped to
/// the image bounds.
fn region_mean(integral: &[u64], width: u32, height: u32, cx: u32, cy: u32, radius: u32) -> f64 {
    let stride = (width + 1) as usize;

    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let x2 = ((cx + radius + 1) as usize).min(width as usize);
    let y2 = ((cy + radius + 1) as usize).min(height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;

    let sum = integral[y2 * stride + x2] as f64 - integral[y1 * stride + x2] as f64
        - integral[y2 * stride + x1] as f64
        + integral[y1 * stride + x1] as f64;

    sum / area
}
