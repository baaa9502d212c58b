// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering and sub-pixel refinement — canonicalise the detected
// quadrilateral to TL/TR/BR/BL and nudge each corner onto the true corner
// feature in the full-resolution image.

use image::GrayImage;
use imageproc::point::Point;
use snapdoc_core::SnapConfig;

use crate::logger::SnapLogger;

/// A quadrilateral in canonical order: top-left, top-right, bottom-right,
/// bottom-left. Coordinates are full-resolution pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub tl: (f32, f32),
    pub tr: (f32, f32),
    pub br: (f32, f32),
    pub bl: (f32, f32),
}

impl Quad {
    /// Corners in canonical order.
    pub fn corners(&self) -> [(f32, f32); 4] {
        [self.tl, self.tr, self.br, self.bl]
    }
}

/// Order four unordered points into the canonical TL/TR/BR/BL sequence.
///
/// The two smallest-x points form the left pair and the two largest-x the
/// right pair; within each pair the smaller y is the upper point. This
/// x-split is a heuristic: it misassigns corners once the document is
/// rotated far enough (around 45 degrees) that raw x no longer separates
/// the left and right edges. Moderate camera angles stay well inside the
/// valid regime.
pub fn order_corners(points: [Point<i32>; 4]) -> Quad {
    let mut pts = points;
    // Secondary y key makes exact x-ties deterministic for any input
    // permutation; pair membership is decided by x alone.
    pts.sort_by_key(|p| (p.x, p.y));

    let mut left = [pts[0], pts[1]];
    let mut right = [pts[2], pts[3]];
    left.sort_by_key(|p| p.y);
    right.sort_by_key(|p| p.y);

    Quad {
        tl: (left[0].x as f32, left[0].y as f32),
        tr: (right[0].x as f32, right[0].y as f32),
        br: (right[1].x as f32, right[1].y as f32),
        bl: (left[1].x as f32, left[1].y as f32),
    }
}

/// Refine each corner of the quadrilateral to sub-pixel accuracy against
/// the full-resolution grayscale image.
///
/// Uses the classic iterative gradient scheme: within a search window
/// around the current estimate, every sample contributes the constraint
/// that the image gradient there is orthogonal to its offset from the true
/// corner. Solving the weighted normal equations gives the next estimate.
/// Iteration stops after `refine_max_iterations` rounds or once the
/// estimate moves less than `refine_epsilon`. This corrects the
/// quantisation introduced by the downsample/rescale round trip.
pub fn refine_corners(
    gray: &GrayImage,
    quad: Quad,
    config: &SnapConfig,
    logger: &dyn SnapLogger,
) -> Quad {
    let refined = Quad {
        tl: refine_one(gray, quad.tl, config),
        tr: refine_one(gray, quad.tr, config),
        br: refine_one(gray, quad.br, config),
        bl: refine_one(gray, quad.bl, config),
    };
    logger.debug(&format!(
        "corners: ordered TL={:?} TR={:?} BR={:?} BL={:?}",
        refined.tl, refined.tr, refined.br, refined.bl
    ));
    refined
}

fn refine_one(gray: &GrayImage, start: (f32, f32), config: &SnapConfig) -> (f32, f32) {
    let win = config.refine_window as i32;
    let sigma = f64::from(config.refine_window) / 2.0;
    let (sx, sy) = (f64::from(start.0), f64::from(start.1));
    let (mut cx, mut cy) = (sx, sy);

    for _ in 0..config.refine_max_iterations {
        let mut gxx_sum = 0.0f64;
        let mut gxy_sum = 0.0f64;
        let mut gyy_sum = 0.0f64;
        let mut rhs_x = 0.0f64;
        let mut rhs_y = 0.0f64;

        for dy in -win..=win {
            for dx in -win..=win {
                let px = cx + f64::from(dx);
                let py = cy + f64::from(dy);

                let gx = (sample(gray, px + 1.0, py) - sample(gray, px - 1.0, py)) / 2.0;
                let gy = (sample(gray, px, py + 1.0) - sample(gray, px, py - 1.0)) / 2.0;
                let weight =
                    (-f64::from(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();

                let gxx = weight * gx * gx;
                let gxy = weight * gx * gy;
                let gyy = weight * gy * gy;
                gxx_sum += gxx;
                gxy_sum += gxy;
                gyy_sum += gyy;
                rhs_x += gxx * px + gxy * py;
                rhs_y += gxy * px + gyy * py;
            }
        }

        let det = gxx_sum * gyy_sum - gxy_sum * gxy_sum;
        if det.abs() < 1e-9 {
            // Flat or single-edge window; nothing to refine against.
            break;
        }

        let nx = (gyy_sum * rhs_x - gxy_sum * rhs_y) / det;
        let ny = (gxx_sum * rhs_y - gxy_sum * rhs_x) / det;
        let shift = ((nx - cx).powi(2) + (ny - cy).powi(2)).sqrt();
        cx = nx;
        cy = ny;
        if shift < config.refine_epsilon {
            break;
        }
    }

    // A drift beyond the search window means the solve latched onto some
    // other feature; keep the unrefined corner in that case.
    if (cx - sx).abs() > f64::from(win) || (cy - sy).abs() > f64::from(win) {
        return start;
    }

    let max_x = f64::from(gray.width().saturating_sub(1));
    let max_y = f64::from(gray.height().saturating_sub(1));
    (cx.clamp(0.0, max_x) as f32, cy.clamp(0.0, max_y) as f32)
}

/// Bilinear sample with clamped coordinates.
fn sample(gray: &GrayImage, x: f64, y: f64) -> f64 {
    let max_x = gray.width() as i64 - 1;
    let max_y = gray.height() as i64 - 1;

    let x0 = (x.floor() as i64).clamp(0, max_x);
    let y0 = (y.floor() as i64).clamp(0, max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = (x - x.floor()).clamp(0.0, 1.0);
    let fy = (y - y.floor()).clamp(0.0, 1.0);

    let at = |px: i64, py: i64| f64::from(gray.get_pixel(px as u32, py as u32).0[0]);

    let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
    let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
    top * (1.0 - fy) + bottom * fy
}
