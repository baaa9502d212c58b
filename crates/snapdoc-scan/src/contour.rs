// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour selection stage — find closed contours in the edge map, keep
// 4-vertex convex approximations, and pick the largest by enclosed area.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use snapdoc_core::{Result, SnapError};

use crate::logger::SnapLogger;

/// Find the best document quadrilateral in the edge map and rescale its
/// corners back to full-resolution pixel coordinates.
///
/// Candidates are polygon approximations of every closed contour, with a
/// tolerance of `epsilon_frac` of the contour perimeter so large and small
/// candidates are simplified consistently. Only 4-vertex convex
/// approximations qualify; among those the largest unsigned area wins, and
/// ties keep the first-found candidate (area must strictly exceed the
/// running maximum to replace it).
///
/// Returns [`SnapError::DocumentNotFound`] when no candidate qualifies —
/// the normal outcome for photos without a clear document.
pub fn find_document_quad(
    edges: &GrayImage,
    ratio: f64,
    epsilon_frac: f64,
    logger: &dyn SnapLogger,
) -> Result<[Point<i32>; 4]> {
    let contours = find_contours::<i32>(edges);
    logger.debug(&format!("contour: {} contours extracted", contours.len()));

    let mut best: Option<[Point<i32>; 4]> = None;
    let mut max_area = 0.0f64;

    for contour in &contours {
        if contour.points.len() < 4 {
            continue;
        }
        // Border following yields full pixel chains; reduce each run of
        // collinear steps to its endpoints before measuring.
        let compressed = compress_collinear(&contour.points);
        if compressed.len() < 4 {
            continue;
        }

        let perimeter = arc_length(&compressed, true);
        let approx = approximate_closed_polygon(&compressed, epsilon_frac * perimeter);

        if approx.len() != 4 || !is_convex(&approx) {
            continue;
        }

        let area = polygon_area(&approx);
        if area > max_area {
            max_area = area;
            let quad = [approx[0], approx[1], approx[2], approx[3]];
            logger.debug(&format!(
                "contour: new max candidate area={max_area:.1} pts={:?}",
                quad.map(|p| (p.x, p.y))
            ));
            best = Some(quad);
        }
    }

    let quad = best.ok_or_else(|| {
        logger.warn("contour: no document contour found");
        SnapError::DocumentNotFound
    })?;

    // Back to original resolution; truncation matches the working-to-full
    // coordinate contract (sub-pixel correction happens in refinement).
    let scaled = quad.map(|p| {
        Point::new(
            (f64::from(p.x) * ratio) as i32,
            (f64::from(p.y) * ratio) as i32,
        )
    });
    logger.debug(&format!(
        "contour: selected quad at full resolution {:?}",
        scaled.map(|p| (p.x, p.y))
    ));

    Ok(scaled)
}

/// Douglas-Peucker simplification of a closed chain, independent of where
/// border following happened to start it.
///
/// Running the closed-curve mode of `approximate_polygon_dp` directly
/// anchors the split on `points[0]`; when the chain starts exactly on a
/// polygon vertex (an axis-aligned rectangle always does) the baseline is
/// a polygon edge and one corner gets simplified away. Instead, split the
/// chain at its two mutually farthest vertices and simplify each arc as an
/// open curve — both arc endpoints are always kept, so every extreme
/// vertex survives regardless of the chain's starting point.
pub(crate) fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut split = (0usize, 0usize);
    let mut max_dist = -1i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = i64::from(points[i].x - points[j].x);
            let dy = i64::from(points[i].y - points[j].y);
            let dist = dx * dx + dy * dy;
            if dist > max_dist {
                max_dist = dist;
                split = (i, j);
            }
        }
    }
    if max_dist == 0 {
        // Degenerate chain of identical points.
        return vec![points[0]];
    }

    let (i0, i1) = split;
    let first_arc: Vec<Point<i32>> = points[i0..=i1].to_vec();
    let second_arc: Vec<Point<i32>> = points[i1..]
        .iter()
        .chain(points[..=i0].iter())
        .copied()
        .collect();

    let mut out = approximate_polygon_dp(&first_arc, epsilon, false);
    // Both arcs retain their endpoints; skip the shared anchors when
    // stitching the ring back together.
    out.extend(
        approximate_polygon_dp(&second_arc, epsilon, false)
            .into_iter()
            .skip(1),
    );
    out.pop();
    out
}

/// Drop interior points of straight runs, keeping segment endpoints only.
///
/// The perimeter is unchanged: removing a collinear midpoint never alters
/// the summed segment lengths.
pub(crate) fn compress_collinear(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];

        let cross = i64::from(cur.x - prev.x) * i64::from(next.y - cur.y)
            - i64::from(cur.y - prev.y) * i64::from(next.x - cur.x);
        if cross != 0 {
            out.push(cur);
        }
    }

    // A perfectly straight chain compresses to nothing; keep the original
    // rather than hand an empty polygon downstream.
    if out.is_empty() { points.to_vec() } else { out }
}

/// Convexity test by cross-product sign consistency over consecutive edges.
///
/// Collinear triples (zero cross product) do not count as reflex; a sign
/// flip does.
pub(crate) fn is_convex(polygon: &[Point<i32>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0i64;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];

        let cross = i64::from(b.x - a.x) * i64::from(c.y - b.y)
            - i64::from(b.y - a.y) * i64::from(c.x - b.x);
        if cross == 0 {
            continue;
        }
        if sign == 0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Unsigned enclosed area by the shoelace formula. Orientation-independent:
/// either winding direction yields the same value.
pub(crate) fn polygon_area(polygon: &[Point<i32>]) -> f64 {
    let n = polygon.len();
    let mut twice_area = 0i64;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        twice_area += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    (twice_area.abs() as f64) / 2.0
}
