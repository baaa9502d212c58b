// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Snapdoc.

use thiserror::Error;

/// Top-level error type for the snap pipeline.
///
/// There are exactly two recognised failure kinds, both terminal. Every
/// other internal step (resize, colour conversion, edge detection, corner
/// refinement, homography solve, resampling, thresholding) is well-defined
/// for valid geometric inputs and defines no error of its own. A degenerate
/// homography (zero-area quadrilateral) is reported as
/// [`DocumentNotFound`](Self::DocumentNotFound) rather than a distinct kind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapError {
    /// The supplied image buffer has zero area. Detected at entry; the
    /// pipeline performs no work.
    #[error("input image is empty")]
    EmptyInput,

    /// No 4-vertex convex contour was found among the candidates. This is an
    /// expected, common outcome for unsuitable photos (cluttered background,
    /// no document in frame), not a programming error.
    #[error("no document contour found")]
    DocumentNotFound,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SnapError>;
