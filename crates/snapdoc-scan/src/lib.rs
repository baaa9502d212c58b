// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// snapdoc-scan — Document detection and perspective rectification.
//
// Locates a planar, roughly rectangular document in a photographed scene
// and produces a geometrically corrected, top-down rendering, optionally
// binarized into a flatbed-scanner look. The pipeline is four strictly
// sequential stages (preprocess, contour selection, corner
// ordering/refinement, rectification) with two early exits: empty input
// and no document found.

pub mod contour;
pub mod corners;
pub mod logger;
pub mod preprocess;
pub mod rectify;
pub mod snapper;

// Re-export the primary surface so callers can use `snapdoc_scan::DocSnapper` etc.
pub use corners::Quad;
pub use logger::{CapturingLogger, LogLevel, NullLogger, SnapLogger, TracingLogger};
pub use snapper::{DocSnapper, snap_document};

// Shared core types, re-exported for convenience.
pub use snapdoc_core::{OutputMode, Result, SnapConfig, SnapError};
