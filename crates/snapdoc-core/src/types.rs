// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Snapdoc.

use serde::{Deserialize, Serialize};

/// What the pipeline should return on success.
///
/// The mode only selects the final conversion step; detection behaves
/// identically in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Perspective-corrected image with the original colours preserved.
    Color,
    /// Binarized black/white rendering mimicking a flatbed scanner.
    Scan,
}
