// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tunable parameters of the snap pipeline.
///
/// The defaults reproduce the canonical behaviour; every stage reads its
/// constants from here so callers can tune detection without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Fixed working width the input is downsampled to before detection.
    pub working_width: u32,
    /// Sigma of the Gaussian blur applied before edge detection
    /// (1.1 is the sigma a 5x5 kernel implies).
    pub blur_sigma: f32,
    /// Lower hysteresis threshold of the Canny edge detector.
    pub canny_low: f32,
    /// Upper hysteresis threshold of the Canny edge detector.
    pub canny_high: f32,
    /// Polygon approximation tolerance as a fraction of the contour
    /// perimeter. Scales with contour size so large and small candidates
    /// are approximated consistently.
    pub approx_epsilon_frac: f64,
    /// Half-size of the corner refinement search window (5 gives an
    /// 11x11 sample window).
    pub refine_window: u32,
    /// Maximum number of corner refinement iterations.
    pub refine_max_iterations: u32,
    /// Refinement stops once a corner moves less than this distance.
    pub refine_epsilon: f64,
    /// Neighbourhood side length (odd) for adaptive mean thresholding in
    /// scan mode.
    pub threshold_block_size: u32,
    /// Constant subtracted from the local mean when thresholding.
    pub threshold_offset: i32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            working_width: 600,
            blur_sigma: 1.1,
            canny_low: 75.0,
            canny_high: 200.0,
            approx_epsilon_frac: 0.02,
            refine_window: 5,
            refine_max_iterations: 30,
            refine_epsilon: 0.1,
            threshold_block_size: 15,
            threshold_offset: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_constants() {
        let cfg = SnapConfig::default();
        assert_eq!(cfg.working_width, 600);
        assert_eq!(cfg.canny_low, 75.0);
        assert_eq!(cfg.canny_high, 200.0);
        assert!((cfg.approx_epsilon_frac - 0.02).abs() < f64::EPSILON);
        assert_eq!(cfg.threshold_block_size, 15);
        assert_eq!(cfg.threshold_offset, 10);
    }
}
