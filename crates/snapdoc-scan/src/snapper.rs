// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestration — the strict linear sequence
// preprocess -> select -> order/refine -> rectify, with its two early exits.

use image::DynamicImage;
use snapdoc_core::{OutputMode, Result, SnapConfig, SnapError};
use tracing::instrument;

use crate::contour;
use crate::corners;
use crate::logger::{SnapLogger, TracingLogger};
use crate::preprocess;
use crate::rectify;

/// Document snap pipeline.
///
/// One invocation processes exactly one image end to end; the snapper
/// holds no mutable state, so a single instance may be shared across
/// threads and invoked concurrently on independent buffers.
///
/// ```ignore
/// let snapper = DocSnapper::new(SnapConfig::default());
/// let scanned = snapper.snap(&photo, OutputMode::Scan)?;
/// ```
pub struct DocSnapper {
    config: SnapConfig,
    logger: Box<dyn SnapLogger + Send + Sync>,
}

impl DocSnapper {
    /// Build a snapper with the given configuration, logging through
    /// `tracing`.
    pub fn new(config: SnapConfig) -> Self {
        Self::with_logger(config, TracingLogger)
    }

    /// Build a snapper with an explicitly injected logging capability.
    pub fn with_logger(config: SnapConfig, logger: impl SnapLogger + Send + Sync + 'static) -> Self {
        Self {
            config,
            logger: Box::new(logger),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Locate the document in `image` and return a top-down rendering of it.
    ///
    /// Success yields an owned buffer sized by the detected document: RGB in
    /// [`OutputMode::Color`], strictly black/white luma in
    /// [`OutputMode::Scan`]. The two failure kinds are
    /// [`SnapError::EmptyInput`] (checked at entry, before any work) and
    /// [`SnapError::DocumentNotFound`] (no 4-vertex convex candidate, or a
    /// degenerate mapping). No partial output is ever returned.
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), ?mode))]
    pub fn snap(&self, image: &DynamicImage, mode: OutputMode) -> Result<DynamicImage> {
        let logger = self.logger.as_ref();

        if image.width() == 0 || image.height() == 0 {
            logger.error("snap: empty input image");
            return Err(SnapError::EmptyInput);
        }

        let pre = preprocess::preprocess(image, &self.config, logger);

        let quad_points = contour::find_document_quad(
            &pre.edges,
            pre.ratio,
            self.config.approx_epsilon_frac,
            logger,
        )?;

        let ordered = corners::order_corners(quad_points);
        let gray_full = image.to_luma8();
        let refined = corners::refine_corners(&gray_full, ordered, &self.config, logger);

        let warped = rectify::rectify(image, &refined, logger)?;

        match mode {
            OutputMode::Color => Ok(DynamicImage::ImageRgb8(warped)),
            OutputMode::Scan => {
                let gray = DynamicImage::ImageRgb8(warped).to_luma8();
                let binary = rectify::binarize_adaptive_mean(
                    &gray,
                    self.config.threshold_block_size,
                    self.config.threshold_offset,
                );
                Ok(DynamicImage::ImageLuma8(binary))
            }
        }
    }
}

impl Default for DocSnapper {
    fn default() -> Self {
        Self::new(SnapConfig::default())
    }
}

/// Snap a document with default configuration and `tracing` diagnostics.
///
/// Convenience wrapper around [`DocSnapper`] for one-off calls.
pub fn snap_document(image: &DynamicImage, mode: OutputMode) -> Result<DynamicImage> {
    DocSnapper::default().snap(image, mode)
}
