// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Morphological cleanup of the binary ink mask.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};
use tracing::instrument;

/// Open with a 3x3 square to drop isolated specks, then close twice
/// (two dilations followed by two erosions) to bridge small stroke gaps.
///
/// Under the `LInf` norm a radius of `k` is a `(2k + 1)` square, so the double
/// 3x3 closing is a single radius-2 closing.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn clean_mask(mask: &GrayImage) -> GrayImage {
    let opened = open(mask, Norm::LInf, 1);
    close(&opened, Norm::LInf, 2)
}
