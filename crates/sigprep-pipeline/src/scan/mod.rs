// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature normalisation stages: skew correction, contrast enhancement,
// adaptive binarisation, morphological cleanup, cropping, and thinning.

pub mod binarize;
pub mod crop;
pub mod deskew;
pub mod enhance;
pub mod morphology;
pub mod skeleton;

pub use binarize::binarize;
pub use crop::{bounding_box, crop_to_box};
pub use deskew::{deskew, estimate_skew};
pub use enhance::{Clahe, enhance_contrast};
pub use morphology::clean_mask;
pub use skeleton::{foreground_count, skeletonize};
