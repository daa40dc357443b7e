// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sigprep-pipeline: signature image normalisation.
//
// Turns a photographed or scanned handwritten signature into a canonical,
// orientation-corrected, one-pixel-wide skeleton: deskew, working-height
// scaling, CLAHE, Gaussian smoothing, inverted adaptive thresholding,
// morphological cleanup, bounding-box crop, thinning, and a final area resize.

pub mod pipeline;
pub mod raster;
pub mod scan;

// Re-export the entry points so callers can use `sigprep_pipeline::preprocess` etc.
pub use pipeline::{PipelineResult, PipelineSummary, STAGE_NAMES, preprocess, preprocess_path};
pub use raster::{load_bytes, load_path, save_gray};
pub use sigprep_core::{BoundingBox, OutputSize, PipelineConfig, SigprepError};
