// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestration. Runs every normalisation stage in order and keeps
// each intermediate raster for inspection.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use serde::Serialize;
use sigprep_core::error::Result;
use sigprep_core::{BoundingBox, PipelineConfig};
use tracing::{error, info, instrument};

use crate::raster::{
    WORKING_HEIGHT, gaussian_blur, load_path, resize_area, scale_to_height, to_gray,
};
use crate::scan::{
    binarize, bounding_box, clean_mask, crop_to_box, deskew, enhance_contrast, foreground_count,
    skeletonize,
};

/// Aperture of the pre-threshold smoothing blur.
const SMOOTHING_KERNEL: usize = 5;

/// Every raster produced by one `preprocess` call, plus the skew angle used.
///
/// Owned entirely by the caller; nothing is cached between invocations.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The decoded input, untouched.
    pub original: DynamicImage,
    /// Grayscale after deskew and working-height normalisation.
    pub gray: GrayImage,
    /// `gray` after clip-limited adaptive histogram equalisation.
    pub enhanced: GrayImage,
    /// Inverted adaptive-threshold mask (ink = 255).
    pub binary: GrayImage,
    /// `binary` after opening and closing.
    pub clean: GrayImage,
    /// The cropped region of `clean`.
    pub signature: GrayImage,
    /// One-pixel-wide thinning of `signature`.
    pub skeleton: GrayImage,
    /// `skeleton` resized to the configured output size.
    pub final_image: GrayImage,
    /// Box located in `clean`, from which `signature` was cut.
    pub bounding_box: BoundingBox,
    /// Counter-clockwise rotation applied during deskew, or 0.0 when skipped.
    pub skew_angle: f64,
}

/// Stage names in pipeline order, as used by [`PipelineResult::stage`].
pub const STAGE_NAMES: [&str; 7] = [
    "gray",
    "enhanced",
    "binary",
    "clean",
    "signature",
    "skeleton",
    "final",
];

impl PipelineResult {
    /// Single-channel rasters in pipeline order, paired with their names.
    pub fn stages(&self) -> [(&'static str, &GrayImage); 7] {
        [
            ("gray", &self.gray),
            ("enhanced", &self.enhanced),
            ("binary", &self.binary),
            ("clean", &self.clean),
            ("signature", &self.signature),
            ("skeleton", &self.skeleton),
            ("final", &self.final_image),
        ]
    }

    /// Look a stage up by name.
    pub fn stage(&self, name: &str) -> Option<&GrayImage> {
        self.stages()
            .into_iter()
            .find(|(stage, _)| *stage == name)
            .map(|(_, img)| img)
    }

    /// Dimensions and key measurements, suitable for logging or JSON output.
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            original: (self.original.width(), self.original.height()),
            stages: self
                .stages()
                .into_iter()
                .map(|(name, img)| StageSummary {
                    name,
                    width: img.width(),
                    height: img.height(),
                })
                .collect(),
            bounding_box: self.bounding_box,
            skew_angle: self.skew_angle,
            skeleton_pixels: foreground_count(&self.skeleton),
        }
    }
}

/// Serializable overview of a [`PipelineResult`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub original: (u32, u32),
    pub stages: Vec<StageSummary>,
    pub bounding_box: BoundingBox,
    pub skew_angle: f64,
    pub skeleton_pixels: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Normalise a decoded signature image.
///
/// Fails fast: a stage error is logged with the stage name and returned
/// unchanged. No partial result is ever produced.
#[instrument(skip(image, config), fields(width = image.width(), height = image.height()))]
pub fn preprocess(image: &DynamicImage, config: PipelineConfig) -> Result<PipelineResult> {
    config
        .validate()
        .inspect_err(|err| error!(stage = "config", error = %err, "Pipeline rejected"))?;

    let gray = to_gray(image);
    let (gray, skew_angle) = if config.deskew_enabled {
        deskew(&gray, config.max_skew)
            .inspect_err(|err| error!(stage = "deskew", error = %err, "Pipeline stage failed"))?
    } else {
        (gray, 0.0)
    };

    let gray = scale_to_height(&gray, WORKING_HEIGHT);
    let enhanced = enhance_contrast(&gray);
    let blurred = gaussian_blur(&enhanced, SMOOTHING_KERNEL);
    let binary = binarize(&blurred);
    let clean = clean_mask(&binary);
    let bbox = bounding_box(&clean);
    let signature = crop_to_box(&clean, bbox);
    let skeleton = skeletonize(&signature);
    let final_image = resize_area(&skeleton, config.output_size);

    info!(
        skew_angle,
        %bbox,
        skeleton_pixels = foreground_count(&skeleton),
        output = %config.output_size,
        "Signature normalised"
    );

    Ok(PipelineResult {
        original: image.clone(),
        gray,
        enhanced,
        binary,
        clean,
        signature,
        skeleton,
        final_image,
        bounding_box: bbox,
        skew_angle,
    })
}

/// Load an image file and normalise it.
#[instrument(skip_all, fields(input = %path.as_ref().display()))]
pub fn preprocess_path(path: impl AsRef<Path>, config: PipelineConfig) -> Result<PipelineResult> {
    let image = load_path(path.as_ref())
        .inspect_err(|err| error!(stage = "load", error = %err, "Pipeline stage failed"))?;
    preprocess(&image, config)
}
