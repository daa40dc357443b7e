// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive binarisation with inverted polarity: ink becomes 255, paper 0.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;
use tracing::{debug, instrument};

use crate::raster::filter::gaussian_kernel;

/// Neighbourhood size used by the pipeline.
pub const BLOCK_SIZE: usize = 21;

/// Offset subtracted from the local mean.
pub const OFFSET: i32 = 15;

/// Foreground value in every binary mask.
pub const INK: u8 = 255;

/// Gaussian-weighted adaptive threshold, inverted.
///
/// For each pixel the threshold is the Gaussian-weighted mean of its
/// `block_size` x `block_size` neighbourhood (edges replicated, mean rounded to
/// 8 bits) minus `offset`. Pixels strictly darker than their threshold become
/// [`INK`]; everything else becomes 0.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_threshold_inv(gray: &GrayImage, block_size: usize, offset: i32) -> GrayImage {
    let means = local_mean(gray, block_size);
    let pixels: Vec<u8> = gray
        .as_raw()
        .iter()
        .zip(means.as_raw().iter())
        .map(|(&src, &mean)| {
            let threshold = mean.round().clamp(0.0, 255.0) as i32 - offset;
            if (src as i32) < threshold { INK } else { 0 }
        })
        .collect();

    let ink = pixels.iter().filter(|&&v| v == INK).count();
    debug!(block_size, offset, ink_pixels = ink, "Adaptive threshold applied");
    GrayImage::from_raw(gray.width(), gray.height(), pixels)
        .expect("buffer length matches source dimensions")
}

/// Unrounded Gaussian-weighted mean of each `block_size` x `block_size`
/// neighbourhood. `imageproc` pads by continuity, which is the replicated edge.
fn local_mean(gray: &GrayImage, block_size: usize) -> ImageBuffer<Luma<f32>, Vec<f32>> {
    let kernel: Vec<f32> = gaussian_kernel(block_size).into_iter().map(|w| w as f32).collect();
    let samples: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
            Luma([gray.get_pixel(x, y).0[0] as f32])
        });
    separable_filter_equal(&samples, &kernel)
}

/// The pipeline's binarisation step (21x21 neighbourhood, offset 15).
pub fn binarize(gray: &GrayImage) -> GrayImage {
    adaptive_threshold_inv(gray, BLOCK_SIZE, OFFSET)
}
