// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric resampling: working-height normalisation and the final
// area-averaging resize to the canonical output size.

use image::GrayImage;
use image::imageops::{self, FilterType};
use sigprep_core::OutputSize;
use tracing::{debug, instrument};

/// Height every signature is normalised to before enhancement.
pub const WORKING_HEIGHT: u32 = 720;

/// Resize to `target_height`, preserving the aspect ratio.
///
/// The new width is `round(width * target_height / height)`, never less than
/// one pixel. Uses bilinear (`Triangle`) filtering.
#[instrument(skip(gray), fields(from_w = gray.width(), from_h = gray.height()))]
pub fn scale_to_height(gray: &GrayImage, target_height: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let new_width = ((width as f64 * target_height as f64 / height as f64).round() as u32).max(1);
    if (new_width, target_height) == (width, height) {
        return gray.clone();
    }
    debug!(new_width, new_height = target_height, "Scaling to working height");
    imageops::resize(gray, new_width, target_height, FilterType::Triangle)
}

/// Resize to exactly `size` by averaging the source area each output pixel
/// covers. Aspect ratio is not preserved.
///
/// Every source pixel contributes to the outputs it overlaps in proportion to
/// the overlap, so thin strokes fade instead of disappearing when shrunk.
#[instrument(skip(gray), fields(from_w = gray.width(), from_h = gray.height(), to = %size))]
pub fn resize_area(gray: &GrayImage, size: OutputSize) -> GrayImage {
    let (width, height) = gray.dimensions();
    let cols = axis_weights(width, size.width);
    let rows = axis_weights(height, size.height);
    let src = gray.as_raw();
    let stride = width as usize;

    let mut out = GrayImage::new(size.width, size.height);
    for (oy, row_weights) in rows.iter().enumerate() {
        for (ox, col_weights) in cols.iter().enumerate() {
            let mut acc = 0.0f64;
            let mut total = 0.0f64;
            for &(sy, wy) in row_weights {
                let line = &src[sy * stride..(sy + 1) * stride];
                for &(sx, wx) in col_weights {
                    let w = wy * wx;
                    acc += w * line[sx] as f64;
                    total += w;
                }
            }
            let value = if total > 0.0 { acc / total } else { 0.0 };
            out.put_pixel(
                ox as u32,
                oy as u32,
                image::Luma([value.round().clamp(0.0, 255.0) as u8]),
            );
        }
    }
    out
}

/// For each output index along one axis, the source indices it overlaps and
/// the overlap length.
fn axis_weights(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|i| {
            let start = i as f64 * scale;
            let end = ((i + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len as usize);
            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)).max(0.0);
                    (overlap > 1e-12).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}
