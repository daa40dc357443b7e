// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-aperture Gaussian filtering. Kernels are built from the aperture size
// and applied separably with an explicit border mode.

use image::GrayImage;
use tracing::{debug, instrument};

/// How samples outside the raster are synthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// `gfedcb|abcdefgh|gfedcba` (mirror without repeating the edge sample).
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`.
    Replicate,
}

impl BorderMode {
    /// Map a possibly out-of-range coordinate onto `0..len`.
    pub fn resolve(self, index: i64, len: usize) -> usize {
        let n = len as i64;
        if n <= 1 {
            return 0;
        }
        match self {
            BorderMode::Replicate => index.clamp(0, n - 1) as usize,
            BorderMode::Reflect101 => {
                let mut i = index;
                // Large apertures on tiny rasters can need more than one bounce.
                while i < 0 || i >= n {
                    if i < 0 {
                        i = -i;
                    }
                    if i >= n {
                        i = 2 * (n - 1) - i;
                    }
                }
                i as usize
            }
        }
    }
}

/// Normalised 1-D Gaussian kernel for an odd aperture.
///
/// Apertures up to 7 use the classic binomial tables; larger apertures derive
/// sigma from the size as `0.3 * ((ksize - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(ksize: usize) -> Vec<f64> {
    debug_assert!(ksize % 2 == 1, "aperture must be odd");
    match ksize {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![
            0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
        ],
        _ => {
            let sigma = 0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8;
            let centre = (ksize as f64 - 1.0) * 0.5;
            let mut weights: Vec<f64> = (0..ksize)
                .map(|i| {
                    let d = i as f64 - centre;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect();
            let sum: f64 = weights.iter().sum();
            for w in &mut weights {
                *w /= sum;
            }
            weights
        }
    }
}

/// Separable Gaussian filter with a reflect-101 border, returning unrounded
/// sums, one per pixel. `imageproc`'s filters only pad by continuity.
fn gaussian_filter_f64(gray: &GrayImage, ksize: usize) -> Vec<f64> {
    let border = BorderMode::Reflect101;
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let kernel = gaussian_kernel(ksize);
    let radius = (ksize / 2) as i64;
    let src = gray.as_raw();

    // Horizontal pass.
    let mut horizontal = vec![0.0f64; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = border.resolve(x as i64 + k as i64 - radius, w);
                acc += weight * row[sx] as f64;
            }
            horizontal[y * w + x] = acc;
        }
    }

    // Vertical pass.
    let mut output = vec![0.0f64; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = border.resolve(y as i64 + k as i64 - radius, h);
                acc += weight * horizontal[sy * w + x];
            }
            output[y * w + x] = acc;
        }
    }

    output
}

/// Gaussian blur with an odd `ksize` x `ksize` aperture and reflect-101 border,
/// rounded back to 8 bits.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn gaussian_blur(gray: &GrayImage, ksize: usize) -> GrayImage {
    let sums = gaussian_filter_f64(gray, ksize);
    let pixels = sums
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    debug!(ksize, "Gaussian blur applied");
    GrayImage::from_raw(gray.width(), gray.height(), pixels)
        .expect("buffer length matches source dimensions")
}
