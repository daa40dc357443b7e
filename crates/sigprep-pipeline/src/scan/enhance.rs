// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contrast enhancement via tiled, clip-limited histogram equalisation (CLAHE)
// with bilinear blending between neighbouring tile mappings.

use image::{GrayImage, Luma};
use tracing::{debug, instrument};

use crate::raster::BorderMode;

/// Clip-limited adaptive histogram equaliser.
///
/// The raster is split into `tiles_x` x `tiles_y` tiles. Each tile's histogram
/// is clipped at `clip_limit` times the mean bin count, the excess is spread
/// back over all bins, and the resulting cumulative mapping is blended
/// bilinearly between the four nearest tile centres. Both tile counts must be
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clahe {
    pub clip_limit: f64,
    pub tiles_x: u32,
    pub tiles_y: u32,
}

impl Default for Clahe {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

type Lut = [u8; 256];

impl Clahe {
    /// Equalise `gray`, returning a raster of the same size.
    #[instrument(skip(self, gray), fields(width = gray.width(), height = gray.height()))]
    pub fn apply(&self, gray: &GrayImage) -> GrayImage {
        let (width, height) = gray.dimensions();
        let tile_w = width.div_ceil(self.tiles_x);
        let tile_h = height.div_ceil(self.tiles_y);
        let area = (tile_w * tile_h) as usize;

        let clip = if self.clip_limit > 0.0 {
            Some(((self.clip_limit * area as f64 / 256.0) as usize).max(1))
        } else {
            None
        };
        debug!(tile_w, tile_h, clip = ?clip, "Computing tile mappings");

        let mut luts: Vec<Lut> = Vec::with_capacity((self.tiles_x * self.tiles_y) as usize);
        for ty in 0..self.tiles_y {
            for tx in 0..self.tiles_x {
                let mut hist = tile_histogram(gray, tx * tile_w, ty * tile_h, tile_w, tile_h);
                if let Some(limit) = clip {
                    clip_histogram(&mut hist, limit);
                }
                luts.push(cumulative_lut(&hist, area));
            }
        }

        let tiles_x = self.tiles_x as usize;
        let tiles_y = self.tiles_y as usize;
        let inv_tw = 1.0 / tile_w as f64;
        let inv_th = 1.0 / tile_h as f64;

        GrayImage::from_fn(width, height, |x, y| {
            let (tx1, tx2, xa) = neighbour_tiles(x as f64 * inv_tw - 0.5, tiles_x);
            let (ty1, ty2, ya) = neighbour_tiles(y as f64 * inv_th - 0.5, tiles_y);
            let v = gray.get_pixel(x, y).0[0] as usize;

            let top = luts[ty1 * tiles_x + tx1][v] as f64 * (1.0 - xa)
                + luts[ty1 * tiles_x + tx2][v] as f64 * xa;
            let bottom = luts[ty2 * tiles_x + tx1][v] as f64 * (1.0 - xa)
                + luts[ty2 * tiles_x + tx2][v] as f64 * xa;
            let value = top * (1.0 - ya) + bottom * ya;
            Luma([value.round().clamp(0.0, 255.0) as u8])
        })
    }
}

/// CLAHE with the pipeline's fixed parameters (clip 2.0, 8x8 tiles).
pub fn enhance_contrast(gray: &GrayImage) -> GrayImage {
    Clahe::default().apply(gray)
}

/// Histogram of one tile. Tiles hanging past the raster edge sample the
/// mirrored interior so every tile counts exactly `tile_w * tile_h` pixels.
fn tile_histogram(gray: &GrayImage, x0: u32, y0: u32, tile_w: u32, tile_h: u32) -> [usize; 256] {
    let (width, height) = gray.dimensions();
    let stride = width as usize;
    let src = gray.as_raw();
    let mut hist = [0usize; 256];
    for y in y0..y0 + tile_h {
        let sy = BorderMode::Reflect101.resolve(y as i64, height as usize);
        for x in x0..x0 + tile_w {
            let sx = BorderMode::Reflect101.resolve(x as i64, width as usize);
            hist[src[sy * stride + sx] as usize] += 1;
        }
    }
    hist
}

/// Cap every bin at `limit` and hand the excess back out evenly, with any
/// remainder dealt one count at a time across the range.
fn clip_histogram(hist: &mut [usize; 256], limit: usize) {
    let mut excess = 0usize;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let batch = excess / 256;
    let mut residual = excess % 256;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (256 / residual).max(1);
        let mut i = 0;
        while i < 256 && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn cumulative_lut(hist: &[usize; 256], area: usize) -> Lut {
    let scale = 255.0 / area as f64;
    let mut lut = [0u8; 256];
    let mut sum = 0usize;
    for (i, count) in hist.iter().enumerate() {
        sum += count;
        lut[i] = (sum as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Indices of the two tiles bracketing a fractional tile coordinate and the
/// blend weight of the second.
fn neighbour_tiles(t: f64, count: usize) -> (usize, usize, f64) {
    let first = t.floor();
    let weight = t - first;
    let lo = (first as i64).clamp(0, count as i64 - 1) as usize;
    let hi = (first as i64 + 1).clamp(0, count as i64 - 1) as usize;
    (lo, hi, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(img: &GrayImage) -> (u8, u8) {
        let min = img.pixels().map(|p| p.0[0]).min().unwrap();
        let max = img.pixels().map(|p| p.0[0]).max().unwrap();
        (min, max)
    }

    #[test]
    fn output_keeps_dimensions() {
        let img = GrayImage::from_fn(37, 23, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
        assert_eq!(enhance_contrast(&img).dimensions(), (37, 23));
    }

    #[test]
    fn paper_white_stays_white() {
        let img = GrayImage::from_pixel(128, 64, Luma([255u8]));
        let out = enhance_contrast(&img);
        assert!(out.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn low_contrast_is_stretched() {
        let img = GrayImage::from_fn(256, 256, |x, y| Luma([100 + ((x + y) % 21) as u8]));
        let (in_min, in_max) = range(&img);
        let (out_min, out_max) = range(&enhance_contrast(&img));
        assert!(
            out_max - out_min > in_max - in_min,
            "range {out_min}..{out_max} not wider than {in_min}..{in_max}"
        );
    }

    #[test]
    fn monotone_within_a_tile() {
        // Brighter input never maps darker than dimmer input in the same tile.
        let img = GrayImage::from_fn(64, 64, |x, _| Luma([(x * 4) as u8]));
        let out = Clahe {
            clip_limit: 2.0,
            tiles_x: 1,
            tiles_y: 1,
        }
        .apply(&img);
        for x in 1..64 {
            assert!(out.get_pixel(x, 10).0[0] >= out.get_pixel(x - 1, 10).0[0]);
        }
    }

    #[test]
    fn clipping_conserves_mass() {
        let mut hist = [0usize; 256];
        hist[10] = 1000;
        hist[200] = 5;
        clip_histogram(&mut hist, 40);
        assert_eq!(hist.iter().sum::<usize>(), 1005);
        assert!(hist[10] <= 40 + 1000 / 256 + 1);
    }

    #[test]
    fn tiny_images_do_not_panic() {
        let img = GrayImage::from_pixel(1, 1, Luma([17u8]));
        assert_eq!(enhance_contrast(&img).dimensions(), (1, 1));
        let strip = GrayImage::from_fn(3, 50, |_, y| Luma([y as u8]));
        assert_eq!(enhance_contrast(&strip).dimensions(), (3, 50));
    }

    #[test]
    fn deterministic() {
        let img = GrayImage::from_fn(90, 70, |x, y| Luma([((x * x + y) % 251) as u8]));
        assert_eq!(enhance_contrast(&img), enhance_contrast(&img));
    }
}
