// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Topological thinning of the ink mask to a one-pixel-wide skeleton.
//
// Guo-Hall two-subiteration thinning. Candidates for each subiteration are
// chosen against a snapshot of the mask, then removed one at a time with the
// deletability test re-run against the live mask, so no component is ever
// split or erased and stroke ends stay put.

use image::GrayImage;
use tracing::{debug, instrument};

use super::binarize::INK;

/// Thin every pixel `> 0` of `mask` down to a skeleton. Output is 0 / 255.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn skeletonize(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut bits: Vec<u8> = mask.as_raw().iter().map(|&v| u8::from(v > 0)).collect();

    let mut passes = 0usize;
    let mut removed_total = 0usize;
    loop {
        let mut removed = 0usize;
        for sub in [Subiteration::First, Subiteration::Second] {
            let candidates: Vec<usize> = (0..w * h)
                .filter(|&i| bits[i] == 1 && sub.removable(&neighbours(&bits, w, h, i)))
                .collect();
            for i in candidates {
                if is_deletable(&neighbours(&bits, w, h, i)) {
                    bits[i] = 0;
                    removed += 1;
                }
            }
        }
        passes += 1;
        removed_total += removed;
        if removed == 0 {
            break;
        }
    }
    debug!(passes, removed_total, "Thinning converged");

    let pixels = bits.into_iter().map(|b| if b == 1 { INK } else { 0 }).collect();
    GrayImage::from_raw(width, height, pixels).expect("buffer length matches source dimensions")
}

/// Number of foreground (`> 0`) pixels.
pub fn foreground_count(img: &GrayImage) -> usize {
    img.as_raw().iter().filter(|&&v| v > 0).count()
}

#[derive(Debug, Clone, Copy)]
enum Subiteration {
    /// Peels west and south boundary points.
    First,
    /// Peels east and north boundary points.
    Second,
}

impl Subiteration {
    fn removable(self, n: &[u8; 8]) -> bool {
        if !is_deletable(n) {
            return false;
        }
        let [north, north_east, east, south_east, south, south_west, west, north_west] = *n;
        let side = match self {
            Subiteration::First => (south | south_west | (1 - north_west)) & west,
            Subiteration::Second => (north | north_east | (1 - south_east)) & east,
        };
        side == 0
    }
}

/// A pixel can go when its neighbours form a single 8-connected arc touching
/// a background 4-neighbour (crossing number 1), and pairing adjacent
/// neighbours leaves two or three occupied pairs.
///
/// The pairing count is 1 at the end of a stroke, including a staircase end
/// whose two neighbours sit side by side, so ends are never peeled.
fn is_deletable(n: &[u8; 8]) -> bool {
    let [north, north_east, east, south_east, south, south_west, west, north_west] = *n;
    let crossings = ((1 - north) & (north_east | east))
        + ((1 - east) & (south_east | south))
        + ((1 - south) & (south_west | west))
        + ((1 - west) & (north_west | north));
    if crossings != 1 {
        return false;
    }
    let pairs_a =
        (north_west | north) + (north_east | east) + (south_east | south) + (south_west | west);
    let pairs_b =
        (north | north_east) + (east | south_east) + (south | south_west) + (west | north_west);
    (2..=3).contains(&pairs_a.min(pairs_b))
}

/// Neighbours clockwise from north: N, NE, E, SE, S, SW, W, NW.
/// Outside the raster counts as background.
fn neighbours(bits: &[u8], w: usize, h: usize, i: usize) -> [u8; 8] {
    let x = (i % w) as i64;
    let y = (i / w) as i64;
    let at = |dx: i64, dy: i64| -> u8 {
        let (nx, ny) = (x + dx, y + dy);
        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
            0
        } else {
            bits[ny as usize * w + nx as usize]
        }
    };
    [
        at(0, -1),
        at(1, -1),
        at(1, 0),
        at(1, 1),
        at(0, 1),
        at(-1, 1),
        at(-1, 0),
        at(-1, -1),
    ]
}
