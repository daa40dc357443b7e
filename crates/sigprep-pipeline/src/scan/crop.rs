// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signature bounding box and crop.

use image::GrayImage;
use image::imageops;
use sigprep_core::BoundingBox;
use tracing::{debug, instrument, warn};

/// The value a row or column must contain to count as a box edge.
///
/// This is the background value of the inverted mask, not the ink value, so on
/// a typical mask the box covers (nearly) the whole raster. Downstream
/// matchers expect exactly these crops.
pub const EDGE_VALUE: u8 = 0;

/// Scan rows from both ends and columns from both ends for the first line
/// holding an [`EDGE_VALUE`] pixel.
///
/// Sides with no matching line fall back to the full raster extent.
#[instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn bounding_box(mask: &GrayImage) -> BoundingBox {
    let (width, height) = mask.dimensions();
    let row_hit = |y: u32| (0..width).any(|x| mask.get_pixel(x, y).0[0] == EDGE_VALUE);
    let col_hit = |x: u32| (0..height).any(|y| mask.get_pixel(x, y).0[0] == EDGE_VALUE);

    let full = BoundingBox::full(width, height);
    let top = (0..height).find(|&y| row_hit(y));
    let bottom = (0..height).rev().find(|&y| row_hit(y));
    let left = (0..width).find(|&x| col_hit(x));
    let right = (0..width).rev().find(|&x| col_hit(x));

    if top.is_none() || left.is_none() {
        warn!("No row or column matched; using the full raster extent");
    }

    let bbox = BoundingBox {
        top: top.unwrap_or(full.top),
        bottom: bottom.unwrap_or(full.bottom),
        left: left.unwrap_or(full.left),
        right: right.unwrap_or(full.right),
    };
    debug!(%bbox, "Bounding box located");
    bbox
}

/// Cut the half-open region `[top, bottom) x [left, right)` out of `mask`.
///
/// The far row and column are excluded; a zero-height or zero-width region is
/// widened to one line so the result is never empty.
pub fn crop_to_box(mask: &GrayImage, bbox: BoundingBox) -> GrayImage {
    let height = (bbox.bottom - bbox.top).max(1);
    let width = (bbox.right - bbox.left).max(1);
    imageops::crop_imm(mask, bbox.left, bbox.top, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn mostly_background_mask_spans_everything() {
        let mut mask = GrayImage::new(40, 30);
        draw_filled_rect_mut(&mut mask, Rect::at(10, 10).of_size(5, 5), Luma([255u8]));
        assert_eq!(bounding_box(&mask), BoundingBox::full(40, 30));
    }

    #[test]
    fn all_ink_mask_falls_back_to_full_extent() {
        let mask = GrayImage::from_pixel(12, 9, Luma([255u8]));
        let bbox = bounding_box(&mask);
        assert_eq!(bbox, BoundingBox::full(12, 9));
        assert!(bbox.fits_within(12, 9));
    }

    #[test]
    fn solid_ink_margins_are_skipped() {
        // Rows 0..3 and columns 0..2 are solid ink; the predicate only fires
        // once a background pixel appears.
        let mut mask = GrayImage::from_pixel(10, 10, Luma([255u8]));
        draw_filled_rect_mut(&mut mask, Rect::at(2, 3).of_size(6, 5), Luma([0u8]));
        let bbox = bounding_box(&mask);
        assert_eq!(
            bbox,
            BoundingBox {
                top: 3,
                bottom: 7,
                left: 2,
                right: 7
            }
        );
    }

    #[test]
    fn crop_excludes_far_edges() {
        let mask = GrayImage::from_fn(10, 8, |x, y| Luma([(x + 10 * y) as u8]));
        let bbox = BoundingBox {
            top: 2,
            bottom: 6,
            left: 1,
            right: 9,
        };
        let cropped = crop_to_box(&mask, bbox);
        assert_eq!(cropped.dimensions(), (8, 4));
        assert_eq!(cropped.get_pixel(0, 0).0[0], 21);
    }

    #[test]
    fn degenerate_crop_keeps_one_line() {
        let mask = GrayImage::from_pixel(1, 1, Luma([0u8]));
        let bbox = bounding_box(&mask);
        assert_eq!(crop_to_box(&mask, bbox).dimensions(), (1, 1));
    }

    #[test]
    fn box_invariant_holds_on_noise() {
        for seed in 0..20u32 {
            let mask = GrayImage::from_fn(17 + seed, 11 + seed / 2, |x, y| {
                Luma([if (x * 31 + y * 17 + seed * 7) % 9 == 0 { 0 } else { 255 }])
            });
            let (w, h) = mask.dimensions();
            assert!(bounding_box(&mask).fits_within(w, h));
        }
    }
}
