// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry value types shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// Canonical output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

impl std::fmt::Display for OutputSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle in raster coordinates, all four edges inclusive.
///
/// A box produced for a `width` x `height` raster always satisfies
/// `top <= bottom < height` and `left <= right < width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl BoundingBox {
    /// The box covering an entire `width` x `height` raster.
    ///
    /// Both dimensions must be non-zero.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            top: 0,
            bottom: height.saturating_sub(1),
            left: 0,
            right: width.saturating_sub(1),
        }
    }

    /// Check the ordering and bounds invariant against a raster size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.top <= self.bottom
            && self.bottom < height
            && self.left <= self.right
            && self.right < width
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rows {}..={}, cols {}..={}",
            self.top, self.bottom, self.left, self.right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_box_covers_raster() {
        let bbox = BoundingBox::full(600, 200);
        assert_eq!((bbox.top, bbox.bottom, bbox.left, bbox.right), (0, 199, 0, 599));
        assert!(bbox.fits_within(600, 200));
        assert!(!bbox.fits_within(599, 200));
    }

    #[test]
    fn single_pixel_box() {
        let bbox = BoundingBox::full(1, 1);
        assert_eq!((bbox.top, bbox.bottom, bbox.left, bbox.right), (0, 0, 0, 0));
        assert!(bbox.fits_within(1, 1));
    }

    #[test]
    fn degenerate_output_size() {
        assert!(OutputSize::new(0, 256).is_degenerate());
        assert!(!OutputSize::default().is_degenerate());
        assert_eq!(OutputSize::default().to_string(), "256x256");
    }
}
