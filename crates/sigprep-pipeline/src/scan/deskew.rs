// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew estimation and correction. Fits a minimum-area rectangle around every
// non-white pixel, reads its tilt, and rotates the raster back to level.

use image::{GrayImage, Luma};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use sigprep_core::error::{Result, SigprepError};
use tracing::{debug, info, instrument};

use crate::raster::BorderMode;

/// Any sample below this value counts as ink for skew estimation.
pub const PAPER_WHITE: u8 = 255;

/// Bicubic kernel sharpness (Keys `a` parameter).
const CUBIC_A: f64 = -0.75;

/// Smallest-area rectangle enclosing a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    /// Centre in pixel coordinates.
    pub center: (f64, f64),
    /// Extent along the edge the `angle` refers to.
    pub width: f64,
    /// Extent perpendicular to that edge.
    pub height: f64,
    /// Edge angle in degrees within `(-90, 0]`, measured with the y axis up.
    pub angle: f64,
}

impl RotatedRect {
    /// Counter-clockwise rotation (degrees) that levels the rectangle.
    ///
    /// Angles below -45 are folded onto their complement so the result always
    /// lies within `[-45, 45]`.
    pub fn skew_correction(&self) -> f64 {
        normalize_angle(self.angle)
    }
}

/// Fold a rectangle angle from `(-90, 0]` into a correction in `[-45, 45]`.
pub fn normalize_angle(raw: f64) -> f64 {
    if raw < -45.0 { -(90.0 + raw) } else { -raw }
}

/// Coordinates of every pixel darker than paper white.
///
/// Only the leftmost and rightmost ink pixel of each row are kept; interior
/// points never lie on the convex hull, so the fitted rectangle is unchanged.
pub fn foreground_points(gray: &GrayImage) -> Vec<Point<i32>> {
    let (width, _) = gray.dimensions();
    let mut points = Vec::new();
    for (y, row) in gray.as_raw().chunks_exact(width as usize).enumerate() {
        let first = row.iter().position(|&v| v < PAPER_WHITE);
        let last = row.iter().rposition(|&v| v < PAPER_WHITE);
        if let (Some(first), Some(last)) = (first, last) {
            points.push(Point::new(first as i32, y as i32));
            if last != first {
                points.push(Point::new(last as i32, y as i32));
            }
        }
    }
    points
}

/// Minimum-area enclosing rectangle via rotating calipers over the convex hull.
///
/// Returns `None` for an empty point set.
pub fn min_area_rect(points: &[Point<i32>]) -> Option<RotatedRect> {
    if points.is_empty() {
        return None;
    }
    let hull: Vec<(f64, f64)> = convex_hull(points)
        .into_iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();

    // Candidate edge directions: every hull edge, or the single segment when
    // the hull collapses to a line.
    let mut edges = Vec::with_capacity(hull.len());
    match hull.len() {
        0 => return None,
        1 => {}
        2 => edges.push((hull[1].0 - hull[0].0, hull[1].1 - hull[0].1)),
        n => {
            for i in 0..n {
                let (a, b) = (hull[i], hull[(i + 1) % n]);
                edges.push((b.0 - a.0, b.1 - a.1));
            }
        }
    }

    let mut best: Option<(f64, RotatedRect)> = None;
    for (dx, dy) in edges {
        let len = (dx * dx + dy * dy).sqrt();
        if len < f64::EPSILON {
            continue;
        }
        let (ux, uy) = (dx / len, dy / len);
        let (vx, vy) = (-uy, ux);

        let (mut min_u, mut max_u) = (f64::MAX, f64::MIN);
        let (mut min_v, mut max_v) = (f64::MAX, f64::MIN);
        for &(px, py) in &hull {
            let u = px * ux + py * uy;
            let v = px * vx + py * vy;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.as_ref().is_some_and(|(a, _)| area >= *a - 1e-9) {
            continue;
        }
        let cu = (min_u + max_u) / 2.0;
        let cv = (min_v + max_v) / 2.0;
        let rect = RotatedRect {
            center: (cu * ux + cv * vx, cu * uy + cv * vy),
            width: max_u - min_u,
            height: max_v - min_v,
            angle: edge_angle(dx, dy),
        };
        best = Some((area, rect));
    }

    Some(match best {
        Some((_, rect)) => rect,
        // Single point: a zero-sized, axis-aligned rectangle.
        None => RotatedRect {
            center: hull[0],
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        },
    })
}

/// Edge direction in image coordinates (y down) folded into `(-90, 0]`.
fn edge_angle(dx: f64, dy: f64) -> f64 {
    let degrees = (-dy).atan2(dx).to_degrees();
    // Tilt within (-45, 45], counter-clockwise positive.
    let mut tilt = degrees.rem_euclid(90.0);
    if tilt > 45.0 {
        tilt -= 90.0;
    }
    if tilt <= 0.0 { tilt } else { tilt - 90.0 }
}

/// Estimate the correction angle (degrees, counter-clockwise) for a grayscale
/// raster without rotating it.
///
/// Fails with `EmptyForeground` on a pure-white raster.
pub fn estimate_skew(gray: &GrayImage) -> Result<f64> {
    let points = foreground_points(gray);
    let rect = min_area_rect(&points).ok_or(SigprepError::EmptyForeground { stage: "deskew" })?;
    debug!(
        raw_angle = rect.angle,
        rect_w = rect.width,
        rect_h = rect.height,
        point_count = points.len(),
        "Minimum-area rectangle fitted"
    );
    Ok(rect.skew_correction())
}

/// Detect skew and rotate the raster level when it exceeds `max_skew`.
///
/// Returns the (possibly unchanged) raster and the rotation applied. When
/// `|angle| < max_skew` the input is returned as-is with an angle of `0.0`.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn deskew(gray: &GrayImage, max_skew: f64) -> Result<(GrayImage, f64)> {
    let angle = estimate_skew(gray)?;
    if angle.abs() < max_skew {
        debug!(angle, max_skew, "Skew below threshold; rotation skipped");
        return Ok((gray.clone(), 0.0));
    }
    info!(angle, "Correcting skew");
    Ok((rotate_about_center(gray, angle), angle))
}

/// Rotate counter-clockwise by `degrees` about `(width / 2, height / 2)`,
/// keeping the canvas size. Uses bicubic sampling with replicated edges, so no
/// synthetic background is introduced at the corners.
pub fn rotate_about_center(gray: &GrayImage, degrees: f64) -> GrayImage {
    let (width, height) = gray.dimensions();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (width as usize, height as usize);
    let src = gray.as_raw();

    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        // Inverse mapping: destination pixel -> source position.
        let sx = cos * dx - sin * dy + cx;
        let sy = sin * dx + cos * dy + cy;
        Luma([sample_bicubic(src, w, h, sx, sy)])
    })
}

fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        (CUBIC_A + 2.0) * t * t * t - (CUBIC_A + 3.0) * t * t + 1.0
    } else if t < 2.0 {
        CUBIC_A * t * t * t - 5.0 * CUBIC_A * t * t + 8.0 * CUBIC_A * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn sample_bicubic(src: &[u8], w: usize, h: usize, sx: f64, sy: f64) -> u8 {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let wx = [
        cubic_weight(1.0 + fx),
        cubic_weight(fx),
        cubic_weight(1.0 - fx),
        cubic_weight(2.0 - fx),
    ];
    let wy = [
        cubic_weight(1.0 + fy),
        cubic_weight(fy),
        cubic_weight(1.0 - fy),
        cubic_weight(2.0 - fy),
    ];

    let mut acc = 0.0;
    for (j, wyj) in wy.iter().enumerate() {
        let row = BorderMode::Replicate.resolve(y0 as i64 + j as i64 - 1, h);
        for (i, wxi) in wx.iter().enumerate() {
            let col = BorderMode::Replicate.resolve(x0 as i64 + i as i64 - 1, w);
            acc += wyj * wxi * src[row * w + col] as f64;
        }
    }
    acc.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use imageproc::drawing::draw_polygon_mut;

    /// White canvas with one dark stroke of the given thickness, tilted
    /// `tilt_degrees` counter-clockwise (rising to the right) about the centre.
    pub(crate) fn stroke_image(width: u32, height: u32, tilt_degrees: f64) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));
        let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
        let half_len = width as f64 * 0.3;
        let half_thick = 4.0;
        let (sin, cos) = tilt_degrees.to_radians().sin_cos();
        // Direction along the stroke in image coordinates (y down).
        let (ux, uy) = (cos, -sin);
        let (vx, vy) = (sin, cos);
        let corner = |a: f64, b: f64| {
            Point::new(
                (cx + a * ux + b * vx).round() as i32,
                (cy + a * uy + b * vy).round() as i32,
            )
        };
        let poly = [
            corner(-half_len, -half_thick),
            corner(half_len, -half_thick),
            corner(half_len, half_thick),
            corner(-half_len, half_thick),
        ];
        draw_polygon_mut(&mut img, &poly, Luma([0u8]));
        img
    }

    #[test]
    fn normalisation_folds_into_half_quadrant() {
        assert_eq!(normalize_angle(-75.0), -15.0);
        assert_eq!(normalize_angle(-10.0), 10.0);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(-89.0), -1.0);
    }

    #[test]
    fn axis_aligned_rectangle_has_zero_correction() {
        let points = vec![
            Point::new(10, 10),
            Point::new(50, 10),
            Point::new(50, 20),
            Point::new(10, 20),
        ];
        let rect = min_area_rect(&points).unwrap();
        assert!(rect.skew_correction().abs() < 1e-9);
        assert!((rect.width * rect.height - 400.0).abs() < 1e-6);
        assert!((rect.center.0 - 30.0).abs() < 1e-9);
        assert!((rect.center.1 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn empty_point_set_has_no_rectangle() {
        assert!(min_area_rect(&[]).is_none());
    }

    #[test]
    fn single_point_is_degenerate_but_valid() {
        let rect = min_area_rect(&[Point::new(3, 4)]).unwrap();
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.skew_correction(), 0.0);
    }

    #[test]
    fn collinear_points_follow_the_segment() {
        // Rising 45 degrees to the right in image coordinates.
        let points: Vec<_> = (0..20).map(|i| Point::new(i, 100 - i)).collect();
        let rect = min_area_rect(&points).unwrap();
        assert!((rect.skew_correction().abs() - 45.0).abs() < 1e-6);
    }

    #[test]
    fn blank_image_has_empty_foreground() {
        let white = GrayImage::from_pixel(64, 32, Luma([255u8]));
        let err = deskew(&white, 5.0).unwrap_err();
        assert!(matches!(err, SigprepError::EmptyForeground { stage: "deskew" }));
    }

    #[test]
    fn tilted_stroke_is_detected_and_levelled() {
        let img = stroke_image(600, 200, 15.0);
        let (rotated, angle) = deskew(&img, 5.0).unwrap();
        assert!((angle + 15.0).abs() < 2.0, "angle was {angle}");
        assert_eq!(rotated.dimensions(), img.dimensions());

        let residual = estimate_skew(&rotated).unwrap();
        assert!(residual.abs() < 2.0, "residual skew {residual}");
    }

    #[test]
    fn falling_stroke_reports_positive_correction() {
        let img = stroke_image(600, 200, -12.0);
        let angle = estimate_skew(&img).unwrap();
        assert!((angle - 12.0).abs() < 2.0, "angle was {angle}");
    }

    #[test]
    fn small_skew_is_skipped_and_image_untouched() {
        let img = stroke_image(600, 200, 2.0);
        let (out, angle) = deskew(&img, 5.0).unwrap();
        assert_eq!(angle, 0.0);
        assert_eq!(out, img);
    }

    #[test]
    fn zero_threshold_always_rotates_tilted_input() {
        let img = stroke_image(300, 300, 3.0);
        let (out, angle) = deskew(&img, 0.0).unwrap();
        assert!(angle.abs() > 1.0);
        assert_ne!(out, img);
    }

    #[test]
    fn rotation_by_zero_is_identity() {
        let img = stroke_image(120, 80, 20.0);
        assert_eq!(rotate_about_center(&img, 0.0), img);
    }

    #[test]
    fn rotation_keeps_uniform_image_uniform() {
        let img = GrayImage::from_pixel(50, 40, Luma([255u8]));
        let out = rotate_about_center(&img, 33.0);
        assert!(out.pixels().all(|p| p.0[0] == 255));
    }
}
