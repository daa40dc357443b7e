// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the sigprep-pipeline crate. Covers the full
// normalisation pipeline plus its two most expensive stages on a synthetic
// 600x200 signature.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use sigprep_pipeline::raster::{WORKING_HEIGHT, scale_to_height};
use sigprep_pipeline::scan::{binarize, enhance_contrast, skeletonize};
use sigprep_pipeline::{PipelineConfig, preprocess};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// White 600x200 canvas with one dark stroke rising 15 degrees to the right.
fn synthetic_signature() -> GrayImage {
    let mut img = GrayImage::from_pixel(600, 200, Luma([255u8]));
    let (sin, cos) = 15f64.to_radians().sin_cos();
    let corner = |a: f64, b: f64| {
        Point::new(
            (300.0 + a * cos + b * sin).round() as i32,
            (100.0 - a * sin + b * cos).round() as i32,
        )
    };
    let poly = [
        corner(-180.0, -4.0),
        corner(180.0, -4.0),
        corner(180.0, 4.0),
        corner(-180.0, 4.0),
    ];
    draw_polygon_mut(&mut img, &poly, Luma([0u8]));
    img
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_full_pipeline(c: &mut Criterion) {
    let input = DynamicImage::ImageLuma8(synthetic_signature());
    c.bench_function("preprocess (600x200, 15deg)", |b| {
        b.iter(|| {
            let result = preprocess(black_box(&input), PipelineConfig::default())
                .expect("synthetic signature has ink");
            black_box(result.final_image);
        });
    });
}

/// CLAHE and thinning dominate the runtime at working height.
fn bench_stages(c: &mut Criterion) {
    let working = scale_to_height(&synthetic_signature(), WORKING_HEIGHT);
    let mask = binarize(&working);

    c.bench_function("clahe (working height)", |b| {
        b.iter(|| black_box(enhance_contrast(black_box(&working))));
    });
    c.bench_function("skeletonize (working height)", |b| {
        b.iter(|| black_box(skeletonize(black_box(&mask))));
    });
}

criterion_group!(benches, bench_full_pipeline, bench_stages);
criterion_main!(benches);
