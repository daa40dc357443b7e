// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster loading and saving. Decodes signature photos and scans via the
// `image` crate and writes intermediate rasters back out for inspection.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use sigprep_core::error::{Result, SigprepError};
use tracing::{debug, info, instrument};

/// Decode an image file from disk.
///
/// A missing path is reported as `FileNotFound`; anything the decoder rejects
/// is a `Decode` error.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_path(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SigprepError::FileNotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|err| {
        SigprepError::Decode(format!("failed to open {}: {}", path.display(), err))
    })?;
    ensure_non_empty(&img)?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img)
}

/// Decode an image from raw encoded bytes (PNG, JPEG, TIFF, ...).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn load_bytes(data: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| SigprepError::Decode(format!("failed to decode image: {}", err)))?;
    ensure_non_empty(&img)?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    Ok(img)
}

/// Collapse any colour layout to a single 8-bit luma channel.
pub fn to_gray(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Write a grayscale raster to a file. The format is inferred from the extension.
pub fn save_gray(gray: &GrayImage, path: impl AsRef<Path>) -> Result<()> {
    gray.save(path.as_ref()).map_err(|err| {
        SigprepError::Encode(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

fn ensure_non_empty(img: &DynamicImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(SigprepError::Decode(format!(
            "image has no pixels ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(())
}
