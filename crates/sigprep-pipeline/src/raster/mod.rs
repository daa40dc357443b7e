// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module: loading, grayscale conversion, Gaussian filtering, and resampling.

pub mod filter;
pub mod loader;
pub mod resize;

pub use filter::{BorderMode, gaussian_blur};
pub use loader::{load_bytes, load_path, save_gray, to_gray};
pub use resize::{WORKING_HEIGHT, resize_area, scale_to_height};
