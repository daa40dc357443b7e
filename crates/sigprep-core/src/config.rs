// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SigprepError};
use crate::types::OutputSize;

/// Per-invocation settings for the normalization pipeline.
///
/// Passed by value into every `preprocess` call; nothing here is global.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Exact dimensions of the final raster.
    pub output_size: OutputSize,
    /// Whether the deskew stage runs at all.
    pub deskew_enabled: bool,
    /// Rotations with a smaller magnitude (degrees) are skipped.
    pub max_skew: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_size: OutputSize::default(),
            deskew_enabled: true,
            max_skew: 5.0,
        }
    }
}

impl PipelineConfig {
    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.output_size = OutputSize::new(width, height);
        self
    }

    pub fn with_deskew(mut self, enabled: bool) -> Self {
        self.deskew_enabled = enabled;
        self
    }

    pub fn with_max_skew(mut self, degrees: f64) -> Self {
        self.max_skew = degrees;
        self
    }

    /// Reject values the pipeline cannot honour instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if self.output_size.is_degenerate() {
            return Err(SigprepError::InvalidConfiguration(format!(
                "output_size must be non-zero in both dimensions, got {}",
                self.output_size
            )));
        }
        if !self.max_skew.is_finite() || self.max_skew < 0.0 {
            return Err(SigprepError::InvalidConfiguration(format!(
                "max_skew must be a finite, non-negative number of degrees, got {}",
                self.max_skew
            )));
        }
        Ok(())
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// A file that cannot be read is an invalid configuration, not an I/O
    /// failure of the run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            SigprepError::InvalidConfiguration(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_json(&text)
    }
}
