// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and exit codes.

use std::path::PathBuf;

use clap::Parser;
use sigprep_core::error::{Result, SigprepError};
use sigprep_core::{OutputSize, PipelineConfig};

/// Process exit codes, grouped so scripts can tell bad input from bad output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// Bad flag value or configuration file.
    InvalidArgs = 2,
    /// Input image missing or not decodable.
    InputNotFound = 3,
    /// Result image could not be written.
    OutputError = 4,
    /// The pipeline rejected the image (e.g. no ink found).
    ProcessingError = 5,
}

impl ExitCode {
    pub fn for_error(err: &SigprepError) -> Self {
        match err {
            SigprepError::InvalidConfiguration(_) | SigprepError::Serialization(_) => {
                ExitCode::InvalidArgs
            }
            SigprepError::FileNotFound(_) | SigprepError::Decode(_) => ExitCode::InputNotFound,
            SigprepError::Encode(_) | SigprepError::Io(_) => ExitCode::OutputError,
            SigprepError::EmptyForeground { .. } => ExitCode::ProcessingError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Normalize a handwritten signature image into a canonical skeleton.
#[derive(Parser, Debug)]
#[command(name = "sigprep")]
#[command(version)]
#[command(about = "Normalize a signature image into a canonical, deskewed skeleton", long_about = None)]
pub struct Args {
    /// Signature image (PNG, JPEG, TIFF, ...)
    pub image: PathBuf,

    /// JSON pipeline configuration; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip skew detection and correction
    #[arg(long)]
    pub no_deskew: bool,

    /// Skews smaller than this many degrees are left alone
    #[arg(long, value_name = "DEGREES")]
    pub max_skew: Option<f64>,

    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Where to write the normalized skeleton
    #[arg(short, long, default_value = "final_signature.png")]
    pub output: PathBuf,

    /// Do not write the normalized skeleton
    #[arg(long)]
    pub no_save: bool,

    /// Write every intermediate stage as a numbered PNG into this directory
    #[arg(long, value_name = "DIR")]
    pub dump_stages: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Resolve the effective configuration: file (or defaults), then flags.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if self.no_deskew {
            config.deskew_enabled = false;
        }
        if let Some(max_skew) = self.max_skew {
            config.max_skew = max_skew;
        }
        config.output_size = OutputSize::new(
            self.width.unwrap_or(config.output_size.width),
            self.height.unwrap_or(config.output_size.height),
        );
        config.validate()?;
        Ok(config)
    }
}
