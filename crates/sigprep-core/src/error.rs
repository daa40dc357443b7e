// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for sigprep.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all sigprep operations.
#[derive(Debug, Error)]
pub enum SigprepError {
    // -- Input errors --
    #[error("input image not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to decode image: {0}")]
    Decode(String),

    // -- Pipeline errors --
    #[error("no foreground pixels found during {stage}")]
    EmptyForeground { stage: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    // -- Output errors --
    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SigprepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_foreground_names_stage() {
        let err = SigprepError::EmptyForeground { stage: "deskew" };
        assert_eq!(err.to_string(), "no foreground pixels found during deskew");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: SigprepError = io.into();
        assert!(matches!(err, SigprepError::Io(_)));
    }
}
