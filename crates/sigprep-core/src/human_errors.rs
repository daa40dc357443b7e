// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command-line front end.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives the exit code the binary reports.

use crate::error::SigprepError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (path, flag, config file) and rerun.
    ActionRequired,
    /// The input itself cannot be processed; rerunning will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (printed first).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `SigprepError` into a `HumanError`.
pub fn humanize_error(err: &SigprepError) -> HumanError {
    match err {
        SigprepError::FileNotFound(path) => HumanError {
            message: "The signature image could not be found.".into(),
            suggestion: format!("Check the path and try again. (Path: {})", path.display()),
            severity: Severity::ActionRequired,
        },

        SigprepError::Decode(detail) => HumanError {
            message: "The file is not a readable image.".into(),
            suggestion: format!(
                "Save the signature as PNG or JPEG and try again. (Detail: {detail})"
            ),
            severity: Severity::Permanent,
        },

        SigprepError::EmptyForeground { stage } => HumanError {
            message: "No ink was found in the image.".into(),
            suggestion: format!(
                "The image looks blank. Make sure the signature is visible, or rerun with --no-deskew. (Stage: {stage})"
            ),
            severity: Severity::Permanent,
        },

        SigprepError::InvalidConfiguration(detail) => HumanError {
            message: "The pipeline settings are not valid.".into(),
            suggestion: format!("Fix the option or config file value. ({detail})"),
            severity: Severity::ActionRequired,
        },

        SigprepError::Encode(detail) => HumanError {
            message: "The result image could not be written.".into(),
            suggestion: format!(
                "Check the output location is writable and ends in .png or .jpg. (Detail: {detail})"
            ),
            severity: Severity::ActionRequired,
        },

        SigprepError::Io(io) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check permissions and free disk space. ({io})"),
            severity: Severity::ActionRequired,
        },

        SigprepError::Serialization(detail) => HumanError {
            message: "The configuration file is not valid JSON.".into(),
            suggestion: format!("Fix the syntax and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },
    }
}
