//! Error types for tfh_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tfh_core operations.
#[derive(Error, Debug)]
pub enum TfError {
    /// terraform is not installed or not found on PATH.
    #[error("terraform binary not found: {0}")]
    TerraformNotFound(String),

    /// terraform process failed to start for a reason other than a missing binary.
    #[error("failed to start terraform: {0}")]
    SpawnFailed(String),

    /// The module directory does not exist or is not a directory.
    #[error("module directory not found: {}", .0.display())]
    ModuleDirNotFound(PathBuf),

    /// A terraform subcommand exited unsuccessfully.
    #[error("terraform {command} failed (exit code {}): {stderr}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// Subcommand that failed (init, apply, destroy, ...)
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// `terraform output -json` produced something we could not parse.
    #[error("failed to parse terraform output: {0}")]
    OutputParse(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A `NAME=VALUE` pair was malformed.
    #[error("invalid variable assignment: {0:?} (expected NAME=VALUE)")]
    InvalidVar(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TfError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::TerraformNotFound(_) => Some(
                "Install terraform and make sure it is on PATH, or set TFH_TERRAFORM_BIN.",
            ),
            Self::ModuleDirNotFound(_) => {
                Some("Check the module path; it is resolved relative to the working directory.")
            }
            Self::CommandFailed { command, .. } if command == "destroy" => Some(
                "Resources may have leaked. Inspect the state and rerun 'tfh destroy'.",
            ),
            Self::CommandFailed { command, .. } if command == "init" => {
                Some("Check provider versions and backend configuration.")
            }
            Self::InvalidVar(_) => Some("Pass variables as --var name=value."),
            _ => None,
        }
    }
}

/// Convenience Result type for tfh_core operations.
pub type Result<T> = std::result::Result<T, TfError>;
