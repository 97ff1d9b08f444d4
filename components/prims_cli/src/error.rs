//! Error types for the CLI

use core_types::JsError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// A built-in or the event loop failed
    #[error("JavaScript error: {0}")]
    Js(#[from] JsError),

    /// Report could not be serialized
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
