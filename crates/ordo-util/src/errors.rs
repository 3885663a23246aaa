use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for application-level Ordo operations.
///
/// Resolution failures have their own structured types in `ordo-resolver`;
/// this covers everything around them (reading plans, configuration).
#[derive(Debug, Error, Diagnostic)]
pub enum OrdoError {
    /// A file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or malformed plan manifest.
    #[error("Plan error: {message}")]
    Plan {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type OrdoResult<T> = miette::Result<T>;
