// error.rs — Error types for verdict reporting.

use thiserror::Error;

/// Errors that can occur while publishing a verdict.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the workflow log stream failed.
    #[error("failed to write workflow log: {0}")]
    Log(#[from] std::io::Error),

    /// Appending to the machine-readable output file failed.
    #[error("failed to append to output file {path}: {source}")]
    OutputFile {
        path: String,
        source: std::io::Error,
    },

    /// The summary payload could not be rendered as JSON.
    #[error("failed to render summary: {0}")]
    Summary(#[from] serde_json::Error),
}
