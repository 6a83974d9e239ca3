// error.rs — Error types for the stage gate.

use thiserror::Error;

/// Errors that abort a stage gate run before any verdict is reached.
#[derive(Debug, Error)]
pub enum StageError {
    /// No stage name was supplied.
    #[error("STAGE input is required.")]
    MissingStageName,

    /// The stage spec file does not exist.
    #[error("Stage file not found: {path}")]
    SpecNotFound { path: String },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The stage spec could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}
