// error.rs — Error types for the change policy subsystem.

use thiserror::Error;

/// Errors that can occur while loading policy inputs.
///
/// All of these are configuration errors: the gate aborts before evaluating.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A YAML document could not be parsed into the expected shape.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}
