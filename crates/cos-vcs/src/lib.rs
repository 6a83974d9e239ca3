//! Changed-file discovery for the change policy gate.
//!
//! The gate itself never talks to version control: it receives a list of
//! paths. This crate produces that list, either from `git diff` over the
//! change's revision range or from an explicit list.

pub mod git;

pub use git::{DiffRange, GitDiff};

use thiserror::Error;

/// Errors that can occur while listing changed files.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("VCS operation failed: {0}")]
    CommandFailed(String),
}

pub type Result<T> = std::result::Result<T, VcsError>;

/// Source of the repository-relative paths touched by a change.
pub trait ChangedFiles {
    /// Changed paths, in the order the source reports them.
    fn changed_files(&self) -> Result<Vec<String>>;

    /// Source display name (for logs).
    fn name(&self) -> &str;
}

/// A fixed list of changed paths.
#[derive(Debug, Clone, Default)]
pub struct StaticChangedFiles {
    paths: Vec<String>,
}

impl StaticChangedFiles {
    /// Blank entries are dropped and surrounding whitespace trimmed.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: parse_name_list(paths),
        }
    }
}

impl ChangedFiles for StaticChangedFiles {
    fn changed_files(&self) -> Result<Vec<String>> {
        Ok(self.paths.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Trim each line and drop empty ones.
pub(crate) fn parse_name_list<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
