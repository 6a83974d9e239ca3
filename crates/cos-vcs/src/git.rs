//! `git diff --name-only` over a change's revision range

use std::path::PathBuf;
use std::process::Command;

use crate::{parse_name_list, ChangedFiles, Result, VcsError};

/// Which revisions to diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRange {
    /// `<base>...<head>`: changes on head since it forked from base.
    Revisions { base: String, head: String },
    /// `origin/<branch>...`: changes on the checkout since the default branch.
    DefaultBranch(String),
}

impl DiffRange {
    /// Pick the explicit range when both revisions are known, else fall back
    /// to the default branch.
    pub fn resolve(base: Option<&str>, head: Option<&str>, default_branch: &str) -> Self {
        match (base, head) {
            (Some(base), Some(head)) if !base.is_empty() && !head.is_empty() => {
                DiffRange::Revisions {
                    base: base.to_string(),
                    head: head.to_string(),
                }
            }
            _ => DiffRange::DefaultBranch(default_branch.to_string()),
        }
    }

    /// The revision argument passed to `git diff`.
    pub fn spec(&self) -> String {
        match self {
            DiffRange::Revisions { base, head } => format!("{}...{}", base, head),
            DiffRange::DefaultBranch(branch) => format!("origin/{}...", branch),
        }
    }
}

/// Changed files of a working tree, from `git diff`.
pub struct GitDiff {
    /// Working directory for git operations
    work_dir: PathBuf,
    range: DiffRange,
}

impl GitDiff {
    pub fn new(work_dir: impl Into<PathBuf>, range: DiffRange) -> Self {
        Self {
            work_dir: work_dir.into(),
            range,
        }
    }

    /// Run a git command in the working directory
    fn git_cmd(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.work_dir)
            .args(args)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::CommandFailed(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ChangedFiles for GitDiff {
    fn changed_files(&self) -> Result<Vec<String>> {
        let spec = self.range.spec();
        tracing::info!(
            "GitDiff: listing changed files in {} ({})",
            self.work_dir.display(),
            spec
        );
        let out = self.git_cmd(&["diff", "--name-only", &spec])?;
        let files = parse_name_list(out.lines());
        tracing::debug!(count = files.len(), "GitDiff: changed files listed");
        Ok(files)
    }

    fn name(&self) -> &str {
        "git"
    }
}
