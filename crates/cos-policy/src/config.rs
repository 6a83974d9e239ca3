// config.rs — Change policy gate configuration.
//
// Everything the gate used to read from process environment lives here,
// resolved once by the binary and passed in explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for one change policy gate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyGateConfig {
    /// Path to policy.yaml.
    pub policy_path: PathBuf,

    /// Working tree of the repository under review.
    pub target_repo: PathBuf,

    /// Step output file (GITHUB_OUTPUT); `None` skips publishing.
    pub output_file: Option<PathBuf>,

    /// Base revision of the change, when known.
    pub base_sha: Option<String>,

    /// Head revision of the change, when known.
    pub head_sha: Option<String>,

    /// Branch compared against when base/head are unknown.
    pub default_branch: String,
}

impl PolicyGateConfig {
    /// Standard layout: `<root>/policy/policy.yaml`, reviewing the current directory.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        Self {
            policy_path: root.join("policy").join("policy.yaml"),
            target_repo: PathBuf::from("."),
            output_file: None,
            base_sha: None,
            head_sha: None,
            default_branch: "main".to_string(),
        }
    }

    /// `(base, head)` when both revisions are known.
    pub fn revision_range(&self) -> Option<(&str, &str)> {
        match (self.base_sha.as_deref(), self.head_sha.as_deref()) {
            (Some(base), Some(head)) if !base.is_empty() && !head.is_empty() => Some((base, head)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_layout_defaults() {
        let config = PolicyGateConfig::for_project("/srv/cos");
        assert_eq!(config.policy_path, PathBuf::from("/srv/cos/policy/policy.yaml"));
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.revision_range(), None);
    }

    #[test]
    fn revision_range_needs_both_ends() {
        let mut config = PolicyGateConfig::for_project(".");
        config.base_sha = Some("abc".to_string());
        assert_eq!(config.revision_range(), None);
        config.head_sha = Some(String::new());
        assert_eq!(config.revision_range(), None);
        config.head_sha = Some("def".to_string());
        assert_eq!(config.revision_range(), Some(("abc", "def")));
    }
}
