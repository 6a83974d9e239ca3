// config.rs — Stage gate configuration.
//
// The stage gate reads two trees: the control repo (stage specs) and the
// venture repo (evidence). `StageGateConfig` pins both down explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for one stage gate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageGateConfig {
    /// Control repo checkout holding `stage-gates/`.
    pub l0_path: PathBuf,

    /// Venture repo checkout holding `evidence/`.
    pub venture_path: PathBuf,

    /// Step output file (GITHUB_OUTPUT); `None` skips publishing.
    pub output_file: Option<PathBuf>,
}

impl Default for StageGateConfig {
    fn default() -> Self {
        Self::new("l0", "venture")
    }
}

impl StageGateConfig {
    pub fn new(l0_path: impl AsRef<Path>, venture_path: impl AsRef<Path>) -> Self {
        Self {
            l0_path: l0_path.as_ref().to_path_buf(),
            venture_path: venture_path.as_ref().to_path_buf(),
            output_file: None,
        }
    }

    /// `<l0>/stage-gates/<stage>.yaml`
    pub fn stage_spec_path(&self, stage: &str) -> PathBuf {
        self.l0_path.join("stage-gates").join(format!("{}.yaml", stage))
    }

    /// `<venture>/evidence`
    pub fn evidence_dir(&self) -> PathBuf {
        self.venture_path.join("evidence")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths() {
        let config = StageGateConfig::new("/ci/l0", "/ci/venture");
        assert_eq!(
            config.stage_spec_path("BUILD"),
            PathBuf::from("/ci/l0/stage-gates/BUILD.yaml")
        );
        assert_eq!(config.evidence_dir(), PathBuf::from("/ci/venture/evidence"));
    }

    #[test]
    fn default_roots() {
        let config = StageGateConfig::default();
        assert_eq!(config.l0_path, PathBuf::from("l0"));
        assert_eq!(config.venture_path, PathBuf::from("venture"));
        assert_eq!(config.output_file, None);
    }
}
