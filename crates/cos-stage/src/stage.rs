// stage.rs — Known stages and the per-stage spec file.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::StageGateConfig;
use crate::error::StageError;

/// Milestones with hardcoded metric thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Val,
    Build,
    Launch,
    Grow,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Val, Stage::Build, Stage::Launch, Stage::Grow];

    /// Exact, case-sensitive lookup; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Val => "VAL",
            Stage::Build => "BUILD",
            Stage::Launch => "LAUNCH",
            Stage::Grow => "GROW",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// On-disk shape of `stage-gates/<STAGE>.yaml`.
#[derive(Debug, Default, Deserialize)]
struct StageSpecFile {
    #[serde(default)]
    artifacts: Option<Vec<String>>,
}

/// Requirements for one named stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSpec {
    pub stage_name: String,
    /// Evidence file names, relative to the evidence root.
    pub required_artifacts: Vec<String>,
}

impl StageSpec {
    pub fn new(stage_name: impl Into<String>, required_artifacts: Vec<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            required_artifacts,
        }
    }

    /// The hardcoded stage for this spec, if any.
    pub fn stage(&self) -> Option<Stage> {
        Stage::from_name(&self.stage_name)
    }

    /// Parse spec YAML. An empty document or `artifacts: null` means no artifacts.
    pub fn from_yaml_str(stage_name: &str, content: &str, origin: &str) -> Result<Self, StageError> {
        let file: Option<StageSpecFile> =
            serde_yaml::from_str(content).map_err(|source| StageError::Yaml {
                path: origin.to_string(),
                source,
            })?;
        let required_artifacts = file.and_then(|f| f.artifacts).unwrap_or_default();
        Ok(Self::new(stage_name, required_artifacts))
    }

    pub fn load(path: &Path, stage_name: &str) -> Result<Self, StageError> {
        if !path.exists() {
            return Err(StageError::SpecNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| StageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(stage_name, &content, &path.display().to_string())
    }

    /// Load the spec for `stage_name` from the configured control repo.
    pub fn load_for(stage_name: &str, config: &StageGateConfig) -> Result<Self, StageError> {
        let stage_name = stage_name.trim();
        if stage_name.is_empty() {
            return Err(StageError::MissingStageName);
        }
        Self::load(&config.stage_spec_path(stage_name), stage_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn stage_names_are_exact() {
        assert_eq!(Stage::from_name("VAL"), Some(Stage::Val));
        assert_eq!(Stage::from_name("GROW"), Some(Stage::Grow));
        assert_eq!(Stage::from_name("val"), None);
        assert_eq!(Stage::from_name("SCALE"), None);
        assert_eq!(Stage::Launch.to_string(), "LAUNCH");
    }

    #[test]
    fn parses_artifact_list() {
        let spec = StageSpec::from_yaml_str(
            "BUILD",
            "artifacts:\n  - e2e-report.json\n  - activation-metrics.json\n",
            "BUILD.yaml",
        )
        .unwrap();
        assert_eq!(spec.stage(), Some(Stage::Build));
        assert_eq!(
            spec.required_artifacts,
            vec!["e2e-report.json".to_string(), "activation-metrics.json".to_string()]
        );
    }

    #[test]
    fn empty_spec_has_no_artifacts() {
        assert!(StageSpec::from_yaml_str("VAL", "", "VAL.yaml")
            .unwrap()
            .required_artifacts
            .is_empty());
        assert!(StageSpec::from_yaml_str("VAL", "artifacts:\n", "VAL.yaml")
            .unwrap()
            .required_artifacts
            .is_empty());
    }

    #[test]
    fn load_for_rejects_blank_stage() {
        let config = StageGateConfig::default();
        assert!(matches!(
            StageSpec::load_for("  ", &config),
            Err(StageError::MissingStageName)
        ));
    }

    #[test]
    fn load_for_reports_missing_spec_file() {
        let dir = tempdir().unwrap();
        let config = StageGateConfig::new(dir.path(), dir.path());
        let err = StageSpec::load_for("VAL", &config).unwrap_err();
        assert!(matches!(err, StageError::SpecNotFound { .. }));
        assert!(err.to_string().starts_with("Stage file not found: "));
        assert!(err.to_string().ends_with("VAL.yaml"));
    }

    #[test]
    fn load_for_reads_spec_from_stage_gates_dir() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("stage-gates")).unwrap();
        std::fs::write(
            dir.path().join("stage-gates/SCALE.yaml"),
            "artifacts: [board-deck.pdf]\n",
        )
        .unwrap();
        let config = StageGateConfig::new(dir.path(), dir.path());
        let spec = StageSpec::load_for("SCALE", &config).unwrap();
        assert_eq!(spec.stage(), None);
        assert_eq!(spec.required_artifacts, vec!["board-deck.pdf".to_string()]);
    }
}
