// settings.rs — Optional cos.toml settings file.
//
// Precedence for every value: command-line flag / environment variable,
// then cos.toml, then the built-in project layout. A missing cos.toml is
// fine; a malformed one is a configuration error.
//
//   [policy]
//   policy_path = "policy/policy.yaml"
//   target_repo = "../app"
//   default_branch = "main"
//
//   [stage]
//   l0_path = "l0"
//   venture_path = "venture"

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_FILE: &str = "cos.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub policy: PolicySettings,

    #[serde(default)]
    pub stage: StageSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySettings {
    pub policy_path: Option<PathBuf>,
    pub target_repo: Option<PathBuf>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSettings {
    pub l0_path: Option<PathBuf>,
    pub venture_path: Option<PathBuf>,
}

impl Settings {
    /// Parse settings; relative paths are taken relative to `project_root`.
    pub fn from_toml_str(content: &str, project_root: &Path) -> anyhow::Result<Self> {
        let mut settings: Settings = toml::from_str(content)?;
        let anchor = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = project_root.join(&*path);
                }
            }
        };
        anchor(&mut settings.policy.policy_path);
        anchor(&mut settings.policy.target_repo);
        anchor(&mut settings.stage.l0_path);
        anchor(&mut settings.stage.venture_path);
        Ok(settings)
    }

    /// Load settings if the file exists, otherwise use defaults.
    pub fn load_optional(path: &Path, project_root: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content, project_root)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}
