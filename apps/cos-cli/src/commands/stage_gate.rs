// stage_gate.rs — `cos stage-gate`: evidence artifacts and thresholds for one stage.

use std::path::{Path, PathBuf};

use clap::Args;
use cos_gate::WorkflowReporter;
use cos_stage::StageGateConfig;

use crate::settings::{Settings, StageSettings};

#[derive(Args, Debug, Default)]
pub struct StageGateArgs {
    /// Stage name, e.g. VAL, BUILD, LAUNCH, GROW.
    #[arg(long, env = "STAGE")]
    pub stage: Option<String>,

    /// Control repo checkout holding stage-gates/.
    #[arg(long, env = "L0_PATH")]
    pub l0: Option<PathBuf>,

    /// Venture repo checkout holding evidence/.
    #[arg(long, env = "VENTURE_PATH")]
    pub venture: Option<PathBuf>,

    /// File receiving `stage_status=passed|failed`.
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,
}

impl StageGateArgs {
    pub fn resolve(&self, project_root: &Path, settings: &StageSettings) -> StageGateConfig {
        let l0 = self
            .l0
            .clone()
            .or_else(|| settings.l0_path.clone())
            .unwrap_or_else(|| project_root.join("l0"));
        let venture = self
            .venture
            .clone()
            .or_else(|| settings.venture_path.clone())
            .unwrap_or_else(|| project_root.join("venture"));
        let mut config = StageGateConfig::new(l0, venture);
        config.output_file = self.output.clone().filter(|p| !p.as_os_str().is_empty());
        config
    }
}

pub fn execute(args: &StageGateArgs, settings: &Settings, project_root: &Path) -> anyhow::Result<u8> {
    let config = args.resolve(project_root, &settings.stage);
    let stage = args.stage.as_deref().unwrap_or_default();
    let verdict = cos_stage::evaluate_stage(stage, &config)?;

    let mut reporter = WorkflowReporter::new(std::io::stdout(), config.output_file.clone());
    cos_stage::report(&verdict, &mut reporter)?;
    Ok(verdict.result.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_under_project_root() {
        let config = StageGateArgs::default().resolve(Path::new("/proj"), &StageSettings::default());
        assert_eq!(config.l0_path, PathBuf::from("/proj/l0"));
        assert_eq!(config.venture_path, PathBuf::from("/proj/venture"));
    }

    #[test]
    fn flags_beat_settings() {
        let args = StageGateArgs {
            venture: Some(PathBuf::from("/checkout/venture")),
            ..Default::default()
        };
        let settings = StageSettings {
            l0_path: Some(PathBuf::from("/checkout/l0")),
            venture_path: Some(PathBuf::from("/ignored")),
        };
        let config = args.resolve(Path::new("."), &settings);
        assert_eq!(config.l0_path, PathBuf::from("/checkout/l0"));
        assert_eq!(config.venture_path, PathBuf::from("/checkout/venture"));
    }

    #[test]
    fn missing_stage_name_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(&StageGateArgs::default(), &Settings::default(), dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "STAGE input is required.");
    }
}
