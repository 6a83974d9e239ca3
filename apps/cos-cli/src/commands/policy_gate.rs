// policy_gate.rs — `cos policy-gate`: classify the change, check change.yaml.
//
// Changed paths come from `git diff` over the change's revision range unless
// an explicit list is given with --changed-file / --changed-from.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use cos_gate::WorkflowReporter;
use cos_policy::{Manifest, Policy, PolicyGateConfig};
use cos_vcs::{ChangedFiles, DiffRange, GitDiff, StaticChangedFiles};

use crate::settings::PolicySettings;

#[derive(Args, Debug, Default)]
pub struct PolicyGateArgs {
    /// Path to policy.yaml (default: <project-root>/policy/policy.yaml).
    #[arg(long, env = "COS_POLICY_PATH")]
    pub policy: Option<PathBuf>,

    /// Working tree of the repository under review.
    #[arg(long, env = "TARGET_REPO_PATH")]
    pub target_repo: Option<PathBuf>,

    /// File receiving `policy_level=<level>`.
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Base revision of the change (falls back to PR_BASE_SHA).
    #[arg(long, env = "GITHUB_BASE_SHA")]
    pub base: Option<String>,

    /// Head revision of the change (falls back to PR_HEAD_SHA).
    #[arg(long, env = "GITHUB_SHA")]
    pub head: Option<String>,

    /// Branch to diff against when base/head are unknown.
    #[arg(long, env = "DEFAULT_BRANCH")]
    pub default_branch: Option<String>,

    /// Changed path; repeat for several. Skips git.
    #[arg(long = "changed-file")]
    pub changed_files: Vec<String>,

    /// File listing changed paths, one per line. Skips git.
    #[arg(long)]
    pub changed_from: Option<PathBuf>,
}

impl PolicyGateArgs {
    /// Flags/env over cos.toml over the project layout.
    pub fn resolve(&self, project_root: &Path, settings: &PolicySettings) -> PolicyGateConfig {
        let mut config = PolicyGateConfig::for_project(project_root);
        if let Some(path) = self.policy.clone().or_else(|| settings.policy_path.clone()) {
            config.policy_path = path;
        }
        if let Some(repo) = self.target_repo.clone().or_else(|| settings.target_repo.clone()) {
            config.target_repo = repo;
        }
        if let Some(branch) = non_empty(self.default_branch.clone())
            .or_else(|| non_empty(settings.default_branch.clone()))
        {
            config.default_branch = branch;
        }
        config.output_file = self.output.clone().filter(|p| !p.as_os_str().is_empty());
        config.base_sha = non_empty(self.base.clone()).or_else(|| env_var("PR_BASE_SHA"));
        config.head_sha = non_empty(self.head.clone()).or_else(|| env_var("PR_HEAD_SHA"));
        config
    }

    fn explicit_changes(&self) -> anyhow::Result<Option<StaticChangedFiles>> {
        if self.changed_files.is_empty() && self.changed_from.is_none() {
            return Ok(None);
        }
        let mut paths = self.changed_files.clone();
        if let Some(list) = &self.changed_from {
            let content = std::fs::read_to_string(list)
                .with_context(|| format!("failed to read changed-file list {}", list.display()))?;
            paths.extend(content.lines().map(str::to_string));
        }
        Ok(Some(StaticChangedFiles::new(paths)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

pub fn execute(
    args: &PolicyGateArgs,
    settings: &crate::settings::Settings,
    project_root: &Path,
) -> anyhow::Result<u8> {
    let config = args.resolve(project_root, &settings.policy);
    let policy = Policy::load(&config.policy_path).context("failed to load policy")?;

    let changed = match args.explicit_changes()? {
        Some(source) => list_changes(&source)?,
        None => {
            let (base, head) = match config.revision_range() {
                Some((base, head)) => (Some(base), Some(head)),
                None => (None, None),
            };
            let range = DiffRange::resolve(base, head, &config.default_branch);
            list_changes(&GitDiff::new(&config.target_repo, range))?
        }
    };

    let manifest = Manifest::discover(&config.target_repo).context("failed to read change manifest")?;
    let verdict = cos_policy::evaluate(&changed, &policy, &manifest);

    let mut reporter = WorkflowReporter::new(std::io::stdout(), config.output_file.clone());
    cos_policy::report(&verdict, &changed, &policy, &mut reporter)?;
    Ok(verdict.result.exit_code())
}

fn list_changes<C: ChangedFiles>(source: &C) -> anyhow::Result<Vec<String>> {
    let changed = source
        .changed_files()
        .with_context(|| format!("failed to list changed files ({})", source.name()))?;
    tracing::info!(source = source.name(), count = changed.len(), "changed files collected");
    Ok(changed)
}
