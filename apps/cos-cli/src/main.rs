//! # cos-cli
//!
//! Command-line entry point for the delivery gates:
//! - `cos policy-gate` — classify a pull request's changes and check its change manifest
//! - `cos stage-gate` — check a milestone's evidence artifacts and metric thresholds
//! - `cos serve` — HTTP health endpoint
//!
//! Gate verdicts go to stdout as workflow commands; diagnostics go to stderr.
//! The exit code is the gate's failure code (0 on pass, 1 on any fatal error).

mod commands;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use settings::Settings;

/// cos — delivery gates for pull requests and milestones.
#[derive(Parser)]
#[command(name = "cos", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, global = true, default_value = ".")]
    project_root: PathBuf,

    /// Settings file (defaults to <project-root>/cos.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit diagnostic logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the change policy gate for the current change.
    PolicyGate(commands::policy_gate::PolicyGateArgs),
    /// Evaluate the stage gate for one milestone.
    StageGate(commands::stage_gate::StageGateArgs),
    /// Serve the health endpoint.
    Serve(commands::serve::ServeArgs),
}

const DEFAULT_LOG_DIRECTIVES: &str = "cos=info,cos_gate=info,cos_policy=info,cos_stage=info,cos_vcs=info";

fn init_tracing(json: bool) {
    // Logs go to stderr so they don't interfere with workflow commands on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.project_root.join(settings::DEFAULT_FILE));
    let settings = Settings::load_optional(&settings_path, &cli.project_root)?;

    match &cli.command {
        Commands::PolicyGate(args) => {
            commands::policy_gate::execute(args, &settings, &cli.project_root)
        }
        Commands::StageGate(args) => commands::stage_gate::execute(args, &settings, &cli.project_root),
        Commands::Serve(args) => commands::serve::execute(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            println!("::error::{:#}", e);
            ExitCode::FAILURE
        }
    }
}
