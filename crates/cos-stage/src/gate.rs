// gate.rs — The stage gate: load spec → check artifacts → thresholds → report.
//
// Every failure maps to exit code 1. Callers that need to tell a missing
// artifact from a missed threshold look at `StageVerdict::failure`.

use chrono::{DateTime, Utc};
use cos_gate::{EvaluationStep, FailureCode, GateResult, ReportError, Reporter};
use serde::Serialize;

use crate::artifacts::missing_artifacts;
use crate::config::StageGateConfig;
use crate::error::StageError;
use crate::evidence::{EvidenceDir, EvidenceSource};
use crate::stage::{Stage, StageSpec};
use crate::thresholds::{evaluate_thresholds, ThresholdReport};

/// Output key holding `passed` / `failed`.
pub const OUTPUT_KEY: &str = "stage_status";

/// Why a stage failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StageFailure {
    MissingArtifacts(Vec<String>),
    ThresholdsNotMet(Stage),
}

/// Everything the stage gate decided for one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageVerdict {
    pub stage_name: String,
    pub result: GateResult,
    pub failure: Option<StageFailure>,
    /// `None` when thresholds were not evaluated (artifacts missing, or no table for the stage).
    pub thresholds: Option<ThresholdReport>,
    pub steps: Vec<EvaluationStep>,
}

/// Evaluate an already-loaded stage spec against an evidence source.
pub fn evaluate_spec<E: EvidenceSource>(spec: &StageSpec, evidence: &E) -> StageVerdict {
    let stage_name = spec.stage_name.clone();
    let mut steps = Vec::new();

    let missing = missing_artifacts(&spec.required_artifacts, evidence);
    if !missing.is_empty() {
        let message = format!(
            "Missing required artifacts under evidence/: {}",
            quoted_list(&missing)
        );
        tracing::info!(stage = %stage_name, missing = missing.len(), "stage artifacts missing");
        steps.push(EvaluationStep::failed("artifacts_present", &message));
        return StageVerdict {
            stage_name,
            result: GateResult::fail(FailureCode::Fatal, None, message),
            failure: Some(StageFailure::MissingArtifacts(missing)),
            thresholds: None,
            steps,
        };
    }
    steps.push(EvaluationStep::passed("artifacts_present"));

    let Some(stage) = spec.stage() else {
        tracing::warn!(
            stage = %stage_name,
            "no thresholds defined for stage; only artifact presence was checked"
        );
        steps.push(EvaluationStep {
            check: "thresholds".to_string(),
            outcome: "skipped: no thresholds defined for this stage".to_string(),
            terminal: false,
        });
        return passed(stage_name, None, steps);
    };

    let report = evaluate_thresholds(stage, evidence);
    if !report.met {
        let message = report.failure_message();
        steps.push(EvaluationStep::failed("thresholds", &message));
        return StageVerdict {
            stage_name,
            result: GateResult::fail(FailureCode::Fatal, None, message),
            failure: Some(StageFailure::ThresholdsNotMet(stage)),
            thresholds: Some(report),
            steps,
        };
    }
    steps.push(EvaluationStep::passed("thresholds"));
    passed(stage_name, Some(report), steps)
}

/// `['a.json', 'b.json']`: names single-quoted, or double-quoted when
/// they contain a single quote and no double quote.
fn quoted_list(names: &[String]) -> String {
    let items: Vec<String> = names
        .iter()
        .map(|name| {
            let escaped = name.replace('\\', "\\\\");
            if name.contains('\'') && !name.contains('"') {
                format!("\"{}\"", escaped)
            } else {
                format!("'{}'", escaped.replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn passed(
    stage_name: String,
    thresholds: Option<ThresholdReport>,
    steps: Vec<EvaluationStep>,
) -> StageVerdict {
    let message = format!("Stage Gate Check passed for {}.", stage_name);
    StageVerdict {
        stage_name,
        result: GateResult::pass(None, message),
        failure: None,
        thresholds,
        steps,
    }
}

/// Load the spec for `stage_name` and evaluate it against `<venture>/evidence`.
///
/// Errors are configuration/input problems (no stage name, no spec file);
/// evidence problems come back as a failed verdict.
pub fn evaluate_stage(stage_name: &str, config: &StageGateConfig) -> Result<StageVerdict, StageError> {
    let spec = StageSpec::load_for(stage_name, config)?;
    let evidence = EvidenceDir::new(config.evidence_dir());
    tracing::info!(
        stage = %spec.stage_name,
        artifacts = spec.required_artifacts.len(),
        evidence = %evidence.root().display(),
        "evaluating stage gate"
    );
    Ok(evaluate_spec(&spec, &evidence))
}

#[derive(Debug, Serialize)]
struct StageSummary<'a> {
    stage: &'a str,
    passed: bool,
    failure: &'a Option<StageFailure>,
    thresholds: &'a Option<ThresholdReport>,
    steps: &'a [EvaluationStep],
    evaluated_at: DateTime<Utc>,
}

/// Publish a verdict: summary group, then the error line or the pass line.
pub fn report<R: Reporter>(verdict: &StageVerdict, reporter: &mut R) -> Result<(), ReportError> {
    let summary = StageSummary {
        stage: &verdict.stage_name,
        passed: verdict.result.passed(),
        failure: &verdict.failure,
        thresholds: &verdict.thresholds,
        steps: &verdict.steps,
        evaluated_at: Utc::now(),
    };
    reporter.summary("Stage Gate Summary", &summary)?;

    let status = if verdict.result.passed() { "passed" } else { "failed" };
    reporter.publish(OUTPUT_KEY, status)?;
    if verdict.result.passed() {
        reporter.info(verdict.result.message())
    } else {
        reporter.error(verdict.result.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{EvidenceDocument, InMemoryEvidence};
    use cos_gate::RecordingReporter;

    fn spec(stage: &str, artifacts: &[&str]) -> StageSpec {
        StageSpec::new(stage, artifacts.iter().map(|s| s.to_string()).collect())
    }

    fn doc(metrics: &[(&str, f64)]) -> EvidenceDocument {
        metrics.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn missing_artifacts_fail_before_thresholds() {
        let evidence = InMemoryEvidence::new().with_artifact("e2e-report.json");
        let verdict = evaluate_spec(
            &spec("BUILD", &["e2e-report.json", "activation-metrics.json", "demo.mp4"]),
            &evidence,
        );
        assert_eq!(verdict.result.exit_code(), 1);
        assert_eq!(
            verdict.failure,
            Some(StageFailure::MissingArtifacts(vec![
                "activation-metrics.json".to_string(),
                "demo.mp4".to_string()
            ]))
        );
        assert_eq!(
            verdict.result.message(),
            "Missing required artifacts under evidence/: ['activation-metrics.json', 'demo.mp4']"
        );
        assert!(verdict.thresholds.is_none());
    }

    #[test]
    fn artifact_names_are_single_quoted() {
        let names = vec!["it's.json".to_string(), "a\"b'.json".to_string(), r"x\y".to_string()];
        assert_eq!(
            quoted_list(&names),
            r#"["it's.json", 'a"b\'.json', 'x\\y']"#
        );
        assert_eq!(quoted_list(&[]), "[]");
    }

    #[test]
    fn val_passes_on_signups_alone() {
        let evidence = InMemoryEvidence::new().with_document(
            "landing-metrics.json",
            doc(&[("waitlist_signups", 150.0), ("qualified_leads", 0.0), ("paid_pilots", 0.0)]),
        );
        let verdict = evaluate_spec(&spec("VAL", &["landing-metrics.json"]), &evidence);
        assert!(verdict.result.passed());
        assert_eq!(verdict.result.message(), "Stage Gate Check passed for VAL.");
    }

    #[test]
    fn threshold_miss_shares_the_fatal_code() {
        let evidence = InMemoryEvidence::new()
            .with_document("e2e-report.json", doc(&[("pass_rate", 0.95)]))
            .with_document("activation-metrics.json", doc(&[("activation_rate", 0.15)]));
        let verdict = evaluate_spec(
            &spec("BUILD", &["e2e-report.json", "activation-metrics.json"]),
            &evidence,
        );
        assert_eq!(verdict.result.failure_code(), Some(FailureCode::Fatal));
        assert_eq!(verdict.failure, Some(StageFailure::ThresholdsNotMet(Stage::Build)));
    }

    #[test]
    fn spec_without_documents_uses_defaults() {
        // No artifacts required and no documents at all: thresholds read defaults and fail.
        let verdict = evaluate_spec(&spec("LAUNCH", &[]), &InMemoryEvidence::new());
        assert!(!verdict.result.passed());
        let report = verdict.thresholds.unwrap();
        assert!(report.checks.iter().all(|c| c.defaulted));
    }

    #[test]
    fn unknown_stage_only_checks_artifacts() {
        let evidence = InMemoryEvidence::new().with_artifact("board-deck.pdf");
        let verdict = evaluate_spec(&spec("SCALE", &["board-deck.pdf"]), &evidence);
        assert!(verdict.result.passed());
        assert!(verdict.thresholds.is_none());
        assert!(verdict.steps[1].outcome.starts_with("skipped"));
    }

    #[test]
    fn report_writes_status_and_error() {
        let verdict = evaluate_spec(&spec("GROW", &[]), &InMemoryEvidence::new());
        let mut reporter = RecordingReporter::new();
        report(&verdict, &mut reporter).unwrap();
        assert_eq!(reporter.output(OUTPUT_KEY), Some("failed"));
        assert_eq!(
            reporter.errors,
            vec!["GROW thresholds not met (retention_dN>=0.3 AND payback_months<=6).".to_string()]
        );
        assert_eq!(reporter.groups[0].0, "Stage Gate Summary");
    }

    #[test]
    fn evaluation_is_idempotent() {
        let evidence = InMemoryEvidence::new()
            .with_document("uptime-report.json", doc(&[("uptime", 0.999)]))
            .with_document("cac-microtest.json", doc(&[("cac", 8.0)]));
        let s = spec("LAUNCH", &["uptime-report.json", "cac-microtest.json"]);
        let first = evaluate_spec(&s, &evidence);
        let second = evaluate_spec(&s, &evidence);
        assert_eq!(first, second);
        assert!(first.result.passed());
    }
}
