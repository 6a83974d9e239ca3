// gate.rs — The change policy gate: classify → compare → report.
//
// `evaluate()` is pure: it takes already-loaded inputs and returns a
// `PolicyVerdict`. `report()` pushes that verdict through a `Reporter`:
// the summary block first, then the error line (if any), then the level
// output, which is published whether or not the gate passed.

use chrono::{DateTime, Utc};
use cos_gate::{EvaluationStep, GateResult, Level, ReportError, Reporter};
use serde::Serialize;

use crate::classifier::{classify_with_match, Classification};
use crate::comparator::compare;
use crate::manifest::{Declaration, Manifest};
use crate::policy::{Policy, PolicyRules};

/// Output key consumed by the labelling / auto-merge workflow step.
pub const OUTPUT_KEY: &str = "policy_level";

/// Everything the change policy gate decided for one change.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyVerdict {
    pub result: GateResult,
    pub classification: Classification,
    pub declared: Declaration,
    pub steps: Vec<EvaluationStep>,
}

impl PolicyVerdict {
    pub fn inferred(&self) -> Level {
        self.classification.level
    }

    /// Value handed to the pipeline: the verdict's level; with no level, an
    /// unrecognized declaration verbatim, else the inferred level.
    pub fn published_level(&self) -> String {
        match (self.result.level(), &self.declared) {
            (Some(level), _) => level.to_string(),
            (None, Declaration::Unrecognized(raw)) => raw.clone(),
            (None, _) => self.classification.level.to_string(),
        }
    }
}

/// Run the change policy gate over one change.
pub fn evaluate(changed: &[String], policy: &Policy, manifest: &Manifest) -> PolicyVerdict {
    let classification = classify_with_match(changed, policy);
    tracing::info!(
        inferred = %classification.level,
        declared = %manifest.declared.describe(),
        files = changed.len(),
        "evaluating change policy"
    );

    let mut steps = vec![EvaluationStep {
        check: "classify".to_string(),
        outcome: match (&classification.path, &classification.pattern) {
            (Some(path), Some(pattern)) => format!(
                "{}: '{}' matched '{}'",
                classification.level, path, pattern
            ),
            _ => format!("{}: no pattern matched (default)", classification.level),
        },
        terminal: false,
    }];

    let comparison = compare(&manifest.declared, classification.level, changed, policy);
    steps.extend(comparison.steps);

    PolicyVerdict {
        result: comparison.result,
        classification,
        declared: manifest.declared.clone(),
        steps,
    }
}

/// JSON block printed in the workflow log.
#[derive(Debug, Serialize)]
struct PolicySummary<'a> {
    changed_files: &'a [String],
    inferred_level: Level,
    declared_level: Option<String>,
    policy_rules: &'a PolicyRules,
    steps: &'a [EvaluationStep],
    evaluated_at: DateTime<Utc>,
}

/// Publish a verdict: summary group, error line, level output, pass line.
pub fn report<R: Reporter>(
    verdict: &PolicyVerdict,
    changed: &[String],
    policy: &Policy,
    reporter: &mut R,
) -> Result<(), ReportError> {
    let summary = PolicySummary {
        changed_files: changed,
        inferred_level: verdict.inferred(),
        declared_level: (!verdict.declared.is_missing()).then(|| verdict.declared.describe()),
        policy_rules: &policy.rules,
        steps: &verdict.steps,
        evaluated_at: Utc::now(),
    };
    reporter.summary("Policy Gate Summary", &summary)?;

    if !verdict.result.passed() {
        reporter.error(verdict.result.message())?;
    }
    reporter.publish(OUTPUT_KEY, &verdict.published_level())?;
    if verdict.result.passed() {
        reporter.info(verdict.result.message())?;
    }
    Ok(())
}
