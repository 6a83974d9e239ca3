// comparator.rs — Declared-vs-inferred level checks.
//
// The checks run in a fixed order and stop at the first failure:
//
// 1. manifest_present  → code 2 when a manifest is required but missing
// 2. level_allowed     → code 3 when the declared level is not allow-listed
// 3. not_under_declared→ code 4 when declared is less restrictive than inferred
// 4. tests_present     → code 5 when P1/P2 code changed without any test change
//
// Each check is a named predicate over a `CheckContext`; the comparator
// walks the list and records one `EvaluationStep` per check it ran.

use cos_gate::{EvaluationStep, FailureCode, GateResult, Level};

use crate::coverage;
use crate::manifest::Declaration;
use crate::policy::Policy;

/// Inputs shared by every check.
struct CheckContext<'a> {
    declared: &'a Declaration,
    inferred: Level,
    changed: &'a [String],
    policy: &'a Policy,
}

type Check = fn(&CheckContext<'_>) -> Option<GateResult>;

/// The ordered check list. A check returns `Some(result)` to fail the gate.
const CHECKS: &[(&str, Check)] = &[
    ("manifest_present", check_manifest_present),
    ("level_allowed", check_level_allowed),
    ("not_under_declared", check_not_under_declared),
    ("tests_present", check_tests_present),
];

/// Verdict of the comparator with the trail of checks that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub result: GateResult,
    pub steps: Vec<EvaluationStep>,
}

/// Compare a declaration against the inferred level under `policy`.
pub fn compare(
    declared: &Declaration,
    inferred: Level,
    changed: &[String],
    policy: &Policy,
) -> Comparison {
    let ctx = CheckContext {
        declared,
        inferred,
        changed,
        policy,
    };
    let mut steps = Vec::with_capacity(CHECKS.len());

    for (name, check) in CHECKS {
        match check(&ctx) {
            Some(result) => {
                tracing::info!(check = name, code = result.exit_code(), "policy check failed");
                steps.push(EvaluationStep::failed(name, result.message()));
                return Comparison { result, steps };
            }
            None => steps.push(EvaluationStep::passed(name)),
        }
    }

    let level = declared.level().unwrap_or(inferred);
    Comparison {
        result: GateResult::pass(Some(level), "Policy gate passed."),
        steps,
    }
}

fn check_manifest_present(ctx: &CheckContext<'_>) -> Option<GateResult> {
    if ctx.policy.rules.require_change_manifest && ctx.declared.is_missing() {
        return Some(GateResult::fail(
            FailureCode::MissingManifest,
            Some(ctx.inferred),
            "Missing change.yaml manifest.",
        ));
    }
    None
}

fn check_level_allowed(ctx: &CheckContext<'_>) -> Option<GateResult> {
    let allowed = ctx
        .declared
        .level()
        .is_some_and(|l| ctx.policy.rules.allowed_change_levels.contains(&l));
    if allowed {
        return None;
    }
    Some(GateResult::fail(
        FailureCode::LevelNotAllowed,
        ctx.declared.level(),
        format!("Declared level {} not allowed.", ctx.declared.describe()),
    ))
}

fn check_not_under_declared(ctx: &CheckContext<'_>) -> Option<GateResult> {
    let declared = ctx.declared.level()?;
    if declared.is_less_restrictive_than(ctx.inferred) {
        return Some(GateResult::fail(
            FailureCode::UnderDeclared,
            Some(ctx.inferred),
            format!(
                "Declared level {} is less restrictive than inferred {}.",
                declared, ctx.inferred
            ),
        ));
    }
    None
}

fn check_tests_present(ctx: &CheckContext<'_>) -> Option<GateResult> {
    let declared = ctx.declared.level()?;
    if !ctx.policy.rules.require_tests_on_p1 || declared == Level::P0 {
        return None;
    }
    if coverage::requires_tests(ctx.changed, &ctx.policy.rules.code_patterns) {
        return Some(GateResult::fail(
            FailureCode::MissingTests,
            Some(declared),
            "P1+ code change without corresponding tests/** updates.",
        ));
    }
    None
}
