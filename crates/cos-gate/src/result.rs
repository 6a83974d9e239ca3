// result.rs — GateResult, the closed failure-code set, and evaluation steps.
//
// A GateResult is the terminal artifact of one gate run. It is built through
// `pass()` / `fail()` and never mutated afterwards; the CLI maps it to a
// process exit code via `exit_code()`.

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Why a gate failed. The numeric codes are a stable contract with the
/// pipeline (auto-label vs block-merge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    /// Configuration/input error, or any stage gate failure.
    Fatal,
    /// No change manifest while one is required.
    MissingManifest,
    /// Declared level is not in the allow-list.
    LevelNotAllowed,
    /// Declared level is less restrictive than the inferred level.
    UnderDeclared,
    /// Code changed at P1/P2 without any test change.
    MissingTests,
}

impl FailureCode {
    pub fn code(self) -> u8 {
        match self {
            FailureCode::Fatal => 1,
            FailureCode::MissingManifest => 2,
            FailureCode::LevelNotAllowed => 3,
            FailureCode::UnderDeclared => 4,
            FailureCode::MissingTests => 5,
        }
    }
}

/// Verdict of a single gate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    passed: bool,
    level: Option<Level>,
    failure_code: Option<FailureCode>,
    message: String,
}

impl GateResult {
    pub fn pass(level: Option<Level>, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            level,
            failure_code: None,
            message: message.into(),
        }
    }

    pub fn fail(code: FailureCode, level: Option<Level>, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            level,
            failure_code: Some(code),
            message: message.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn failure_code(&self) -> Option<FailureCode> {
        self.failure_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Process exit code: 0 on pass, otherwise the failure code.
    pub fn exit_code(&self) -> u8 {
        self.failure_code.map(FailureCode::code).unwrap_or(0)
    }
}

/// One named check performed by a gate.
///
/// Captures what the gate checked at each stage so the decision trail is
/// visible in the summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationStep {
    /// Which check was performed (e.g., "manifest_present").
    pub check: String,
    /// The outcome of this check (e.g., "passed", "failed: ...").
    pub outcome: String,
    /// Whether this step decided the verdict.
    pub terminal: bool,
}

impl EvaluationStep {
    pub fn passed(check: &str) -> Self {
        Self {
            check: check.to_string(),
            outcome: "passed".to_string(),
            terminal: false,
        }
    }

    pub fn failed(check: &str, reason: &str) -> Self {
        Self {
            check: check.to_string(),
            outcome: format!("failed: {}", reason),
            terminal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_codes_are_stable() {
        let codes: Vec<u8> = [
            FailureCode::Fatal,
            FailureCode::MissingManifest,
            FailureCode::LevelNotAllowed,
            FailureCode::UnderDeclared,
            FailureCode::MissingTests,
        ]
        .iter()
        .map(|c| c.code())
        .collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pass_has_zero_exit_code() {
        let result = GateResult::pass(Some(Level::P1), "ok");
        assert!(result.passed());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.failure_code(), None);
    }

    #[test]
    fn fail_carries_code_and_level() {
        let result = GateResult::fail(FailureCode::UnderDeclared, Some(Level::P0), "too low");
        assert!(!result.passed());
        assert_eq!(result.exit_code(), 4);
        assert_eq!(result.level(), Some(Level::P0));
        assert_eq!(result.message(), "too low");
    }

    #[test]
    fn failure_code_serializes_as_name() {
        let json = serde_json::to_string(&FailureCode::MissingTests).unwrap();
        assert_eq!(json, "\"missing_tests\"");
    }
}
