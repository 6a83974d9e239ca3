// policy.rs — The policy document (policy/policy.yaml).
//
// Example:
//
//   classification:
//     P0: ["infra/**", "ring0/**"]
//     P1: ["app/**"]
//     P2: ["docs/**", "*.md"]
//   rules:
//     require_change_manifest: true
//     allowed_change_levels: [P0, P1, P2]
//     require_tests_on_p1: true
//
// The policy is loaded once per run and never mutated.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use cos_gate::Level;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Risk classification tables plus gate rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Ordered fnmatch patterns per level.
    pub classification: BTreeMap<Level, Vec<String>>,
    pub rules: PolicyRules,
}

/// Switches that decide which checks the gate enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRules {
    /// Fail when the change carries no manifest.
    #[serde(default = "default_require_change_manifest")]
    pub require_change_manifest: bool,

    /// Levels a manifest may declare.
    #[serde(default)]
    pub allowed_change_levels: BTreeSet<Level>,

    /// Require a test change alongside code changes declared P1 or P2.
    #[serde(default)]
    pub require_tests_on_p1: bool,

    /// Paths that count as code for the test requirement.
    #[serde(default = "default_code_patterns")]
    pub code_patterns: Vec<String>,
}

impl Default for PolicyRules {
    fn default() -> Self {
        Self {
            require_change_manifest: default_require_change_manifest(),
            allowed_change_levels: BTreeSet::new(),
            require_tests_on_p1: false,
            code_patterns: default_code_patterns(),
        }
    }
}

fn default_require_change_manifest() -> bool {
    true
}

fn default_code_patterns() -> Vec<String> {
    ["app/**", "ring1/agents/**", "ring1/tools/**"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Policy {
    /// Parse a policy from YAML text.
    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, PolicyError> {
        let policy: Policy =
            serde_yaml::from_str(content).map_err(|source| PolicyError::Yaml {
                path: origin.to_string(),
                source,
            })?;
        Ok(policy)
    }

    /// Load the policy file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let policy = Self::from_yaml_str(&content, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            levels = policy.classification.len(),
            "loaded policy"
        );
        Ok(policy)
    }

    /// Patterns registered for `level` (empty when the level has no table).
    pub fn patterns(&self, level: Level) -> &[String] {
        self.classification
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = r#"
classification:
  P0: ["infra/**"]
  P2: ["docs/**", "*.md"]
rules:
  allowed_change_levels: [P0, P1, P2]
  require_tests_on_p1: true
"#;

    #[test]
    fn parses_tables_and_rule_defaults() {
        let policy = Policy::from_yaml_str(POLICY, "policy.yaml").unwrap();
        assert_eq!(policy.patterns(Level::P0), ["infra/**".to_string()]);
        assert!(policy.patterns(Level::P1).is_empty());
        assert_eq!(policy.patterns(Level::P2).len(), 2);
        assert!(policy.rules.require_change_manifest);
        assert!(policy.rules.require_tests_on_p1);
        assert_eq!(policy.rules.allowed_change_levels.len(), 3);
        assert_eq!(policy.rules.code_patterns, default_code_patterns());
    }

    #[test]
    fn missing_rules_section_is_an_error() {
        let err = Policy::from_yaml_str("classification: {}\n", "policy.yaml").unwrap_err();
        assert!(matches!(err, PolicyError::Yaml { .. }));
    }

    #[test]
    fn unknown_level_key_is_an_error() {
        let yaml = "classification:\n  P3: [\"x/**\"]\nrules: {}\n";
        assert!(Policy::from_yaml_str(yaml, "policy.yaml").is_err());
    }

    #[test]
    fn fnmatch_only_patterns_load() {
        let yaml = "classification:\n  P0: [\"ring0**\", \"[broken\"]\n  P2: [\"**.md\", \"docs/**.md\"]\nrules: {}\n";
        let policy = Policy::from_yaml_str(yaml, "policy.yaml").unwrap();
        assert_eq!(policy.patterns(Level::P0), ["ring0**".to_string(), "[broken".to_string()]);
        assert_eq!(policy.patterns(Level::P2).len(), 2);
    }

    #[test]
    fn load_reports_missing_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        let err = Policy::load(&path).unwrap_err();
        assert!(err.to_string().contains("policy.yaml"));
    }

    #[test]
    fn code_patterns_can_be_overridden() {
        let yaml = "classification: {}\nrules:\n  code_patterns: [\"src/**\"]\n";
        let policy = Policy::from_yaml_str(yaml, "policy.yaml").unwrap();
        assert_eq!(policy.rules.code_patterns, vec!["src/**".to_string()]);
    }
}
