// classifier.rs — Infer a risk level for a set of changed paths.
//
// Levels are scanned in the fixed order P2, P1, P0. For each level every
// changed path is tried against that level's patterns, and the first level
// with a hit is returned. A change touching both a P2 and a P0 path is
// therefore classified P2. Nothing matching at all yields P1.

use cos_gate::Level;
use serde::Serialize;

use crate::pattern;
use crate::policy::Policy;

/// Order in which level tables are scanned.
pub const SCAN_ORDER: [Level; 3] = [Level::P2, Level::P1, Level::P0];

/// Outcome of classification, with the hit that decided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub level: Level,
    /// Changed path that matched (`None` when the default level applied).
    pub path: Option<String>,
    /// Pattern it matched.
    pub pattern: Option<String>,
}

/// Infer the level of a change.
pub fn classify(changed: &[String], policy: &Policy) -> Level {
    classify_with_match(changed, policy).level
}

/// Infer the level of a change and report which path/pattern decided it.
pub fn classify_with_match(changed: &[String], policy: &Policy) -> Classification {
    for level in SCAN_ORDER {
        let patterns = policy.patterns(level);
        for path in changed {
            if let Some(pat) = pattern::first_match(patterns, path) {
                tracing::debug!(%level, path = %path, pattern = pat, "classified change");
                return Classification {
                    level,
                    path: Some(path.clone()),
                    pattern: Some(pat.to_string()),
                };
            }
        }
    }
    tracing::debug!(files = changed.len(), "no classification pattern matched");
    Classification {
        level: Level::UNCLASSIFIED,
        path: None,
        pattern: None,
    }
}
