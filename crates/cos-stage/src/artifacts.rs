// artifacts.rs — Required artifact presence.

use crate::evidence::EvidenceSource;

/// Required artifacts that are absent, in the order they were listed.
pub fn missing_artifacts<E: EvidenceSource>(required: &[String], evidence: &E) -> Vec<String> {
    required
        .iter()
        .filter(|a| !evidence.exists(a))
        .cloned()
        .collect()
}
