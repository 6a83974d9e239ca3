// evidence.rs — Evidence documents and where they come from.
//
// An evidence document is a flat JSON object of metric name → number.
// Reading one never fails the run: an absent, unreadable or malformed
// document is simply "not there", and the threshold table supplies its
// defaults. Non-numeric metric values are ignored the same way.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Metric values from one evidence file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceDocument {
    metrics: BTreeMap<String, f64>,
}

impl EvidenceDocument {
    /// Parse JSON text; `None` unless it is an object.
    pub fn from_json_str(content: &str) -> Option<Self> {
        let Value::Object(map) = serde_json::from_str::<Value>(content).ok()? else {
            return None;
        };
        let metrics = map
            .into_iter()
            .filter_map(|(key, value)| value.as_f64().map(|v| (key, v)))
            .collect();
        Some(Self { metrics })
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EvidenceDocument {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            metrics: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Where artifacts and evidence documents are looked up.
pub trait EvidenceSource {
    /// Whether an artifact with this name exists.
    fn exists(&self, artifact: &str) -> bool;

    /// Load a metric document; `None` when absent or unusable.
    fn document(&self, name: &str) -> Option<EvidenceDocument>;
}

/// Evidence stored as files under a directory (`<venture>/evidence`).
#[derive(Debug, Clone)]
pub struct EvidenceDir {
    root: PathBuf,
}

impl EvidenceDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EvidenceSource for EvidenceDir {
    fn exists(&self, artifact: &str) -> bool {
        self.root.join(artifact).exists()
    }

    fn document(&self, name: &str) -> Option<EvidenceDocument> {
        let path = self.root.join(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "evidence document unavailable");
                return None;
            }
        };
        let doc = EvidenceDocument::from_json_str(&content);
        if doc.is_none() {
            tracing::warn!(path = %path.display(), "evidence document is not a JSON object, using defaults");
        }
        doc
    }
}

/// Evidence held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvidence {
    artifacts: BTreeMap<String, Option<EvidenceDocument>>,
}

impl InMemoryEvidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact that exists but is not a metric document.
    pub fn with_artifact(mut self, name: &str) -> Self {
        self.artifacts.insert(name.to_string(), None);
        self
    }

    /// Add a metric document (it also counts as an existing artifact).
    pub fn with_document(mut self, name: &str, doc: EvidenceDocument) -> Self {
        self.artifacts.insert(name.to_string(), Some(doc));
        self
    }
}

impl EvidenceSource for InMemoryEvidence {
    fn exists(&self, artifact: &str) -> bool {
        self.artifacts.contains_key(artifact)
    }

    fn document(&self, name: &str) -> Option<EvidenceDocument> {
        self.artifacts.get(name).cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_numeric_metrics_only() {
        let doc = EvidenceDocument::from_json_str(
            r#"{"pass_rate": 0.93, "runs": 120, "note": "flaky", "ok": true}"#,
        )
        .unwrap();
        assert_eq!(doc.metric("pass_rate"), Some(0.93));
        assert_eq!(doc.metric("runs"), Some(120.0));
        assert_eq!(doc.metric("note"), None);
        assert_eq!(doc.metric("ok"), None);
    }

    #[test]
    fn non_object_json_is_unusable() {
        assert_eq!(EvidenceDocument::from_json_str("[1, 2]"), None);
        assert_eq!(EvidenceDocument::from_json_str("not json"), None);
    }

    #[test]
    fn evidence_dir_reads_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("uptime-report.json"), r#"{"uptime": 0.999}"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        let evidence = EvidenceDir::new(dir.path());

        assert!(evidence.exists("uptime-report.json"));
        assert!(!evidence.exists("cac-microtest.json"));
        assert_eq!(
            evidence.document("uptime-report.json").unwrap().metric("uptime"),
            Some(0.999)
        );
        assert_eq!(evidence.document("broken.json"), None);
        assert_eq!(evidence.document("cac-microtest.json"), None);
    }

    #[test]
    fn in_memory_evidence() {
        let evidence = InMemoryEvidence::new()
            .with_artifact("deck.pdf")
            .with_document("unit-econ.json", [("payback_months", 4.0)].into_iter().collect());
        assert!(evidence.exists("deck.pdf"));
        assert!(evidence.exists("unit-econ.json"));
        assert_eq!(evidence.document("deck.pdf"), None);
        assert_eq!(
            evidence.document("unit-econ.json").unwrap().metric("payback_months"),
            Some(4.0)
        );
    }
}
