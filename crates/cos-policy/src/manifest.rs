// manifest.rs — The change manifest (change.yaml).
//
// A change declares its own level in a small YAML file at the repository
// root or under .github/. Only `level` is interpreted; the rest of the
// document is kept as-is for the summary.

use std::path::{Path, PathBuf};

use cos_gate::Level;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::PolicyError;

/// Manifest locations, relative to the target repository, in lookup order.
pub const MANIFEST_CANDIDATES: [&str; 2] = ["change.yaml", ".github/change.yaml"];

/// What the change says about its own level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Declaration {
    /// No manifest, or a manifest without a usable `level`.
    Missing,
    Level(Level),
    /// A `level` value that is not P0/P1/P2. It is never in the allow-list.
    Unrecognized(String),
}

impl Declaration {
    pub fn level(&self) -> Option<Level> {
        match self {
            Declaration::Level(level) => Some(*level),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Declaration::Missing)
    }

    /// Text used in log and error lines.
    pub fn describe(&self) -> String {
        match self {
            Declaration::Missing => "none".to_string(),
            Declaration::Level(level) => level.to_string(),
            Declaration::Unrecognized(raw) => raw.clone(),
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => Declaration::Missing,
            Some(v) if is_blank(v) => Declaration::Missing,
            Some(Value::String(s)) => s
                .parse::<Level>()
                .map(Declaration::Level)
                .unwrap_or_else(|_| Declaration::Unrecognized(s.clone())),
            Some(other) => Declaration::Unrecognized(
                serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// `level` values that declare nothing: null, `false`, zero, and empty
/// strings, sequences or mappings.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(_) => false,
    }
}

/// A loaded change manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub declared: Declaration,
    pub raw: Mapping,
    /// File it was read from (`None` when no manifest exists).
    pub source: Option<PathBuf>,
}

impl Manifest {
    /// The "no manifest found" value.
    pub fn none() -> Self {
        Self {
            declared: Declaration::Missing,
            raw: Mapping::new(),
            source: None,
        }
    }

    /// Parse manifest YAML. An empty document is an empty manifest.
    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, PolicyError> {
        let raw: Option<Mapping> =
            serde_yaml::from_str(content).map_err(|source| PolicyError::Yaml {
                path: origin.to_string(),
                source,
            })?;
        let raw = raw.unwrap_or_default();
        let declared = Declaration::from_value(raw.get("level"));
        Ok(Self {
            declared,
            raw,
            source: Some(PathBuf::from(origin)),
        })
    }

    /// Read the first manifest found under `target_repo`, if any.
    pub fn discover(target_repo: &Path) -> Result<Self, PolicyError> {
        for candidate in MANIFEST_CANDIDATES {
            let path = target_repo.join(candidate);
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|source| PolicyError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let manifest = Self::from_yaml_str(&content, &path.display().to_string())?;
            tracing::debug!(path = %path.display(), declared = %manifest.declared.describe(), "found change manifest");
            return Ok(manifest);
        }
        tracing::debug!(target = %target_repo.display(), "no change manifest found");
        Ok(Self::none())
    }
}
