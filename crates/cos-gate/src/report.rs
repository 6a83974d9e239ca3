// report.rs — Publishing verdicts to the pipeline.
//
// The pipeline reads two channels:
//
// - the workflow log (stdout): `::group::` summary blocks, `::error::` lines,
//   and a plain pass line;
// - the step output file named by GITHUB_OUTPUT: append-only `key=value`
//   lines that later workflow steps consume (e.g. `policy_level=P1`).
//
// `WorkflowReporter` speaks both. `RecordingReporter` keeps everything in
// memory so gate runs can be asserted on without touching the process.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ReportError;

/// Sink for gate verdicts.
pub trait Reporter {
    /// Publish a machine-readable `key=value` output.
    fn publish(&mut self, key: &str, value: &str) -> Result<(), ReportError>;

    /// Emit a titled, collapsible block of text.
    fn group(&mut self, title: &str, body: &str) -> Result<(), ReportError>;

    /// Emit a tagged error line.
    fn error(&mut self, message: &str) -> Result<(), ReportError>;

    /// Emit a plain log line.
    fn info(&mut self, message: &str) -> Result<(), ReportError>;

    /// Emit `value` as pretty JSON inside a group.
    fn summary<T: Serialize>(&mut self, title: &str, value: &T) -> Result<(), ReportError>
    where
        Self: Sized,
    {
        let body = serde_json::to_string_pretty(value)?;
        self.group(title, &body)
    }
}

/// Reporter that writes GitHub-style workflow commands.
pub struct WorkflowReporter<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
}

impl<W: Write> WorkflowReporter<W> {
    /// `output_file` is the GITHUB_OUTPUT path; `None` disables `publish`.
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self { out, output_file }
    }

    /// Give back the log writer (used by tests to inspect the output).
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for WorkflowReporter<W> {
    fn publish(&mut self, key: &str, value: &str) -> Result<(), ReportError> {
        let Some(path) = &self.output_file else {
            tracing::debug!(key, value, "no output file configured, skipping publish");
            return Ok(());
        };
        let to_err = |source| ReportError::OutputFile {
            path: path.display().to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(to_err)?;
        writeln!(file, "{}={}", key, value).map_err(to_err)?;
        tracing::info!(key, value, path = %path.display(), "published gate output");
        Ok(())
    }

    fn group(&mut self, title: &str, body: &str) -> Result<(), ReportError> {
        writeln!(self.out, "::group::{}", title)?;
        writeln!(self.out, "{}", body)?;
        writeln!(self.out, "::endgroup::")?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<(), ReportError> {
        writeln!(self.out, "::error::{}", message)?;
        Ok(())
    }

    fn info(&mut self, message: &str) -> Result<(), ReportError> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }
}

/// In-memory reporter.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub outputs: Vec<(String, String)>,
    pub groups: Vec<(String, String)>,
    pub errors: Vec<String>,
    pub lines: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published under `key`.
    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Reporter for RecordingReporter {
    fn publish(&mut self, key: &str, value: &str) -> Result<(), ReportError> {
        self.outputs.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn group(&mut self, title: &str, body: &str) -> Result<(), ReportError> {
        self.groups.push((title.to_string(), body.to_string()));
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<(), ReportError> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn info(&mut self, message: &str) -> Result<(), ReportError> {
        self.lines.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn workflow_lines_are_tagged() {
        let mut reporter = WorkflowReporter::new(Vec::new(), None);
        reporter.group("Policy Gate Summary", "{}").unwrap();
        reporter.error("Missing change.yaml manifest.").unwrap();
        reporter.info("Policy gate passed.").unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "::group::Policy Gate Summary\n{}\n::endgroup::\n\
             ::error::Missing change.yaml manifest.\n\
             Policy gate passed.\n"
        );
    }

    #[test]
    fn publish_appends_key_value_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        let mut reporter = WorkflowReporter::new(Vec::new(), Some(path.clone()));
        reporter.publish("policy_level", "P1").unwrap();
        reporter.publish("policy_level", "P2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "earlier=1\npolicy_level=P1\npolicy_level=P2\n");
    }

    #[test]
    fn publish_without_output_file_is_noop() {
        let mut reporter = WorkflowReporter::new(Vec::new(), None);
        reporter.publish("policy_level", "P0").unwrap();
        assert!(reporter.into_inner().is_empty());
    }

    #[test]
    fn summary_renders_pretty_json_group() {
        let mut reporter = RecordingReporter::new();
        reporter
            .summary("Summary", &serde_json::json!({ "inferred_level": "P1" }))
            .unwrap();
        assert_eq!(reporter.groups.len(), 1);
        assert!(reporter.groups[0].1.contains("\"inferred_level\": \"P1\""));
    }

    #[test]
    fn recording_reporter_returns_last_output() {
        let mut reporter = RecordingReporter::new();
        reporter.publish("policy_level", "P1").unwrap();
        reporter.publish("policy_level", "P0").unwrap();
        assert_eq!(reporter.output("policy_level"), Some("P0"));
        assert_eq!(reporter.output("missing"), None);
    }
}
