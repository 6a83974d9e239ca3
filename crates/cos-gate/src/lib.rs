//! # cos-gate
//!
//! Shared vocabulary for the cos delivery gates.
//!
//! Both the change policy gate (`cos-policy`) and the stage gate
//! (`cos-stage`) produce a [`GateResult`]: a pass/fail verdict, the risk
//! [`Level`] it settled on, and a [`FailureCode`] from a closed set that
//! pipeline automation branches on. The [`Reporter`] trait is the seam to
//! the outside world (workflow log lines and the `key=value` output file).
//!
//! ## Key invariants
//!
//! - **Numeric level order**: `P0 < P1 < P2`, P0 is the most restrictive.
//!   Levels never compare as strings.
//! - **Closed failure set**: exit codes 1–5 only, each with one meaning.
//! - **Immutable verdicts**: a `GateResult` has no setters.

pub mod error;
pub mod level;
pub mod report;
pub mod result;

pub use error::ReportError;
pub use level::{Level, ParseLevelError};
pub use report::{RecordingReporter, Reporter, WorkflowReporter};
pub use result::{EvaluationStep, FailureCode, GateResult};
