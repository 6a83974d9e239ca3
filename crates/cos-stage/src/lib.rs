//! # cos-stage
//!
//! Stage gate for milestone reviews.
//!
//! A venture moves through the stages VAL → BUILD → LAUNCH → GROW. Each stage
//! has a spec file listing the evidence artifacts it needs
//! (`<l0>/stage-gates/<STAGE>.yaml`) and a fixed set of metric thresholds
//! read from JSON evidence documents under `<venture>/evidence/`.
//!
//! ## Key invariants
//!
//! - **Artifacts first**: any missing artifact fails the stage before
//!   thresholds are looked at.
//! - **Conservative defaults**: a missing document or metric reads as `0` for
//!   floors and as [`CEILING_SENTINEL`] for ceilings, so absent evidence
//!   never passes a threshold by accident.
//! - **One exit code**: every stage failure is code 1; the message and the
//!   typed [`StageFailure`] say which kind it was.
//! - **Closed stage set**: stage names outside [`Stage`] only get the
//!   artifact check.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod evidence;
pub mod gate;
pub mod stage;
pub mod thresholds;

pub use artifacts::missing_artifacts;
pub use config::StageGateConfig;
pub use error::StageError;
pub use evidence::{EvidenceDir, EvidenceDocument, EvidenceSource, InMemoryEvidence};
pub use gate::{evaluate_spec, evaluate_stage, report, StageFailure, StageVerdict, OUTPUT_KEY};
pub use stage::{Stage, StageSpec};
pub use thresholds::{
    evaluate_thresholds, Bound, Composition, MetricCheck, MetricThreshold, StageThresholds,
    ThresholdReport, CEILING_SENTINEL,
};
