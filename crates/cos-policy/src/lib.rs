//! # cos-policy
//!
//! Change policy gate for pull requests.
//!
//! A change is a list of repository-relative paths. The [`classify`] step
//! maps it to a risk [`Level`](cos_gate::Level) using the fnmatch pattern tables in
//! `policy.yaml`; the change's own `change.yaml` declares a level; the
//! [`evaluate`] orchestrator compares the two and returns a
//! [`PolicyVerdict`] whose failure code tells the pipeline what went wrong:
//!
//! | code | meaning |
//! |------|---------|
//! | 2 | no change manifest while one is required |
//! | 3 | declared level not in the allow-list |
//! | 4 | declared level less restrictive than inferred |
//! | 5 | code changed at P1/P2 without a test change |
//!
//! ## Key invariants
//!
//! - **Fixed scan order**: classification scans P2, then P1, then P0 and
//!   returns the first level with a matching path. Unmatched changes are P1.
//! - **First failure wins**: checks run in a fixed order and stop at the
//!   first failure; failures never accumulate.
//! - **Level always published**: the computed level is reported even when
//!   the gate fails, so automation can label failing changes.

pub mod classifier;
pub mod comparator;
pub mod config;
pub mod coverage;
pub mod error;
pub mod gate;
pub mod manifest;
pub mod pattern;
pub mod policy;

pub use classifier::{classify, classify_with_match, Classification};
pub use comparator::{compare, Comparison};
pub use config::PolicyGateConfig;
pub use coverage::{is_test_path, requires_tests};
pub use error::PolicyError;
pub use gate::{evaluate, report, PolicyVerdict, OUTPUT_KEY};
pub use manifest::{Declaration, Manifest};
pub use policy::{Policy, PolicyRules};
