// thresholds.rs — Per-stage metric thresholds.
//
// | Stage  | Documents                               | Pass condition                               |
// |--------|-----------------------------------------|----------------------------------------------|
// | VAL    | landing-metrics                         | signups ≥ 100 OR leads ≥ 10 OR pilots ≥ 3    |
// | BUILD  | e2e-report, activation-metrics          | pass_rate ≥ 0.9 AND activation_rate ≥ 0.2    |
// | LAUNCH | uptime-report, cac-microtest            | uptime ≥ 0.995 AND cac ≤ 10.0                |
// | GROW   | cohort-report, unit-econ                | retention_dN ≥ 0.3 AND payback_months ≤ 6    |
//
// VAL needs one positive signal; the later stages need all of them.

use serde::Serialize;

use crate::evidence::EvidenceSource;
use crate::stage::Stage;

/// Value assumed for a missing ceiling metric, so it can never pass.
pub const CEILING_SENTINEL: f64 = 1e9;

/// Comparison a metric has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Bound {
    /// Floor: `value >= bound`. Missing reads as 0.
    AtLeast(f64),
    /// Ceiling: `value <= bound`. Missing reads as [`CEILING_SENTINEL`].
    AtMost(f64),
}

impl Bound {
    pub fn default_value(self) -> f64 {
        match self {
            Bound::AtLeast(_) => 0.0,
            Bound::AtMost(_) => CEILING_SENTINEL,
        }
    }

    pub fn holds(self, value: f64) -> bool {
        match self {
            Bound::AtLeast(min) => value >= min,
            Bound::AtMost(max) => value <= max,
        }
    }
}

/// How the metric checks of a stage combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    Any,
    All,
}

/// One metric read from one evidence document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricThreshold {
    pub document: &'static str,
    pub metric: &'static str,
    pub bound: Bound,
}

/// The threshold table of a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageThresholds {
    pub composition: Composition,
    pub metrics: &'static [MetricThreshold],
    /// Human-readable pass condition, used in the failure message.
    pub requirement: &'static str,
}

const fn at_least(document: &'static str, metric: &'static str, min: f64) -> MetricThreshold {
    MetricThreshold {
        document,
        metric,
        bound: Bound::AtLeast(min),
    }
}

const fn at_most(document: &'static str, metric: &'static str, max: f64) -> MetricThreshold {
    MetricThreshold {
        document,
        metric,
        bound: Bound::AtMost(max),
    }
}

const VAL: &[MetricThreshold] = &[
    at_least("landing-metrics.json", "waitlist_signups", 100.0),
    at_least("landing-metrics.json", "qualified_leads", 10.0),
    at_least("landing-metrics.json", "paid_pilots", 3.0),
];

const BUILD: &[MetricThreshold] = &[
    at_least("e2e-report.json", "pass_rate", 0.9),
    at_least("activation-metrics.json", "activation_rate", 0.2),
];

const LAUNCH: &[MetricThreshold] = &[
    at_least("uptime-report.json", "uptime", 0.995),
    at_most("cac-microtest.json", "cac", 10.0),
];

const GROW: &[MetricThreshold] = &[
    at_least("cohort-report.json", "retention_dN", 0.3),
    at_most("unit-econ.json", "payback_months", 6.0),
];

impl Stage {
    pub fn thresholds(self) -> StageThresholds {
        match self {
            Stage::Val => StageThresholds {
                composition: Composition::Any,
                metrics: VAL,
                requirement: "need waitlist>=100 OR leads>=10 OR paid_pilots>=3",
            },
            Stage::Build => StageThresholds {
                composition: Composition::All,
                metrics: BUILD,
                requirement: "e2e pass_rate>=0.9 AND activation_rate>=0.2",
            },
            Stage::Launch => StageThresholds {
                composition: Composition::All,
                metrics: LAUNCH,
                requirement: "uptime>=0.995 AND CAC<=10.0",
            },
            Stage::Grow => StageThresholds {
                composition: Composition::All,
                metrics: GROW,
                requirement: "retention_dN>=0.3 AND payback_months<=6",
            },
        }
    }
}

/// Result of checking one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCheck {
    pub document: &'static str,
    pub metric: &'static str,
    pub bound: Bound,
    pub observed: f64,
    /// True when `observed` is the default rather than a measured value.
    pub defaulted: bool,
    pub met: bool,
}

/// Result of checking a stage's whole threshold table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdReport {
    pub stage: Stage,
    pub composition: Composition,
    pub checks: Vec<MetricCheck>,
    pub met: bool,
}

impl ThresholdReport {
    /// e.g. "BUILD thresholds not met (e2e pass_rate>=0.9 AND activation_rate>=0.2)."
    pub fn failure_message(&self) -> String {
        format!(
            "{} thresholds not met ({}).",
            self.stage,
            self.stage.thresholds().requirement
        )
    }
}

/// Evaluate a stage's thresholds against the available evidence.
pub fn evaluate_thresholds<E: EvidenceSource>(stage: Stage, evidence: &E) -> ThresholdReport {
    let table = stage.thresholds();
    let checks: Vec<MetricCheck> = table
        .metrics
        .iter()
        .map(|t| {
            let measured = evidence.document(t.document).and_then(|d| d.metric(t.metric));
            if measured.is_none() {
                tracing::debug!(
                    document = t.document,
                    metric = t.metric,
                    "metric missing, using default"
                );
            }
            let observed = measured.unwrap_or_else(|| t.bound.default_value());
            MetricCheck {
                document: t.document,
                metric: t.metric,
                bound: t.bound,
                observed,
                defaulted: measured.is_none(),
                met: t.bound.holds(observed),
            }
        })
        .collect();

    let met = match table.composition {
        Composition::Any => checks.iter().any(|c| c.met),
        Composition::All => checks.iter().all(|c| c.met),
    };
    tracing::info!(%stage, met, "evaluated stage thresholds");

    ThresholdReport {
        stage,
        composition: table.composition,
        checks,
        met,
    }
}
