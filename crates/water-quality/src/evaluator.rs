//! Threshold Evaluation for Water Parameters
//!
//! The evaluator is pure: it classifies each of the six parameters against a
//! fixed ideal range and aggregates the out-of-range messages and alerts. It
//! performs no I/O and renders nothing; callers decide how to present the
//! result.

use crate::model::{Parameter, Reading, WaterSample};
use serde::Serialize;

/// Summary used when every parameter is inside its ideal range
pub const NOMINAL_SUMMARY: &str = "All parameters are within the ideal range.";

/// Inclusive ideal range; an absent bound is open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl IdealRange {
    const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Whether `value` lies inside the range. NaN never does.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(!value.is_nan(), |min| value >= min)
            && self.max.map_or(!value.is_nan(), |max| value <= max)
    }
}

/// Threshold and wording for one parameter
#[derive(Debug, Clone, Copy)]
pub struct ParameterRule {
    pub parameter: Parameter,
    pub ideal: IdealRange,
    /// Line added to the summary on violation
    pub violation_message: &'static str,
    /// Short alert used in the notification body
    pub alert: &'static str,
    /// Shown when the parameter passes
    pub pass_message: &'static str,
}

static RULES: [ParameterRule; 6] = [
    ParameterRule {
        parameter: Parameter::Ph,
        ideal: IdealRange::between(6.0, 7.5),
        violation_message: "pH is outside the ideal range (6.0-7.5).",
        alert: "pH out of range! Check the system.",
        pass_message: "pH within the ideal range.",
    },
    ParameterRule {
        parameter: Parameter::Temperature,
        ideal: IdealRange::between(18.0, 30.0),
        violation_message: "Water temperature is outside the ideal range (18-30°C).",
        alert: "Temperature out of range! Check the system.",
        pass_message: "Temperature within the ideal range.",
    },
    ParameterRule {
        parameter: Parameter::Ammonia,
        ideal: IdealRange::at_most(0.5),
        violation_message: "Ammonia levels are high! This can be toxic to the fish.",
        alert: "High ammonia! This can be dangerous.",
        pass_message: "Ammonia within the safe range.",
    },
    ParameterRule {
        parameter: Parameter::Nitrite,
        ideal: IdealRange::at_most(0.5),
        violation_message: "Nitrite levels are above the recommended limit (max 0.5 ppm).",
        alert: "Nitrite above the limit! Check the system.",
        pass_message: "Nitrite within the safe limit.",
    },
    ParameterRule {
        parameter: Parameter::Nitrate,
        ideal: IdealRange::at_most(40.0),
        violation_message: "Nitrate levels are high (max 40 ppm).",
        alert: "High nitrate! Check the system.",
        pass_message: "Nitrate within the safe limit.",
    },
    ParameterRule {
        parameter: Parameter::DissolvedOxygen,
        ideal: IdealRange::at_least(4.0),
        violation_message: "Low dissolved oxygen levels! Increase water aeration.",
        alert: "Low oxygen! Increase aeration.",
        pass_message: "Adequate dissolved oxygen levels.",
    },
];

/// Rule for a parameter
pub fn rule(parameter: Parameter) -> &'static ParameterRule {
    // RULES is declared in Parameter::ALL order
    &RULES[parameter as usize]
}

/// Verdict for a single parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    OutOfRange(String),
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Ok)
    }
}

/// Per-parameter outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterCheck {
    pub parameter: Parameter,
    pub value: f64,
    pub verdict: Verdict,
    /// Pass or violation text for display
    pub message: &'static str,
}

impl ParameterCheck {
    pub fn passed(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Result of evaluating one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    checks: Vec<ParameterCheck>,
    summary: String,
    alerts: Vec<String>,
}

impl EvaluationResult {
    fn from_checks(checks: Vec<ParameterCheck>) -> Self {
        let mut lines = Vec::new();
        let mut alerts = Vec::new();

        for check in &checks {
            if let Verdict::OutOfRange(message) = &check.verdict {
                lines.push(message.as_str());
                alerts.push(rule(check.parameter).alert.to_string());
            }
        }

        let summary = if lines.is_empty() {
            NOMINAL_SUMMARY.to_string()
        } else {
            lines.join("\n")
        };

        Self {
            checks,
            summary,
            alerts,
        }
    }

    /// All six checks in evaluation order
    pub fn checks(&self) -> &[ParameterCheck] {
        &self.checks
    }

    /// Out-of-range messages joined by newlines, or [`NOMINAL_SUMMARY`]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// One short alert per failing parameter, in evaluation order
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn is_nominal(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn verdict(&self, parameter: Parameter) -> &Verdict {
        &self.checks[parameter as usize].verdict
    }

    /// Parameters that are out of range
    pub fn violations(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.checks
            .iter()
            .filter(|c| !c.passed())
            .map(|c| c.parameter)
    }
}

/// Stateless water-quality evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Classify every parameter of `sample`. No check short-circuits another.
    pub fn evaluate(&self, sample: &WaterSample) -> EvaluationResult {
        let checks = sample
            .values()
            .map(|(parameter, value)| {
                let threshold = rule(parameter);
                if threshold.ideal.contains(value) {
                    ParameterCheck {
                        parameter,
                        value,
                        verdict: Verdict::Ok,
                        message: threshold.pass_message,
                    }
                } else {
                    ParameterCheck {
                        parameter,
                        value,
                        verdict: Verdict::OutOfRange(threshold.violation_message.to_string()),
                        message: threshold.violation_message,
                    }
                }
            })
            .collect();

        EvaluationResult::from_checks(checks)
    }

    pub fn evaluate_reading(&self, reading: &Reading) -> EvaluationResult {
        self.evaluate(&reading.sample)
    }
}
