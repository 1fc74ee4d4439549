//! Submission Pipeline
//!
//! Drives one submitted sample through `Evaluating -> Persisting ->
//! Notifying -> Done` and back to `Idle`. Every submission is recorded,
//! passing or failing. Failures at any step end up in the returned report;
//! nothing is retried.

use alerting::Notifier;
use chrono::{Local, NaiveDateTime};
use metrics::counter;
use serde::Serialize;
use storage::{History, ReadingStore, StorageError};
use tracing::{debug, error, info, warn};
use water_quality::{Evaluator, Reading, WaterSample};

use crate::report::{NotifyOutcome, SaveOutcome, SubmissionReport};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Evaluating,
    Persisting,
    Notifying,
    Done,
}

/// Evaluates, stores, and alerts on water samples
pub struct MonitorService<S, N> {
    evaluator: Evaluator,
    store: S,
    notifier: N,
    stage: Stage,
}

impl<S: ReadingStore, N: Notifier> MonitorService<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            evaluator: Evaluator::new(),
            store,
            notifier,
            stage: Stage::Idle,
        }
    }

    /// Current stage; `Idle` between submissions
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Process a sample stamped with the local wall-clock time
    pub fn submit(&mut self, sample: WaterSample) -> SubmissionReport {
        self.submit_at(sample, Local::now().naive_local())
    }

    /// Process a sample stamped with `timestamp`
    pub fn submit_at(&mut self, sample: WaterSample, timestamp: NaiveDateTime) -> SubmissionReport {
        counter!("aquawatch_submissions_total").increment(1);

        self.enter(Stage::Evaluating);
        let evaluation = self.evaluator.evaluate(&sample);
        for parameter in evaluation.violations() {
            counter!("aquawatch_violations_total", "parameter" => parameter.column()).increment(1);
        }
        if evaluation.is_nominal() {
            info!("All parameters nominal");
        } else {
            warn!(
                "{} parameter(s) out of range: {}",
                evaluation.alerts().len(),
                evaluation
                    .violations()
                    .map(|p| p.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        self.enter(Stage::Persisting);
        let reading = Reading::new(sample, timestamp);
        let save = match self.store.save(&reading) {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                error!("Failed to save reading: {}", e);
                counter!("aquawatch_save_failures_total").increment(1);
                SaveOutcome::Failed(e.to_string())
            }
        };

        // Alerts are dispatched even when the save failed
        let notification = if evaluation.alerts().is_empty() {
            NotifyOutcome::Skipped
        } else {
            self.enter(Stage::Notifying);
            match self.notifier.notify(evaluation.alerts()) {
                Ok(()) => NotifyOutcome::Sent,
                Err(e) => {
                    error!("Failed to send alert: {}", e);
                    counter!("aquawatch_notify_failures_total").increment(1);
                    NotifyOutcome::Failed(e.to_string())
                }
            }
        };

        self.enter(Stage::Done);
        let report = SubmissionReport {
            reading,
            evaluation,
            save,
            notification,
        };
        self.enter(Stage::Idle);
        report
    }

    /// Full stored history, oldest first
    pub fn history(&self) -> Result<History, StorageError> {
        self.store.load()
    }

    fn enter(&mut self, stage: Stage) {
        debug!("Pipeline stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::UnconfiguredNotifier;
    use chrono::Timelike;
    use storage::MemoryRepository;

    fn sample(ph: f64) -> WaterSample {
        WaterSample {
            ph,
            temperature: 25.0,
            ammonia: 0.5,
            nitrite: 0.5,
            nitrate: 10.0,
            dissolved_oxygen: 5.0,
        }
    }

    #[test]
    fn test_returns_to_idle() {
        let mut service = MonitorService::new(MemoryRepository::new(), UnconfiguredNotifier);
        assert_eq!(service.stage(), Stage::Idle);
        service.submit(sample(7.0));
        assert_eq!(service.stage(), Stage::Idle);
    }

    #[test]
    fn test_nominal_submission_skips_notifier() {
        let mut service = MonitorService::new(MemoryRepository::new(), UnconfiguredNotifier);
        let report = service.submit(sample(7.0));
        assert!(report.saved());
        assert_eq!(report.notification, NotifyOutcome::Skipped);
        assert_eq!(report.status_messages(), vec!["Data saved successfully!"]);
    }

    #[test]
    fn test_notify_failure_keeps_saved_row() {
        let mut service = MonitorService::new(MemoryRepository::new(), UnconfiguredNotifier);
        let report = service.submit(sample(5.5));
        assert!(report.saved());
        assert_eq!(
            report.notification,
            NotifyOutcome::Failed("Email notifications are not configured".to_string())
        );
        assert_eq!(service.history().unwrap().len(), 1);
        assert_eq!(
            report.status_messages()[1],
            "Failed to send alert email: Email notifications are not configured"
        );
    }

    #[test]
    fn test_timestamp_truncated_to_seconds() {
        let mut service = MonitorService::new(MemoryRepository::new(), UnconfiguredNotifier);
        let report = service.submit(sample(7.0));
        assert_eq!(report.reading.timestamp.nanosecond(), 0);
    }
}
