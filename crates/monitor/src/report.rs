//! Submission Outcome Types

use serde::Serialize;
use water_quality::{EvaluationResult, Reading};

/// Result of the persisting step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

/// Result of the notifying step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "error")]
pub enum NotifyOutcome {
    /// No alerts, nothing sent
    Skipped,
    Sent,
    Failed(String),
}

/// Everything the presentation layer needs after one submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub reading: Reading,
    pub evaluation: EvaluationResult,
    pub save: SaveOutcome,
    pub notification: NotifyOutcome,
}

impl SubmissionReport {
    pub fn saved(&self) -> bool {
        self.save == SaveOutcome::Saved
    }

    /// User-facing status lines for the save and notify steps
    pub fn status_messages(&self) -> Vec<String> {
        let mut messages = Vec::with_capacity(2);
        match &self.save {
            SaveOutcome::Saved => messages.push("Data saved successfully!".to_string()),
            SaveOutcome::Failed(e) => messages.push(format!("Failed to save reading: {e}")),
        }
        match &self.notification {
            NotifyOutcome::Skipped => {}
            NotifyOutcome::Sent => messages.push("Alert email sent successfully!".to_string()),
            NotifyOutcome::Failed(e) => messages.push(format!("Failed to send alert email: {e}")),
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json_shape() {
        let saved = serde_json::to_value(SaveOutcome::Saved).unwrap();
        assert_eq!(saved, serde_json::json!({ "status": "saved" }));

        let failed = serde_json::to_value(NotifyOutcome::Failed("timeout".into())).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({ "status": "failed", "error": "timeout" })
        );
    }
}
