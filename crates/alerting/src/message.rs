//! Alert Message Composition

/// Subject of every alert email
pub const ALERT_SUBJECT: &str = "Water Quality Alert - Aquaponics";

/// A single aggregated alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    /// Combine alerts into one message, one alert per line.
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_alerts(alerts: &[String]) -> Option<Self> {
        if alerts.is_empty() {
            return None;
        }
        Some(Self {
            subject: ALERT_SUBJECT.to_string(),
            body: alerts.join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_alerts_produce_no_message() {
        assert!(AlertMessage::from_alerts(&[]).is_none());
    }

    #[test]
    fn test_body_joins_alerts_in_order() {
        let alerts = vec![
            "pH out of range! Check the system.".to_string(),
            "Low oxygen! Increase aeration.".to_string(),
        ];
        let msg = AlertMessage::from_alerts(&alerts).unwrap();
        assert_eq!(msg.subject, ALERT_SUBJECT);
        assert_eq!(
            msg.body,
            "pH out of range! Check the system.\nLow oxygen! Increase aeration."
        );
    }
}
