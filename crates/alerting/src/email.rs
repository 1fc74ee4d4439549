//! Email Delivery via SMTP
//!
//! [`EmailNotifier`] wraps the blocking `lettre` SMTP transport (STARTTLS).
//! Each send opens a fresh connection bounded by `timeout_secs`.

use std::fmt;
use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Deserialize;
use tracing::{debug, info};

use crate::message::AlertMessage;
use crate::{Notifier, NotifyError};

/// SMTP transport settings.
///
/// The password is a secret supplied by configuration or the environment.
#[derive(Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port (STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Sender address
    pub sender: String,
    /// Operator address receiving alerts
    pub recipient: String,
    /// Login name, defaults to the sender address
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
    /// Upper bound for one SMTP exchange (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    5
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sends alert emails to the configured operator
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        info!(
            "Email alerts enabled: {} -> {} via {}:{}",
            config.sender, config.recipient, config.smtp_host, config.smtp_port
        );
        Self { config }
    }

    /// Assemble the plain-text email for `alert`
    pub fn build_message(&self, alert: &AlertMessage) -> Result<Message, NotifyError> {
        let from: Mailbox = self.config.sender.parse()?;
        let to: Mailbox = self.config.recipient.parse()?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(alert.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }

    fn transport(&self) -> Result<SmtpTransport, NotifyError> {
        let username = self
            .config
            .username
            .clone()
            .unwrap_or_else(|| self.config.sender.clone());

        Ok(SmtpTransport::starttls_relay(&self.config.smtp_host)?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(username, self.config.password.clone()))
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build())
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, alerts: &[String]) -> Result<(), NotifyError> {
        let Some(alert) = AlertMessage::from_alerts(alerts) else {
            debug!("No alerts to send");
            return Ok(());
        };

        let email = self.build_message(&alert)?;
        self.transport()?.send(&email)?;

        info!(
            to = %self.config.recipient,
            alerts = alerts.len(),
            "Alert email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1,
            sender: "tank@example.com".to_string(),
            recipient: "operator@example.com".to_string(),
            username: None,
            password: "secret".to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_config_defaults_from_json() {
        let json = r#"{
            "smtp_host": "smtp.example.com",
            "sender": "tank@example.com",
            "recipient": "operator@example.com",
            "password": "hunter2"
        }"#;
        let config: EmailConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.username.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_build_message_headers() {
        let notifier = EmailNotifier::new(config());
        let alert = AlertMessage::from_alerts(&["High nitrate! Check the system.".to_string()])
            .unwrap();
        let email = notifier.build_message(&alert).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Water Quality Alert - Aquaponics"));
        assert!(raw.contains("To: operator@example.com"));
        assert!(raw.contains("High nitrate! Check the system."));
    }

    #[test]
    fn test_bad_recipient_is_address_error() {
        let notifier = EmailNotifier::new(EmailConfig {
            recipient: "not-an-email".to_string(),
            ..config()
        });
        let err = notifier.notify(&["Low oxygen! Increase aeration.".to_string()]);
        assert!(matches!(err, Err(NotifyError::Address(_))));
    }

    #[test]
    fn test_unreachable_server_is_reported() {
        let notifier = EmailNotifier::new(config());
        let err = notifier.notify(&["Low oxygen! Increase aeration.".to_string()]);
        assert!(matches!(err, Err(NotifyError::Transport(_))));
    }

    #[test]
    fn test_empty_alerts_skip_transport() {
        let notifier = EmailNotifier::new(config());
        assert!(notifier.notify(&[]).is_ok());
    }
}
