//! Alerting System
//!
//! Composes the operator alert for out-of-range readings and delivers it
//! through a [`Notifier`].

mod email;
mod message;

pub use email::{EmailConfig, EmailNotifier};
pub use message::{AlertMessage, ALERT_SUBJECT};

use thiserror::Error;

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No transport settings were supplied
    #[error("Email notifications are not configured")]
    NotConfigured,

    /// SMTP transport-level failure (connection, TLS, authentication, timeout)
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Sender or recipient address could not be parsed
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled
    #[error("Email build error: {0}")]
    Build(String),
}

/// Delivers aggregated alerts to an operator
pub trait Notifier: Send + Sync {
    /// Send one message carrying every alert, in order.
    ///
    /// An empty list sends nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` if the message could not be built or delivered.
    fn notify(&self, alerts: &[String]) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, alerts: &[String]) -> Result<(), NotifyError> {
        (**self).notify(alerts)
    }
}

/// Stand-in used when no transport is configured.
///
/// Every delivery attempt fails with [`NotifyError::NotConfigured`] so the
/// operator can see that the alert did not go out.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredNotifier;

impl Notifier for UnconfiguredNotifier {
    fn notify(&self, alerts: &[String]) -> Result<(), NotifyError> {
        if alerts.is_empty() {
            return Ok(());
        }
        tracing::warn!("Dropping {} alert(s): no email transport configured", alerts.len());
        Err(NotifyError::NotConfigured)
    }
}
