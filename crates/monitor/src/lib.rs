//! Water Monitor Pipeline
//!
//! Wires a submitted sample through evaluation, persistence, and alerting.

mod report;
mod service;

pub use report::{NotifyOutcome, SaveOutcome, SubmissionReport};
pub use service::{MonitorService, Stage};
