use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        f.write_str(label)
    }
}

/// A user-visible message with a bounded display lifetime.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NotificationEvent {
    pub message: String,
    pub severity: Severity,
    pub shown_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            shown_at: Utc::now(),
        }
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
