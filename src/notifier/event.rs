use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// One notification handed from a monitor loop to the notifier
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    /// How long a presenter should keep the notification visible
    pub timeout_hint: Duration,
}

impl NotificationEvent {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        severity: Severity,
        timeout_hint: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
            timeout_hint,
        }
    }
}
