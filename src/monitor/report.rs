use std::time::Duration;

use crate::condition::Evaluation;
use crate::notifier::{NotificationEvent, Severity};
use crate::task::Observation;

/// How long a desktop notification should stay visible
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything one successful tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub monitor: String,
    pub observation: Observation,
    /// Condition description and its evaluation, absent for bare tasks
    pub condition: Option<(String, Evaluation)>,
    pub transition: bool,
    pub alarm: bool,
}

impl TickReport {
    pub fn result(&self) -> Option<bool> {
        self.condition
            .as_ref()
            .map(|(_, evaluation)| evaluation.result)
    }

    /// The single human readable line emitted for this tick
    pub fn render_line(&self) -> String {
        match &self.condition {
            Some((condition, evaluation)) => format!(
                "[{}] value: {} | {} | {} | result: {}",
                self.monitor, self.observation, condition, evaluation.description, evaluation.result
            ),
            None => format!("[{}] value: {}", self.monitor, self.observation),
        }
    }

    /// Notification to forward, if this tick is an alarm
    pub fn notification(&self) -> Option<NotificationEvent> {
        if !self.alarm {
            return None;
        }

        let (severity, title) = if self.transition {
            (Severity::Warning, format!("{} changed state", self.monitor))
        } else {
            (Severity::Critical, format!("{} is in alarm state", self.monitor))
        };

        let body = match &self.condition {
            Some((_, evaluation)) => evaluation.description.clone(),
            None => self.observation.to_string(),
        };

        Some(NotificationEvent::new(title, body, severity, NOTIFICATION_TIMEOUT))
    }
}
