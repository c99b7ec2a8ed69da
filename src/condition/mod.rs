//! Stateful predicates over a task's observation
//!
//! Every condition carries a `warn_when` flag. Together with the condition's
//! own sense (a "health" predicate is true when things are fine, an "alert"
//! predicate is true when something needs attention) it decides which
//! boolean result is rendered as an alarm, see [`Condition::alarm_state`].

pub mod content_diff;
pub mod freshness;
pub mod threshold;

pub use content_diff::ContentDiffCondition;
pub use freshness::{FreshnessCondition, StalenessCondition};
pub use threshold::ThresholdCondition;

use chrono::TimeDelta;
use std::fmt;

use crate::error::ConditionError;
use crate::task::{Observation, ObservationKind};

/// Outcome of one evaluation, carrying every derived diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: bool,
    pub description: String,
    /// Age of the observed timestamp, for the freshness conditions
    pub age_minutes: Option<i64>,
    /// First differing character, for content comparison
    pub first_difference: Option<usize>,
}

impl Evaluation {
    pub fn new(result: bool, description: impl Into<String>) -> Self {
        Self {
            result,
            description: description.into(),
            age_minutes: None,
            first_difference: None,
        }
    }
}

#[derive(Debug)]
pub enum Condition {
    DateTimeFreshness(FreshnessCondition),
    ContentDiff(ContentDiffCondition),
    SqlIntThreshold(ThresholdCondition),
    SqlDateTimeFreshness(StalenessCondition),
}

impl Condition {
    /// Configuration name of the condition type
    pub fn name(&self) -> &'static str {
        match self {
            Condition::DateTimeFreshness(_) => "DateTimeNotOlderThanTimeSpanCondition",
            Condition::ContentDiff(_) => "ContentIsDifferentCondition",
            Condition::SqlIntThreshold(_) => "SqlQueryIntResultIsGreaterThanCondition",
            Condition::SqlDateTimeFreshness(_) => "SqlQueryResultIsOlderThanCondition",
        }
    }

    /// Kind of observation this condition accepts
    pub fn input_kind(&self) -> ObservationKind {
        match self {
            Condition::DateTimeFreshness(_) | Condition::SqlDateTimeFreshness(_) => {
                ObservationKind::Timestamp
            }
            Condition::ContentDiff(_) => ObservationKind::Text,
            Condition::SqlIntThreshold(_) => ObservationKind::Integer,
        }
    }

    pub fn warn_when(&self) -> bool {
        match self {
            Condition::DateTimeFreshness(condition) => condition.warn_when,
            Condition::ContentDiff(condition) => condition.warn_when(),
            Condition::SqlIntThreshold(condition) => condition.warn_when,
            Condition::SqlDateTimeFreshness(condition) => condition.warn_when,
        }
    }

    /// The result value that is rendered as an alarm.
    ///
    /// `DateTimeFreshness` is true when the timestamp is recent, so with
    /// `warn_when` set the alarm state is `false`. The other conditions are
    /// true when something needs attention, so the alarm state is `warn_when`.
    pub fn alarm_state(&self) -> bool {
        match self {
            Condition::DateTimeFreshness(condition) => !condition.warn_when,
            _ => self.warn_when(),
        }
    }

    /// Evaluate the condition against one observation
    pub async fn evaluate(&mut self, value: &Observation) -> Result<Evaluation, ConditionError> {
        let (name, expected) = (self.name(), self.input_kind());
        match (self, value) {
            (Condition::DateTimeFreshness(condition), Observation::Timestamp(ts)) => {
                Ok(condition.evaluate(*ts))
            }
            (Condition::SqlDateTimeFreshness(condition), Observation::Timestamp(ts)) => {
                Ok(condition.evaluate(*ts))
            }
            (Condition::ContentDiff(condition), Observation::Text(text)) => {
                condition.evaluate(text).await
            }
            (Condition::SqlIntThreshold(condition), Observation::Integer(number)) => {
                Ok(condition.evaluate(*number))
            }
            (_, other) => Err(ConditionError::UnexpectedInput {
                condition: name,
                expected,
                actual: other.kind(),
            }),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self {
            Condition::DateTimeFreshness(condition) => {
                format!("not older than {}", format_span(condition.max_age))
            }
            Condition::SqlDateTimeFreshness(condition) => {
                format!("older than {}", format_span(condition.limit))
            }
            Condition::ContentDiff(condition) => {
                format!("content file {}", condition.storage_path().display())
            }
            Condition::SqlIntThreshold(condition) => {
                format!("greater than {}", condition.limit)
            }
        };
        write!(f, "{}: {} (warnWhen: {})", self.name(), detail, self.warn_when())
    }
}

/// Compact rendering of a span, e.g. `1h 5m 30s`
pub fn format_span(span: TimeDelta) -> String {
    let total = span.num_seconds();
    if total <= 0 {
        return "0s".to_string();
    }

    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}
