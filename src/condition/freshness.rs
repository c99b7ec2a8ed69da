use chrono::{DateTime, TimeDelta, Utc};

use super::{format_span, Evaluation};

/// True when the timestamp is no older than `max_age` (inclusive).
/// The threshold is recomputed from the wall clock on every call.
#[derive(Debug, Clone)]
pub struct FreshnessCondition {
    pub max_age: TimeDelta,
    pub warn_when: bool,
}

/// True when the timestamp is older than `limit`, i.e. the data is stale.
/// Inverse sense of [`FreshnessCondition`]: true signals the alert directly.
#[derive(Debug, Clone)]
pub struct StalenessCondition {
    pub limit: TimeDelta,
    pub warn_when: bool,
}

fn threshold(now: DateTime<Utc>, span: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(span)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn age_minutes(now: DateTime<Utc>, value: DateTime<Utc>) -> i64 {
    (now - value).num_minutes()
}

impl FreshnessCondition {
    pub fn new(max_age: TimeDelta, warn_when: bool) -> Self {
        Self { max_age, warn_when }
    }

    pub fn evaluate(&self, value: DateTime<Utc>) -> Evaluation {
        self.evaluate_at(value, Utc::now())
    }

    pub fn evaluate_at(&self, value: DateTime<Utc>, now: DateTime<Utc>) -> Evaluation {
        let threshold = threshold(now, self.max_age);
        let result = value >= threshold;
        let age = age_minutes(now, value);

        let description = if result {
            format!(
                "fresh: {} minutes old, within {} (threshold {})",
                age,
                format_span(self.max_age),
                threshold.format("%Y-%m-%d %H:%M:%S UTC")
            )
        } else {
            format!(
                "too old: {} minutes old, limit {} (threshold {})",
                age,
                format_span(self.max_age),
                threshold.format("%Y-%m-%d %H:%M:%S UTC")
            )
        };

        Evaluation {
            age_minutes: Some(age),
            ..Evaluation::new(result, description)
        }
    }
}

impl StalenessCondition {
    pub fn new(limit: TimeDelta, warn_when: bool) -> Self {
        Self { limit, warn_when }
    }

    pub fn evaluate(&self, value: DateTime<Utc>) -> Evaluation {
        self.evaluate_at(value, Utc::now())
    }

    pub fn evaluate_at(&self, value: DateTime<Utc>, now: DateTime<Utc>) -> Evaluation {
        let result = value < threshold(now, self.limit);
        let age = age_minutes(now, value);

        let description = if result {
            format!(
                "SQL result is stale. Last value {} minutes old (threshold = {}).",
                age,
                format_span(self.limit)
            )
        } else {
            format!("SQL result is fresh (last value {} minutes ago).", age)
        };

        Evaluation {
            age_minutes: Some(age),
            ..Evaluation::new(result, description)
        }
    }
}
