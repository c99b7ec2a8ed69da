//! A monitor is the unit of scheduling: one task, an optional condition,
//! a polling interval and the previous condition result.

pub mod report;
pub mod transition;

pub use report::TickReport;
pub use transition::TransitionTracker;

use std::time::Duration;

use crate::condition::Condition;
use crate::error::{ConfigError, TickError};
use crate::task::Task;

#[derive(Debug)]
pub struct Monitor {
    id: usize,
    name: String,
    task: Task,
    condition: Option<Condition>,
    interval: Duration,
    transitions: TransitionTracker,
}

impl Monitor {
    /// Create a monitor, checking that the condition accepts what the task produces
    pub fn new(
        id: usize,
        name: impl Into<String>,
        task: Task,
        condition: Option<Condition>,
        interval: Duration,
    ) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "polling interval must be greater than zero".to_string(),
            ));
        }

        if let Some(condition) = &condition {
            if condition.input_kind() != task.output_kind() {
                return Err(ConfigError::ConditionMismatch {
                    condition: condition.name(),
                    expected: condition.input_kind(),
                    actual: task.output_kind(),
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            task,
            condition,
            interval,
            transitions: TransitionTracker::new(),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn previous_result(&self) -> Option<bool> {
        self.transitions.previous()
    }

    /// Run the task, evaluate the condition and apply the transition policy.
    ///
    /// A failure leaves the previous result untouched.
    pub async fn tick(&mut self) -> Result<TickReport, TickError> {
        let observation = self.task.perform().await?;

        let Some(condition) = self.condition.as_mut() else {
            return Ok(TickReport {
                monitor: self.name.clone(),
                observation,
                condition: None,
                transition: false,
                alarm: false,
            });
        };

        let evaluation = condition.evaluate(&observation).await?;
        let transition = self.transitions.observe(evaluation.result);
        let alarm = evaluation.result == condition.alarm_state() || transition;

        Ok(TickReport {
            monitor: self.name.clone(),
            observation,
            condition: Some((condition.to_string(), evaluation)),
            transition,
            alarm,
        })
    }
}
