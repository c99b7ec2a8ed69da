//! Tasks bind one resource to an operation producing one typed observation
//!
//! The set of tasks is closed:
//! - `FileLastModified`: modification time of a file
//! - `WebRequest`: body of an HTTP GET
//! - `SqlDateTime` / `SqlInt`: scalar result of a SQL query

pub mod file;
pub mod sql;
pub mod web;

pub use file::FileLastModifiedTask;
pub use sql::{SqlDateTimeTask, SqlIntTask};
pub use web::WebRequestTask;

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::{ConfigError, TaskError};
use crate::resource::Resource;

/// Longest text preview shown in a tick line
const TEXT_PREVIEW_CHARS: usize = 60;

/// One typed value produced by a task
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Timestamp(DateTime<Utc>),
    Text(String),
    Integer(i64),
}

/// Type tag of an observation, used to match conditions against tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationKind {
    Timestamp,
    Text,
    Integer,
}

impl Observation {
    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::Timestamp(_) => ObservationKind::Timestamp,
            Observation::Text(_) => ObservationKind::Text,
            Observation::Integer(_) => ObservationKind::Integer,
        }
    }
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationKind::Timestamp => write!(f, "timestamp"),
            ObservationKind::Text => write!(f, "text"),
            ObservationKind::Integer => write!(f, "integer"),
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Timestamp(ts) if *ts == DateTime::<Utc>::MIN_UTC => {
                write!(f, "(no value)")
            }
            Observation::Timestamp(ts) => {
                write!(f, "{}", ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"))
            }
            Observation::Integer(i64::MIN) => write!(f, "(no value)"),
            Observation::Integer(value) => write!(f, "{}", value),
            Observation::Text(text) => {
                let preview: String = text
                    .chars()
                    .take(TEXT_PREVIEW_CHARS)
                    .map(|c| if c.is_control() { ' ' } else { c })
                    .collect();
                let ellipsis = if text.chars().count() > TEXT_PREVIEW_CHARS {
                    "..."
                } else {
                    ""
                };
                write!(
                    f,
                    "{} chars \"{}{}\"",
                    text.chars().count(),
                    preview,
                    ellipsis
                )
            }
        }
    }
}

/// Task type names as they appear in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TaskType {
    #[serde(rename = "GetFileLastModifiedDateTask")]
    FileLastModified,
    #[serde(rename = "MakeWebRequestTask")]
    WebRequest,
    #[serde(rename = "SqlQueryDateTimeTask")]
    SqlDateTime,
    #[serde(rename = "SqlQueryIntTask")]
    SqlInt,
}

impl TaskType {
    pub fn name(&self) -> &'static str {
        match self {
            TaskType::FileLastModified => "GetFileLastModifiedDateTask",
            TaskType::WebRequest => "MakeWebRequestTask",
            TaskType::SqlDateTime => "SqlQueryDateTimeTask",
            TaskType::SqlInt => "SqlQueryIntTask",
        }
    }
}

/// A resource bound to the operation that observes it
#[derive(Debug)]
pub enum Task {
    FileLastModified(FileLastModifiedTask),
    WebRequest(WebRequestTask),
    SqlDateTime(SqlDateTimeTask),
    SqlInt(SqlIntTask),
}

impl Task {
    /// Build a task from its configured type and resource.
    ///
    /// Each task type accepts exactly one resource type; any other
    /// combination is rejected here rather than at tick time.
    pub fn build(
        task_type: TaskType,
        resource: Resource,
        http_client: &reqwest::Client,
    ) -> Result<Self, ConfigError> {
        match (task_type, resource) {
            (TaskType::FileLastModified, Resource::File(file)) => {
                Ok(Task::FileLastModified(FileLastModifiedTask::new(file)))
            }
            (TaskType::WebRequest, Resource::Url(url)) => Ok(Task::WebRequest(
                WebRequestTask::new(url, http_client.clone()),
            )),
            (TaskType::SqlDateTime, Resource::SqlQuery(sql)) => {
                Ok(Task::SqlDateTime(SqlDateTimeTask::new(sql)))
            }
            (TaskType::SqlInt, Resource::SqlQuery(sql)) => Ok(Task::SqlInt(SqlIntTask::new(sql))),
            (task_type, _) => Err(ConfigError::IncompatibleResource {
                task_type: task_type.name(),
                expected: match task_type {
                    TaskType::FileLastModified => "GeneralFileResource",
                    TaskType::WebRequest => "UrlResource",
                    TaskType::SqlDateTime | TaskType::SqlInt => {
                        "ConnectionStringWithQueryResource"
                    }
                },
            }),
        }
    }

    /// Kind of observation every successful `perform` yields
    pub fn output_kind(&self) -> ObservationKind {
        match self {
            Task::FileLastModified(_) | Task::SqlDateTime(_) => ObservationKind::Timestamp,
            Task::WebRequest(_) => ObservationKind::Text,
            Task::SqlInt(_) => ObservationKind::Integer,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Task::FileLastModified(_) => TaskType::FileLastModified.name(),
            Task::WebRequest(_) => TaskType::WebRequest.name(),
            Task::SqlDateTime(_) => TaskType::SqlDateTime.name(),
            Task::SqlInt(_) => TaskType::SqlInt.name(),
        }
    }

    /// Human readable description of the observed resource
    pub fn resource_description(&self) -> String {
        match self {
            Task::FileLastModified(task) => task.resource().to_string(),
            Task::WebRequest(task) => task.resource().to_string(),
            Task::SqlDateTime(task) => task.resource().to_string(),
            Task::SqlInt(task) => task.resource().to_string(),
        }
    }

    /// Observe the resource once
    pub async fn perform(&mut self) -> Result<Observation, TaskError> {
        match self {
            Task::FileLastModified(task) => task.perform().await.map(Observation::Timestamp),
            Task::WebRequest(task) => task.perform().await.map(Observation::Text),
            Task::SqlDateTime(task) => task.perform().await.map(Observation::Timestamp),
            Task::SqlInt(task) => task.perform().await.map(Observation::Integer),
        }
    }

    /// Value from the most recent successful `perform`
    pub fn last_value(&self) -> Option<Observation> {
        match self {
            Task::FileLastModified(task) => task.last_value().map(Observation::Timestamp),
            Task::WebRequest(task) => task.last_value().map(|s| Observation::Text(s.to_string())),
            Task::SqlDateTime(task) => task.last_value().map(Observation::Timestamp),
            Task::SqlInt(task) => task.last_value().map(Observation::Integer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_mismatched_resource() {
        let client = reqwest::Client::new();
        let result = Task::build(
            TaskType::FileLastModified,
            Resource::url("http://localhost"),
            &client,
        );

        match result {
            Err(ConfigError::IncompatibleResource {
                task_type,
                expected,
            }) => {
                assert_eq!(task_type, "GetFileLastModifiedDateTask");
                assert_eq!(expected, "GeneralFileResource");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_build_sql_tasks_share_resource_type() {
        let client = reqwest::Client::new();
        let date_task = Task::build(
            TaskType::SqlDateTime,
            Resource::sql(":memory:", "select 1"),
            &client,
        )
        .unwrap();
        let int_task = Task::build(
            TaskType::SqlInt,
            Resource::sql(":memory:", "select 1"),
            &client,
        )
        .unwrap();

        assert_eq!(date_task.output_kind(), ObservationKind::Timestamp);
        assert_eq!(int_task.output_kind(), ObservationKind::Integer);
        assert!(Task::build(TaskType::SqlInt, Resource::file("x"), &client).is_err());
    }

    #[test]
    fn test_task_type_from_config_name() {
        let task_type: TaskType = serde_json::from_str("\"MakeWebRequestTask\"").unwrap();
        assert_eq!(task_type, TaskType::WebRequest);
        assert!(serde_json::from_str::<TaskType>("\"PingTask\"").is_err());
    }

    #[test]
    fn test_observation_display() {
        assert_eq!(Observation::Integer(42).to_string(), "42");
        assert_eq!(Observation::Integer(i64::MIN).to_string(), "(no value)");
        assert_eq!(
            Observation::Timestamp(DateTime::<Utc>::MIN_UTC).to_string(),
            "(no value)"
        );
        assert_eq!(
            Observation::Text("ok\n".to_string()).to_string(),
            "3 chars \"ok \""
        );

        let long = "x".repeat(100);
        let shown = Observation::Text(long).to_string();
        assert!(shown.starts_with("100 chars"));
        assert!(shown.ends_with("...\""));
    }
}
