use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::condition::{
    Condition, ContentDiffCondition, FreshnessCondition, StalenessCondition, ThresholdCondition,
};
use crate::config::helper::{parse_duration, seconds_span};
use crate::error::ConfigError;
use crate::monitor::Monitor;
use crate::resource::Resource;
use crate::task::{Task, TaskType};

const DEFAULT_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_NOT_OLDER_THAN_SECONDS: u64 = 60;

// JSON/YAML structure of one task descriptor
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub resource: ResourceConfig,
    pub task_type: TaskType,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub condition: Option<ConditionConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "resourceType", rename_all_fields = "camelCase")]
pub enum ResourceConfig {
    GeneralFileResource {
        file_path: PathBuf,
    },
    UrlResource {
        url: String,
    },
    ConnectionStringWithQueryResource {
        connection_string: String,
        query: String,
    },
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    #[serde(default)]
    pub interval_seconds: Option<u64>,
    /// Duration string such as "30s"; wins over `intervalSeconds`
    #[serde(default)]
    pub interval: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "conditionType", rename_all_fields = "camelCase")]
pub enum ConditionConfig {
    DateTimeNotOlderThanTimeSpanCondition {
        #[serde(default = "default_not_older_than")]
        not_older_than_seconds: u64,
        warn_when: bool,
    },
    ContentIsDifferentCondition {
        content_file_path: PathBuf,
        warn_when: bool,
    },
    SqlQueryResultIsOlderThanCondition {
        limit_seconds: u64,
        warn_when: bool,
    },
    SqlQueryIntResultIsGreaterThanCondition {
        value: i64,
        warn_when: bool,
    },
}

fn default_not_older_than() -> u64 {
    DEFAULT_NOT_OLDER_THAN_SECONDS
}

impl TaskConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    /// Validate the descriptor and turn it into a runnable monitor
    pub fn build(&self, id: usize, http_client: &reqwest::Client) -> Result<Monitor, ConfigError> {
        let task = Task::build(self.task_type, self.resource.to_resource(), http_client)?;
        let condition = self
            .condition
            .as_ref()
            .map(ConditionConfig::to_condition)
            .transpose()?;

        Monitor::new(
            id,
            self.display_name(),
            task,
            condition,
            self.schedule.to_interval()?,
        )
    }
}

impl ResourceConfig {
    pub fn to_resource(&self) -> Resource {
        match self {
            ResourceConfig::GeneralFileResource { file_path } => Resource::file(file_path),
            ResourceConfig::UrlResource { url } => Resource::url(url.as_str()),
            ResourceConfig::ConnectionStringWithQueryResource {
                connection_string,
                query,
            } => Resource::sql(connection_string.as_str(), query.as_str()),
        }
    }
}

impl ScheduleConfig {
    pub fn to_interval(&self) -> Result<Duration, ConfigError> {
        let interval = match &self.interval {
            Some(text) => parse_duration(text)?,
            None => Duration::from_secs(self.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS)),
        };

        if interval.is_zero() {
            return Err(ConfigError::InvalidValue(
                "schedule interval must be greater than zero".to_string(),
            ));
        }
        Ok(interval)
    }
}

impl ConditionConfig {
    pub fn to_condition(&self) -> Result<Condition, ConfigError> {
        let condition = match self {
            ConditionConfig::DateTimeNotOlderThanTimeSpanCondition {
                not_older_than_seconds,
                warn_when,
            } => Condition::DateTimeFreshness(FreshnessCondition::new(
                seconds_span("notOlderThanSeconds", *not_older_than_seconds)?,
                *warn_when,
            )),
            ConditionConfig::ContentIsDifferentCondition {
                content_file_path,
                warn_when,
            } => Condition::ContentDiff(ContentDiffCondition::new(content_file_path, *warn_when)),
            ConditionConfig::SqlQueryResultIsOlderThanCondition {
                limit_seconds,
                warn_when,
            } => Condition::SqlDateTimeFreshness(StalenessCondition::new(
                seconds_span("limitSeconds", *limit_seconds)?,
                *warn_when,
            )),
            ConditionConfig::SqlQueryIntResultIsGreaterThanCondition { value, warn_when } => {
                Condition::SqlIntThreshold(ThresholdCondition::new(*value, *warn_when))
            }
        };
        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<TaskConfig, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn test_file_task_with_freshness_condition() {
        let config = parse(json!({
            "name": "nightly export",
            "resource": { "resourceType": "GeneralFileResource", "filePath": "/tmp/export.csv" },
            "taskType": "GetFileLastModifiedDateTask",
            "schedule": { "intervalSeconds": 30 },
            "condition": {
                "conditionType": "DateTimeNotOlderThanTimeSpanCondition",
                "notOlderThanSeconds": 120,
                "warnWhen": true
            }
        }))
        .unwrap();

        assert_eq!(config.task_type, TaskType::FileLastModified);
        assert_eq!(
            config.resource,
            ResourceConfig::GeneralFileResource {
                file_path: PathBuf::from("/tmp/export.csv")
            }
        );

        let monitor = config.build(4, &reqwest::Client::new()).unwrap();
        assert_eq!(monitor.id(), 4);
        assert_eq!(monitor.name(), "nightly export");
        assert_eq!(monitor.interval(), Duration::from_secs(30));
        match monitor.condition() {
            Some(Condition::DateTimeFreshness(condition)) => {
                assert_eq!(condition.max_age, TimeDelta::seconds(120));
                assert!(condition.warn_when);
            }
            other => panic!("unexpected condition: {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let config = parse(json!({
            "resource": { "resourceType": "GeneralFileResource", "filePath": "a.txt" },
            "taskType": "GetFileLastModifiedDateTask",
            "condition": {
                "conditionType": "DateTimeNotOlderThanTimeSpanCondition",
                "warnWhen": false
            }
        }))
        .unwrap();

        let monitor = config.build(0, &reqwest::Client::new()).unwrap();
        assert_eq!(monitor.name(), "(unnamed)");
        assert_eq!(monitor.interval(), Duration::from_secs(60));
        match monitor.condition() {
            Some(Condition::DateTimeFreshness(condition)) => {
                assert_eq!(condition.max_age, TimeDelta::seconds(60));
            }
            other => panic!("unexpected condition: {:?}", other),
        }
    }

    #[test]
    fn test_warn_when_is_required() {
        let result = parse(json!({
            "resource": { "resourceType": "UrlResource", "url": "http://localhost" },
            "taskType": "MakeWebRequestTask",
            "condition": {
                "conditionType": "ContentIsDifferentCondition",
                "contentFilePath": "content.txt"
            }
        }));

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("warnWhen"));
    }

    #[test]
    fn test_unknown_types_are_rejected() {
        assert!(parse(json!({
            "resource": { "resourceType": "FtpResource", "host": "x" },
            "taskType": "GetFileLastModifiedDateTask"
        }))
        .is_err());

        assert!(parse(json!({
            "resource": { "resourceType": "UrlResource", "url": "http://x" },
            "taskType": "PingTask"
        }))
        .is_err());
    }

    #[test]
    fn test_incompatible_resource() {
        let config = parse(json!({
            "name": "bad",
            "resource": { "resourceType": "UrlResource", "url": "http://localhost" },
            "taskType": "SqlQueryIntTask"
        }))
        .unwrap();

        let error = config.build(0, &reqwest::Client::new()).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::IncompatibleResource {
                task_type: "SqlQueryIntTask",
                expected: "ConnectionStringWithQueryResource"
            }
        ));
    }

    #[test]
    fn test_condition_must_match_task_output() {
        let config = parse(json!({
            "resource": {
                "resourceType": "ConnectionStringWithQueryResource",
                "connectionString": ":memory:",
                "query": "select 1"
            },
            "taskType": "SqlQueryIntTask",
            "condition": {
                "conditionType": "SqlQueryResultIsOlderThanCondition",
                "limitSeconds": 60,
                "warnWhen": true
            }
        }))
        .unwrap();

        let error = config.build(0, &reqwest::Client::new()).unwrap_err();
        assert!(matches!(error, ConfigError::ConditionMismatch { .. }));
    }

    #[test]
    fn test_sql_int_threshold() {
        let config = parse(json!({
            "name": "failed jobs",
            "resource": {
                "resourceType": "ConnectionStringWithQueryResource",
                "connectionString": "jobs.db",
                "query": "select count(*) from failed_jobs"
            },
            "taskType": "SqlQueryIntTask",
            "schedule": { "interval": "5m" },
            "condition": {
                "conditionType": "SqlQueryIntResultIsGreaterThanCondition",
                "value": 0,
                "warnWhen": true
            }
        }))
        .unwrap();

        let monitor = config.build(1, &reqwest::Client::new()).unwrap();
        assert_eq!(monitor.interval(), Duration::from_secs(300));
        assert_eq!(monitor.task().type_name(), "SqlQueryIntTask");
    }

    #[test]
    fn test_schedule_interval() {
        let zero = ScheduleConfig {
            interval_seconds: Some(0),
            interval: None,
        };
        assert!(matches!(zero.to_interval(), Err(ConfigError::InvalidValue(_))));

        let both = ScheduleConfig {
            interval_seconds: Some(10),
            interval: Some("2h".to_string()),
        };
        assert_eq!(both.to_interval().unwrap(), Duration::from_secs(7200));

        let bad = ScheduleConfig {
            interval_seconds: None,
            interval: Some("soon".to_string()),
        };
        assert!(bad.to_interval().is_err());
    }
}
