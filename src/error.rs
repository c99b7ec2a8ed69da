//! Error taxonomy for monitor construction, ticks and notifications

use std::path::PathBuf;
use thiserror::Error;

use crate::task::ObservationKind;

/// A monitor descriptor that cannot be turned into a runnable monitor.
/// Fatal for that one monitor only.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed task descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("{task_type} requires a {expected}")]
    IncompatibleResource {
        task_type: &'static str,
        expected: &'static str,
    },

    #[error("{condition} expects {expected} input but the task produces {actual}")]
    ConditionMismatch {
        condition: &'static str,
        expected: ObservationKind,
        actual: ObservationKind,
    },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure of a single `perform` call. Aborts the current tick only.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("SQL query failed: {0}")]
    Sql(#[from] libsql::Error),

    #[error("SQL query did not return a {expected} convertible value: {value}")]
    Coercion {
        expected: &'static str,
        value: String,
    },
}

/// Failure while evaluating a condition.
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("{condition} received {actual} input, expected {expected}")]
    UnexpectedInput {
        condition: &'static str,
        expected: ObservationKind,
        actual: ObservationKind,
    },

    #[error("cannot access content file {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that aborts one tick of one monitor.
#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// Notification delivery failures. Always swallowed by callers.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier is closed")]
    Closed,

    #[error("failed to present notification: {0}")]
    Presentation(String),
}
