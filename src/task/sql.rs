use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use libsql::{Builder, Value};
use tracing::debug;

use crate::error::TaskError;
use crate::resource::SqlResource;

/// Executes a query expected to return a single timestamp,
/// e.g. `select max(updated_at) from orders`
#[derive(Debug)]
pub struct SqlDateTimeTask {
    resource: SqlResource,
    last_value: Option<DateTime<Utc>>,
}

/// Executes a query expected to return a single integer,
/// e.g. `select count(*) from failed_jobs`
#[derive(Debug)]
pub struct SqlIntTask {
    resource: SqlResource,
    last_value: Option<i64>,
}

impl SqlDateTimeTask {
    pub fn new(resource: SqlResource) -> Self {
        Self {
            resource,
            last_value: None,
        }
    }

    pub fn resource(&self) -> &SqlResource {
        &self.resource
    }

    pub fn last_value(&self) -> Option<DateTime<Utc>> {
        self.last_value
    }

    pub async fn perform(&mut self) -> Result<DateTime<Utc>, TaskError> {
        let scalar = query_scalar(&self.resource).await?;
        let value = coerce_timestamp(scalar)?;
        self.last_value = Some(value);
        Ok(value)
    }
}

impl SqlIntTask {
    pub fn new(resource: SqlResource) -> Self {
        Self {
            resource,
            last_value: None,
        }
    }

    pub fn resource(&self) -> &SqlResource {
        &self.resource
    }

    pub fn last_value(&self) -> Option<i64> {
        self.last_value
    }

    pub async fn perform(&mut self) -> Result<i64, TaskError> {
        let scalar = query_scalar(&self.resource).await?;
        let value = coerce_integer(scalar)?;
        self.last_value = Some(value);
        Ok(value)
    }
}

/// Run the query and return the first column of the first row.
/// An empty result set reads as NULL.
async fn query_scalar(resource: &SqlResource) -> Result<Value, TaskError> {
    let database = Builder::new_local(&resource.connection_string)
        .build()
        .await?;
    let connection = database.connect()?;

    let mut rows = connection.query(&resource.query, ()).await?;
    let scalar = match rows.next().await? {
        Some(row) => row.get_value(0)?,
        None => Value::Null,
    };

    debug!("Query \"{}\" returned {:?}", resource.query, scalar);
    Ok(scalar)
}

/// Convert a scalar to a timestamp. NULL maps to the minimum timestamp.
pub fn coerce_timestamp(scalar: Value) -> Result<DateTime<Utc>, TaskError> {
    match scalar {
        Value::Null => Ok(DateTime::<Utc>::MIN_UTC),
        Value::Integer(seconds) => {
            DateTime::from_timestamp(seconds, 0).ok_or_else(|| TaskError::Coercion {
                expected: "datetime",
                value: seconds.to_string(),
            })
        }
        Value::Text(text) => parse_timestamp(&text).ok_or(TaskError::Coercion {
            expected: "datetime",
            value: text,
        }),
        other => Err(TaskError::Coercion {
            expected: "datetime",
            value: format!("{:?}", other),
        }),
    }
}

/// Convert a scalar to an integer. NULL maps to `i64::MIN`.
pub fn coerce_integer(scalar: Value) -> Result<i64, TaskError> {
    match scalar {
        Value::Null => Ok(i64::MIN),
        Value::Integer(value) => Ok(value),
        Value::Real(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        Value::Text(text) => text.trim().parse().map_err(|_| TaskError::Coercion {
            expected: "int",
            value: text,
        }),
        other => Err(TaskError::Coercion {
            expected: "int",
            value: format!("{:?}", other),
        }),
    }
}

/// Accepts RFC 3339, SQLite's `YYYY-MM-DD HH:MM:SS[.fff]` (UTC) and bare dates
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
