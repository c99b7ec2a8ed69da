pub mod helper;
pub mod loader;
pub mod notifier_config;
pub mod tasks_config;

pub use loader::{load_config, parse_config, resolve_config_path, ConfigFormat, LoadedConfig, RejectedTask};
pub use notifier_config::NotifierConfig;
pub use tasks_config::{ConditionConfig, ResourceConfig, ScheduleConfig, TaskConfig};

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 5;

/// Top-level configuration document.
///
/// Task descriptors stay untyped here so that one malformed descriptor does
/// not reject the whole document.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub tasks: Vec<serde_json::Value>,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_shutdown_grace() -> u64 {
    DEFAULT_SHUTDOWN_GRACE_SECONDS
}

impl ConfigFile {
    /// Document holding only task descriptors, everything else defaulted
    pub fn from_tasks(tasks: Vec<serde_json::Value>) -> Self {
        Self {
            tasks,
            notifier: NotifierConfig::default(),
            http: HttpConfig::default(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}
