use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::tasks_config::TaskConfig;
use crate::config::{ConfigFile, NotifierConfig};
use crate::error::ConfigError;
use crate::monitor::Monitor;

pub const CONFIG_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// YAML for `.yaml`/`.yml`, JSON otherwise
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

/// A task descriptor that could not be turned into a monitor
#[derive(Debug)]
pub struct RejectedTask {
    pub index: usize,
    pub name: String,
    pub error: ConfigError,
}

/// Runnable monitors plus the process-wide settings
#[derive(Debug)]
pub struct LoadedConfig {
    pub monitors: Vec<Monitor>,
    pub rejected: Vec<RejectedTask>,
    pub notifier: NotifierConfig,
    pub shutdown_grace: Duration,
}

/// `--config` if given, else `tasks.json` next to the executable, else
/// `<user config dir>/healthcheck/tasks.json`
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    let beside_executable = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));
    if let Some(path) = beside_executable.as_ref().filter(|p| p.exists()) {
        return path.clone();
    }

    dirs::config_dir()
        .map(|dir| dir.join("healthcheck").join(CONFIG_FILE_NAME))
        .or(beside_executable)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load the configuration file and build every monitor it describes.
///
/// A missing or unparseable document is an error. Individual descriptors
/// that fail to build are logged and returned in `rejected`.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LoadedConfig> {
    let document: serde_json::Value = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON config")?
        }
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse YAML config")?
        }
    };

    let config_file = match document {
        serde_json::Value::Array(tasks) => ConfigFile::from_tasks(tasks),
        object @ serde_json::Value::Object(_) => {
            serde_json::from_value(object).context("Configuration does not contain a 'tasks' array")?
        }
        _ => bail!("Configuration must be a task array or an object with a 'tasks' array"),
    };

    let http_client = reqwest::Client::builder()
        .timeout(config_file.http.timeout())
        .build()
        .map_err(ConfigError::HttpClient)?;

    let mut monitors = Vec::new();
    let mut rejected = Vec::new();

    for (index, descriptor) in config_file.tasks.iter().enumerate() {
        let name = descriptor
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("(unnamed)")
            .to_string();

        let built = serde_json::from_value::<TaskConfig>(descriptor.clone())
            .map_err(ConfigError::from)
            .and_then(|task_config| task_config.build(index, &http_client));

        match built {
            Ok(monitor) => {
                tracing::debug!("Configured task #{}: {}", index, name);
                monitors.push(monitor);
            }
            Err(error) => {
                tracing::error!(task = %name, "Failed to configure task #{}: {}", index, error);
                rejected.push(RejectedTask { index, name, error });
            }
        }
    }

    Ok(LoadedConfig {
        monitors,
        rejected,
        notifier: config_file.notifier.clone(),
        shutdown_grace: config_file.shutdown_grace(),
    })
}
