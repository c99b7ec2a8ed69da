use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::notifier::presenter::DEFAULT_COMMAND_TIMEOUT;
use crate::notifier::{CommandPresenter, LogPresenter, Presenter};

const DEFAULT_DRAIN_TIMEOUT_SECONDS: u64 = 2;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotifierConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// argv of an external notification command, e.g.
    /// `["notify-send", "-t", "{timeout}", "{title}", "{body}"]`
    #[serde(default)]
    pub command: Option<Vec<String>>,
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_seconds: u64,
    /// Seconds a notification command may run before it is killed
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: None,
            drain_timeout_seconds: default_drain_timeout(),
            command_timeout_seconds: default_command_timeout(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_drain_timeout() -> u64 {
    DEFAULT_DRAIN_TIMEOUT_SECONDS
}

fn default_command_timeout() -> u64 {
    DEFAULT_COMMAND_TIMEOUT.as_secs()
}

impl NotifierConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_seconds)
    }

    /// Presenter selected by this configuration
    pub fn presenter(&self) -> Arc<dyn Presenter> {
        match self.command.as_deref().and_then(CommandPresenter::new) {
            Some(command) => Arc::new(
                command.with_timeout(Duration::from_secs(self.command_timeout_seconds.max(1))),
            ),
            None => Arc::new(LogPresenter),
        }
    }
}
