//! Presentation side effects for notifications

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::NotificationEvent;
use crate::error::NotifyError;

/// Shortest display time passed on to external notification commands
pub const MIN_TIMEOUT: Duration = Duration::from_millis(1000);

/// How long a notification command may run before it is killed
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Renders one notification somewhere visible to a human
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn present(&self, event: &NotificationEvent) -> Result<(), NotifyError>;
}

/// Writes notifications to the tracing log
#[derive(Debug, Default)]
pub struct LogPresenter;

#[async_trait]
impl Presenter for LogPresenter {
    async fn present(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        warn!(severity = %event.severity, "🔔 {}: {}", event.title, event.body);
        Ok(())
    }
}

/// Runs an external command per notification, e.g. `notify-send`.
///
/// Every argument may contain `{title}`, `{body}`, `{severity}` and
/// `{timeout}` (milliseconds) placeholders.
#[derive(Debug, Clone)]
pub struct CommandPresenter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandPresenter {
    /// Build from an argv list, `None` if it is empty
    pub fn new(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments with placeholders resolved for `event`
    pub fn resolve_args(&self, event: &NotificationEvent) -> Vec<String> {
        let timeout = event.timeout_hint.max(MIN_TIMEOUT).as_millis().to_string();
        let severity = event.severity.to_string();

        self.args
            .iter()
            .map(|arg| {
                arg.replace("{title}", &event.title)
                    .replace("{body}", &event.body)
                    .replace("{severity}", &severity)
                    .replace("{timeout}", &timeout)
            })
            .collect()
    }
}

#[async_trait]
impl Presenter for CommandPresenter {
    async fn present(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        let args = self.resolve_args(event);
        debug!("Executing notification command: {} {:?}", self.program, args);

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                NotifyError::Presentation(format!(
                    "{} did not finish within {:?}",
                    self.program, self.timeout
                ))
            })?
            .map_err(|e| NotifyError::Presentation(format!("{}: {}", self.program, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(NotifyError::Presentation(format!(
                "{} failed with status {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::Severity;

    fn event(timeout: Duration) -> NotificationEvent {
        NotificationEvent::new("disk", "too old", Severity::Warning, timeout)
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(CommandPresenter::new(&[]).is_none());
    }

    #[test]
    fn test_placeholders_are_resolved() {
        let argv: Vec<String> = ["notify-send", "-t", "{timeout}", "[{severity}] {title}", "{body}"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let presenter = CommandPresenter::new(&argv).unwrap();

        assert_eq!(
            presenter.resolve_args(&event(Duration::from_secs(5))),
            vec!["-t", "5000", "[warning] disk", "too old"]
        );
    }

    #[test]
    fn test_timeout_is_clamped() {
        let argv = vec!["echo".to_string(), "{timeout}".to_string()];
        let presenter = CommandPresenter::new(&argv).unwrap();

        assert_eq!(
            presenter.resolve_args(&event(Duration::from_millis(10))),
            vec!["1000"]
        );
    }

    #[tokio::test]
    async fn test_command_success() {
        let presenter = CommandPresenter::new(&["true".to_string()]).unwrap();
        assert!(presenter.present(&event(MIN_TIMEOUT)).await.is_ok());
    }

    #[tokio::test]
    async fn test_command_failure() {
        let presenter = CommandPresenter::new(&["false".to_string()]).unwrap();
        let result = presenter.present(&event(MIN_TIMEOUT)).await;
        assert!(matches!(result, Err(NotifyError::Presentation(_))));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let argv = vec!["definitely-not-a-real-notifier-binary".to_string()];
        let presenter = CommandPresenter::new(&argv).unwrap();
        let result = presenter.present(&event(MIN_TIMEOUT)).await;
        assert!(matches!(result, Err(NotifyError::Presentation(_))));
    }

    #[tokio::test]
    async fn test_hung_command_times_out() {
        let argv = vec!["sleep".to_string(), "3600".to_string()];
        let presenter = CommandPresenter::new(&argv)
            .unwrap()
            .with_timeout(Duration::from_millis(100));

        let started = std::time::Instant::now();
        let result = presenter.present(&event(MIN_TIMEOUT)).await;

        assert!(matches!(result, Err(NotifyError::Presentation(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_log_presenter_never_fails() {
        assert!(LogPresenter.present(&event(MIN_TIMEOUT)).await.is_ok());
    }
}
