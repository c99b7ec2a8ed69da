use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::monitor::Monitor;
use crate::notifier::NotifierHandle;
use crate::output::OutputSink;

/// Spawns one independent polling loop per monitor
pub struct Periodic {
    pub monitors: Vec<Monitor>,
    pub output: Arc<OutputSink>,
    pub notifier: NotifierHandle,
}

impl Periodic {
    pub fn new(monitors: Vec<Monitor>, output: Arc<OutputSink>, notifier: NotifierHandle) -> Self {
        Self {
            monitors,
            output,
            notifier,
        }
    }

    /// Start all monitor loops and return their handles.
    ///
    /// Each loop ticks immediately, then once per interval, and exits at the
    /// next wait after `shutdown` is cancelled.
    pub fn start_all_tasks(self, shutdown: &CancellationToken) -> Vec<JoinHandle<()>> {
        self.monitors
            .into_iter()
            .map(|mut monitor| {
                let output = Arc::clone(&self.output);
                let notifier = self.notifier.clone();
                let shutdown = shutdown.clone();

                tokio::spawn(async move {
                    tracing::debug!(
                        "Starting monitor '{}' every {:?}",
                        monitor.name(),
                        monitor.interval()
                    );

                    let mut timer = interval(monitor.interval());
                    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

                    loop {
                        tokio::select! {
                            biased;
                            _ = shutdown.cancelled() => break,
                            _ = timer.tick() => {}
                        }
                        run_tick(&mut monitor, &output, &notifier).await;
                    }

                    tracing::debug!("Monitor '{}' stopped", monitor.name());
                })
            })
            .collect()
    }
}

/// Run one tick of `monitor` and emit its output and notification.
///
/// Returns true when the tick was an alarm or failed.
pub async fn run_tick(monitor: &mut Monitor, output: &OutputSink, notifier: &NotifierHandle) -> bool {
    // Error values must not live across the awaits below
    match monitor.tick().await.map_err(|e| e.to_string()) {
        Ok(report) => {
            let result = report.condition.as_ref().map(|(_, evaluation)| evaluation.result);
            if report.alarm {
                tracing::warn!(
                    monitor = monitor.name(),
                    ?result,
                    transition = report.transition,
                    "Tick raised an alarm"
                );
            } else {
                tracing::info!(monitor = monitor.name(), ?result, "Tick completed");
            }

            if let Err(e) = output.emit(&report).await {
                tracing::warn!(monitor = monitor.name(), "Failed to write output: {}", e);
            }

            if let Some(event) = report.notification() {
                if let Err(e) = notifier.notify(event) {
                    tracing::debug!(monitor = monitor.name(), "Notification dropped: {}", e);
                }
            }

            report.alarm
        }
        Err(e) => {
            tracing::error!(monitor = monitor.name(), "Task execution error: {}", e);
            if let Err(e) = output.emit_error(monitor.name(), &e).await {
                tracing::warn!(monitor = monitor.name(), "Failed to write output: {}", e);
            }
            true
        }
    }
}
