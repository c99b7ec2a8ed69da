use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::periodic::{run_tick, Periodic};
use crate::monitor::Monitor;
use crate::notifier::NotifierHandle;
use crate::output::OutputSink;

/// Owns the running monitor loops
pub struct Runner {
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
    grace: Duration,
}

impl Runner {
    /// Start one loop per monitor
    pub fn start(
        monitors: Vec<Monitor>,
        output: Arc<OutputSink>,
        notifier: NotifierHandle,
        grace: Duration,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let handles = Periodic::new(monitors, output, notifier).start_all_tasks(&shutdown);

        Self {
            shutdown,
            handles,
            grace,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Stop every loop. In-flight ticks get the grace period to finish,
    /// after which they are aborted. Returns the number of aborted loops.
    pub async fn shutdown(self) -> usize {
        self.shutdown.cancel();

        let deadline = Instant::now() + self.grace;
        let mut aborted = 0;

        for mut handle in self.handles {
            match timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Monitor loop ended abnormally: {}", e),
                Err(_) => {
                    handle.abort();
                    aborted += 1;
                }
            }
        }

        if aborted > 0 {
            warn!("Aborted {} monitor loops after {:?} grace period", aborted, self.grace);
        } else {
            debug!("All monitor loops stopped");
        }
        aborted
    }
}

/// Run exactly one tick of every monitor concurrently.
///
/// Returns the number of ticks that were alarms or failed.
pub async fn check_once(
    monitors: Vec<Monitor>,
    output: Arc<OutputSink>,
    notifier: NotifierHandle,
) -> usize {
    let handles: Vec<_> = monitors
        .into_iter()
        .map(|mut monitor| {
            let output = Arc::clone(&output);
            let notifier = notifier.clone();
            tokio::spawn(async move { run_tick(&mut monitor, &output, &notifier).await })
        })
        .collect();

    let mut alarms = 0;
    for handle in handles {
        match handle.await {
            Ok(true) => alarms += 1,
            Ok(false) => {}
            Err(e) => {
                warn!("Check task ended abnormally: {}", e);
                alarms += 1;
            }
        }
    }
    alarms
}
