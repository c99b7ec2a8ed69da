//! Shared notification sink fed by every monitor loop
//!
//! Producers enqueue through a cloneable [`NotifierHandle`] without waiting.
//! A single consumer task hands events to a [`Presenter`] one at a time.

pub mod event;
pub mod presenter;

pub use event::{NotificationEvent, Severity};
pub use presenter::{CommandPresenter, LogPresenter, Presenter};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::NotifyError;

/// Producer side of the notifier
#[derive(Debug, Clone)]
pub struct NotifierHandle {
    sender: mpsc::UnboundedSender<NotificationEvent>,
    closing: CancellationToken,
}

impl NotifierHandle {
    /// A handle with no consumer behind it; every `notify` fails with `Closed`
    pub fn disconnected() -> Self {
        let (sender, _) = mpsc::unbounded_channel();
        let closing = CancellationToken::new();
        closing.cancel();
        Self { sender, closing }
    }

    /// Enqueue an event. Never blocks; fails only once the notifier is closed.
    pub fn notify(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        if self.closing.is_cancelled() {
            return Err(NotifyError::Closed);
        }
        self.sender.send(event).map_err(|_| NotifyError::Closed)
    }
}

pub struct Notifier {
    handle: NotifierHandle,
    consumer: JoinHandle<usize>,
    drain_timeout: Duration,
}

impl Notifier {
    /// Start the consumer task
    pub fn spawn(presenter: Arc<dyn Presenter>, drain_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let closing = CancellationToken::new();

        let consumer = tokio::spawn(consume(receiver, presenter, closing.clone()));

        Self {
            handle: NotifierHandle { sender, closing },
            consumer,
            drain_timeout,
        }
    }

    pub fn handle(&self) -> NotifierHandle {
        self.handle.clone()
    }

    /// Stop accepting events and drain what is queued.
    ///
    /// Returns false if the drain timeout expired and the consumer was aborted.
    pub async fn close(self) -> bool {
        self.handle.closing.cancel();

        let mut consumer = self.consumer;
        match tokio::time::timeout(self.drain_timeout, &mut consumer).await {
            Ok(Ok(delivered)) => {
                debug!("Notifier closed after delivering {} events", delivered);
                true
            }
            Ok(Err(e)) => {
                warn!("Notifier consumer ended abnormally: {}", e);
                true
            }
            Err(_) => {
                warn!(
                    "Notifier drain timed out after {:?}, dropping remaining events",
                    self.drain_timeout
                );
                consumer.abort();
                false
            }
        }
    }
}

async fn consume(
    mut receiver: mpsc::UnboundedReceiver<NotificationEvent>,
    presenter: Arc<dyn Presenter>,
    closing: CancellationToken,
) -> usize {
    let mut delivered = 0;

    loop {
        tokio::select! {
            biased;
            event = receiver.recv() => match event {
                Some(event) => {
                    present(presenter.as_ref(), &event).await;
                    delivered += 1;
                }
                None => return delivered,
            },
            _ = closing.cancelled() => break,
        }
    }

    receiver.close();
    while let Ok(event) = receiver.try_recv() {
        present(presenter.as_ref(), &event).await;
        delivered += 1;
    }
    delivered
}

async fn present(presenter: &dyn Presenter, event: &NotificationEvent) {
    if let Err(e) = presenter.present(event).await {
        warn!("Failed to present notification '{}': {}", event.title, e);
    }
}
