//! In-process fan-out of workflow events over a tokio broadcast channel.

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use verdict_application::EventPublisher;
use verdict_domain::WorkflowEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Publisher that hands every event to all current subscribers.
///
/// Publishing never blocks. Events sent while nobody is subscribed are
/// dropped, and slow subscribers skip what they lagged behind on.
pub struct BroadcastEventBus {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Forward every event to `sink` until `cancel` fires.
    ///
    /// Events already queued when cancellation arrives are still delivered.
    pub fn spawn_subscriber(
        &self,
        sink: Arc<dyn EventPublisher>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let mut receiver = self.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    received = receiver.recv() => match received {
                        Ok(event) => sink.publish(event),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Event subscriber lagged, skipped {} events", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = cancel.cancelled() => {
                        loop {
                            match receiver.try_recv() {
                                Ok(event) => sink.publish(event),
                                Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
            debug!("Event subscriber stopped");
        })
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for BroadcastEventBus {
    fn publish(&self, event: WorkflowEvent) {
        // Err only means there are no subscribers right now
        let _ = self.sender.send(event);
    }
}
