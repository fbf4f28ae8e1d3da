//! Broadcast coordinator: the single serialization point for chat traffic.
//!
//! Every connection submits into one unbounded, ordered queue. One task
//! drains it and, for each message in turn, censors the body, appends the
//! censored copy to the [`HistoryCache`], then writes it to every member of
//! the room. A member whose write fails is deregistered on the spot and
//! then closed under the same write deadline. Delivery is at-most-once and best-effort: no acknowledgement, no
//! retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{Censor, ChatMessage, ConnectionHandle, HistoryCache, RoomRegistry};

/// A decoded message together with the connection it came from.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// The message as sent by the client (raw body).
    pub message: ChatMessage,
    /// Originating connection. Bookkeeping only; never serialized.
    pub origin: ConnectionHandle,
}

/// Outcome of fanning one message out to its room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FanOutReport {
    /// Connections that accepted the message.
    pub delivered: usize,
    /// Connections closed and deregistered because their write failed.
    pub pruned: usize,
}

/// Submission side of the coordinator. Cheap to clone; one per connection.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: mpsc::UnboundedSender<InboundMessage>,
    write_timeout: Duration,
}

impl Broadcaster {
    /// Spawns the coordinator task and returns its submission handle.
    ///
    /// The task runs until every [`Broadcaster`] clone has been dropped.
    #[must_use]
    pub fn spawn(
        registry: Arc<RoomRegistry>,
        history: Arc<HistoryCache>,
        censor: Arc<dyn Censor>,
        write_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let coordinator = Coordinator {
            registry,
            history,
            censor,
            write_timeout,
        };
        let task = tokio::spawn(coordinator.run(receiver));
        (
            Self {
                sender,
                write_timeout,
            },
            task,
        )
    }

    /// Deadline applied to each write and to closing a connection.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Queues a message for processing. Never blocks.
    ///
    /// Returns `false` if the coordinator has stopped.
    pub fn submit(&self, inbound: InboundMessage) -> bool {
        self.sender.send(inbound).is_ok()
    }
}

#[derive(Debug)]
struct Coordinator {
    registry: Arc<RoomRegistry>,
    history: Arc<HistoryCache>,
    censor: Arc<dyn Censor>,
    write_timeout: Duration,
}

impl Coordinator {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<InboundMessage>) {
        while let Some(inbound) = receiver.recv().await {
            let report = self.process(inbound).await;
            if report.pruned > 0 {
                tracing::debug!(
                    delivered = report.delivered,
                    pruned = report.pruned,
                    "fan-out pruned dead connections"
                );
            }
        }
        tracing::debug!("broadcast queue closed, coordinator exiting");
    }

    async fn process(&self, inbound: InboundMessage) -> FanOutReport {
        let InboundMessage { message, origin } = inbound;
        let censored = message.with_body(self.censor.censor(&message.message));
        let website = censored.website.clone();

        self.history.append(&website, censored.clone()).await;

        let payload = match serde_json::to_string(&censored) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, %website, "failed to encode chat envelope");
                return FanOutReport::default();
            }
        };

        let mut report = FanOutReport::default();
        for member in self.registry.members_of(&website).await {
            match member.deliver(payload.clone(), self.write_timeout).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        connection = %member.id(),
                        origin = %origin.id(),
                        %website,
                        error = %e,
                        "delivery failed, dropping connection"
                    );
                    self.registry.deregister(&website, &member).await;
                    member.close(self.write_timeout).await;
                    report.pruned += 1;
                }
            }
        }
        report
    }
}
