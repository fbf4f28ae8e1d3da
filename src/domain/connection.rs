//! Opaque handle to one live client connection.
//!
//! A [`ConnectionHandle`] pairs a [`ConnectionId`] with the outbound half of
//! the transport. The coordinator writes through it directly, so a write
//! error is observed at the moment of delivery and can be turned into a
//! prune of the registry.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt};
use tokio::sync::Mutex;

use super::ConnectionId;
use crate::error::DeliveryError;

/// Type-erased outbound sink of serialized envelopes.
pub(crate) type OutboundSink = Pin<Box<dyn Sink<String, Error = DeliveryError> + Send>>;

/// Comparable, cloneable identity of a live duplex connection.
///
/// Equality and hashing use the [`ConnectionId`] only; clones share the
/// same underlying sink.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sink: Arc<Mutex<OutboundSink>>,
}

impl ConnectionHandle {
    /// Wraps `sink` in a handle with a fresh [`ConnectionId`].
    #[must_use]
    pub fn new<S>(sink: S) -> Self
    where
        S: Sink<String, Error = DeliveryError> + Send + 'static,
    {
        Self {
            id: ConnectionId::new(),
            sink: Arc::new(Mutex::new(Box::pin(sink))),
        }
    }

    /// Returns the identity of this connection.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Writes one serialized envelope, failing if the transport reports an
    /// error or the write does not finish within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] when the sink rejects the frame
    /// and [`DeliveryError::TimedOut`] when the peer stalls.
    pub async fn deliver(&self, text: String, timeout: Duration) -> Result<(), DeliveryError> {
        let write = async {
            let mut guard = self.sink.lock().await;
            let sink: &mut OutboundSink = &mut guard;
            sink.send(text).await
        };
        match tokio::time::timeout(timeout, write).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::TimedOut(timeout)),
        }
    }

    /// Closes the outbound half, giving up after `timeout`.
    ///
    /// Closing flushes whatever the transport still buffers, which never
    /// finishes on a stalled peer. Errors and timeouts are logged and
    /// otherwise ignored.
    pub async fn close(&self, timeout: Duration) {
        let close = async {
            let mut guard = self.sink.lock().await;
            let sink: &mut OutboundSink = &mut guard;
            sink.close().await
        };
        match tokio::time::timeout(timeout, close).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(connection = %self.id, error = %e, "close on dead connection");
            }
            Err(_) => {
                tracing::debug!(connection = %self.id, ?timeout, "close timed out, abandoning");
            }
        }
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl Hash for ConnectionHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;

    use super::testing::{broken_handle, channel_handle, stalled_handle};
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn deliver_writes_to_sink() {
        let (handle, mut rx) = channel_handle();
        tokio_test::assert_ok!(handle.deliver("hello".to_string(), TIMEOUT).await);
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn deliver_reports_transport_failure() {
        let handle = broken_handle();
        let result = handle.deliver("hello".to_string(), TIMEOUT).await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }

    #[tokio::test]
    async fn deliver_fails_when_peer_is_gone() {
        let (handle, rx) = channel_handle();
        drop(rx);
        let result = handle.deliver("hello".to_string(), TIMEOUT).await;
        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_times_out_on_stalled_sink() {
        let handle = stalled_handle();
        let result = handle.deliver("hello".to_string(), TIMEOUT).await;
        assert!(matches!(result, Err(DeliveryError::TimedOut(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn close_gives_up_on_stalled_sink() {
        let handle = stalled_handle();
        let _ = handle.deliver("hello".to_string(), TIMEOUT).await;

        // The abandoned write is still buffered; flushing it never finishes.
        let closed = tokio::time::timeout(Duration::from_secs(3600), handle.close(TIMEOUT)).await;
        assert!(closed.is_ok(), "close blocked on a stalled peer");
    }

    #[tokio::test]
    async fn close_on_healthy_sink_completes() {
        let (handle, _rx) = channel_handle();
        tokio_test::assert_ok!(handle.deliver("hello".to_string(), TIMEOUT).await);
        handle.close(TIMEOUT).await;
    }

    #[test]
    fn clones_compare_equal_and_hash_once() {
        let (handle, _rx) = channel_handle();
        let (other, _rx2) = channel_handle();
        let mut set = HashSet::new();
        set.insert(handle.clone());
        set.insert(handle.clone());
        set.insert(other.clone());
        assert_eq!(set.len(), 2);
        assert_eq!(handle, handle.clone());
        assert_ne!(handle, other);
    }
}
