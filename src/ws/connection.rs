//! WebSocket connection state machine.
//!
//! One [`Session`] per client: it reads envelopes, binds the connection to
//! the first website it names, and hands every decoded message to the
//! [`Broadcaster`]. Outbound writes never happen here; the coordinator
//! writes through the session's [`ConnectionHandle`].

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, Stream, StreamExt, future};

use crate::app_state::AppState;
use crate::domain::{ChatMessage, ConnectionHandle, RoomRegistry};
use crate::error::DeliveryError;
use crate::service::{Broadcaster, InboundMessage};

/// Lifecycle of a client connection. There is no reconnect or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgraded, no message seen yet.
    Connecting,
    /// Bound to a room and registered.
    Subscribed,
    /// Read side finished; deregistered.
    Closed,
}

/// Per-connection read loop state.
#[derive(Debug)]
pub struct Session {
    handle: ConnectionHandle,
    registry: Arc<RoomRegistry>,
    broadcaster: Broadcaster,
    state: ConnectionState,
    website: Option<String>,
}

impl Session {
    /// Creates a session in [`ConnectionState::Connecting`].
    #[must_use]
    pub fn new(
        handle: ConnectionHandle,
        registry: Arc<RoomRegistry>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            handle,
            registry,
            broadcaster,
            state: ConnectionState::Connecting,
            website: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// The website this connection is bound to, once subscribed.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    /// Drives the session until the inbound stream ends or fails, then
    /// deregisters and closes the connection.
    pub async fn run<S>(mut self, mut inbound: S)
    where
        S: Stream<Item = Result<Message, axum::Error>> + Unpin,
    {
        while let Some(frame) = inbound.next().await {
            let flow = match frame {
                Ok(Message::Text(text)) => self.on_text(text.as_str()).await,
                Ok(Message::Close(_)) => ControlFlow::Break(()),
                Ok(_) => ControlFlow::Continue(()),
                Err(e) => {
                    tracing::debug!(connection = %self.handle.id(), error = %e, "read failed");
                    ControlFlow::Break(())
                }
            };
            if flow.is_break() {
                break;
            }
        }
        self.close().await;
        self.handle.close(self.broadcaster.write_timeout()).await;
    }

    /// Handles one text frame.
    ///
    /// A malformed envelope ends the session, the same as a read failure.
    pub async fn on_text(&mut self, text: &str) -> ControlFlow<()> {
        let message = match serde_json::from_str::<ChatMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(connection = %self.handle.id(), error = %e, "malformed envelope");
                return ControlFlow::Break(());
            }
        };

        if self.state == ConnectionState::Connecting {
            self.registry.register(&message.website, &self.handle).await;
            self.website = Some(message.website.clone());
            self.state = ConnectionState::Subscribed;
            tracing::info!(
                connection = %self.handle.id(),
                website = %message.website,
                "client connected"
            );
        } else if let Some(bound) = self
            .website
            .as_deref()
            .filter(|bound| *bound != message.website)
        {
            tracing::debug!(
                connection = %self.handle.id(),
                bound,
                claimed = %message.website,
                "connection stays in its first room"
            );
        }

        let submitted = self.broadcaster.submit(InboundMessage {
            message,
            origin: self.handle.clone(),
        });
        if !submitted {
            tracing::warn!(connection = %self.handle.id(), "broadcast coordinator is gone");
        }
        ControlFlow::Continue(())
    }

    /// Moves to [`ConnectionState::Closed`] and leaves the bound room.
    /// Calling it again is a no-op.
    pub async fn close(&mut self) {
        if let Some(website) = self.website.take() {
            self.registry.deregister(&website, &self.handle).await;
            tracing::info!(connection = %self.handle.id(), %website, "client disconnected");
        }
        self.state = ConnectionState::Closed;
    }
}

/// Runs a single upgraded WebSocket until the client goes away.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let (ws_tx, ws_rx) = socket.split();
    let outbound = ws_tx
        .sink_map_err(DeliveryError::from)
        .with(|text: String| future::ready(Ok::<_, DeliveryError>(Message::text(text))));
    let handle = ConnectionHandle::new(outbound);
    tracing::debug!(connection = %handle.id(), "websocket upgraded");

    Session::new(handle, state.registry, state.broadcaster)
        .run(ws_rx)
        .await;
}
