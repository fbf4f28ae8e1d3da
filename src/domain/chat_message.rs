//! Chat message value shared by the WebSocket and history endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One chat message scoped to a website room.
///
/// This is also the wire envelope: `{"website", "username", "message"}`.
/// The originating connection is deliberately not part of this type; it
/// travels alongside it in [`crate::service::InboundMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Room identifier (the website the client is embedded on).
    pub website: String,
    /// Sender display name.
    #[serde(default)]
    pub username: String,
    /// Message body. Raw on the way in, censored once stored or delivered.
    #[serde(default)]
    pub message: String,
}

impl ChatMessage {
    /// Creates a new message.
    #[must_use]
    pub fn new(
        website: impl Into<String>,
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            username: username.into(),
            message: message.into(),
        }
    }

    /// Returns a copy of this message with `body` replacing the text.
    #[must_use]
    pub fn with_body(&self, body: String) -> Self {
        Self {
            website: self.website.clone(),
            username: self.username.clone(),
            message: body,
        }
    }
}
