//! Domain layer: messages, connection handles, room registry, history
//! cache and the censorship transform.
//!
//! Everything here is transport-agnostic. The registry and the cache own
//! their locking; the WebSocket layer only sees [`ConnectionHandle`]s.

pub mod censor;
pub mod chat_message;
pub mod connection;
pub mod connection_id;
pub mod history_cache;
pub mod room_registry;

pub use censor::{Censor, WordListCensor};
pub use chat_message::ChatMessage;
pub use connection::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use history_cache::HistoryCache;
pub use room_registry::RoomRegistry;
