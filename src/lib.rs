//! # pagechat-relay
//!
//! Real-time chat relay for clients embedded on websites. Each website is a
//! room: messages posted over the WebSocket are censored, stored in a
//! 24-hour sliding history, and fanned out to every live connection in the
//! same room.
//!
//! Delivery is at-most-once and best-effort. A connection whose write fails
//! is closed and dropped from its room; nothing is retried or acknowledged.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket /ws, HTTP /messages)
//!     │
//!     ├── WS Session (ws/)  ──submit──▶  Broadcaster (service/)
//!     ├── REST Handlers (api/)              │
//!     │                                     ├── Censor
//!     │                                     ├── HistoryCache (append)
//!     │                                     └── RoomRegistry (fan-out)
//!     │
//!     └── HistoryCache (lookup)
//! ```

pub mod api;
pub mod app;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
