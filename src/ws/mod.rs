//! WebSocket layer: upgrade handling and the per-connection read loop.
//!
//! The endpoint at `/ws` exchanges `{"website","username","message"}`
//! text frames in both directions.

pub mod connection;
pub mod handler;
