//! Service layer: the broadcast coordinator.
//!
//! [`Broadcaster`] serializes all chat traffic through one task that
//! censors, records history, and fans out over the
//! [`super::domain::RoomRegistry`].

pub mod broadcaster;

pub use broadcaster::{Broadcaster, InboundMessage};
