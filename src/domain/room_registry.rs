//! Live membership of website rooms.
//!
//! [`RoomRegistry`] maps a website identifier to the set of connections
//! currently subscribed to it, plus a reverse index from connection to
//! website that enforces the "bound to one room, first write wins" rule.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::{ConnectionHandle, ConnectionId};

#[derive(Debug, Default)]
struct Rooms {
    members: HashMap<String, HashSet<ConnectionHandle>>,
    bindings: HashMap<ConnectionId, String>,
}

/// Website → connected handles.
///
/// # Concurrency
///
/// Both maps sit behind a single [`RwLock`], so a registration and its
/// reverse binding are always updated together. Fan-out only ever reads a
/// snapshot via [`RoomRegistry::members_of`]; the lock is never held across
/// a network write.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<Rooms>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handle` to the room for `website`.
    ///
    /// Returns `false` without changing anything if the handle is already
    /// in that room, or already bound to a different room.
    pub async fn register(&self, website: &str, handle: &ConnectionHandle) -> bool {
        let mut rooms = self.rooms.write().await;
        if let Some(bound) = rooms.bindings.get(&handle.id()) {
            if bound != website {
                tracing::debug!(
                    connection = %handle.id(),
                    bound = %bound,
                    requested = %website,
                    "connection already bound to another room"
                );
            }
            return false;
        }
        rooms.bindings.insert(handle.id(), website.to_owned());
        rooms
            .members
            .entry(website.to_owned())
            .or_default()
            .insert(handle.clone());
        true
    }

    /// Removes `handle` from the room for `website`.
    ///
    /// Idempotent: returns `false` if the handle was not a member.
    pub async fn deregister(&self, website: &str, handle: &ConnectionHandle) -> bool {
        let mut rooms = self.rooms.write().await;
        if rooms.bindings.get(&handle.id()).map(String::as_str) != Some(website) {
            return false;
        }
        rooms.bindings.remove(&handle.id());
        let now_empty = match rooms.members.get_mut(website) {
            Some(set) => {
                set.remove(handle);
                set.is_empty()
            }
            None => false,
        };
        if now_empty {
            rooms.members.remove(website);
        }
        true
    }

    /// Snapshot of the handles subscribed to `website`.
    ///
    /// Handles may go stale after the snapshot is taken; callers detect that
    /// on write and call [`RoomRegistry::deregister`].
    pub async fn members_of(&self, website: &str) -> Vec<ConnectionHandle> {
        let rooms = self.rooms.read().await;
        rooms
            .members
            .get(website)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the website a connection is bound to, if any.
    pub async fn room_of(&self, id: ConnectionId) -> Option<String> {
        self.rooms.read().await.bindings.get(&id).cloned()
    }

    /// Number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.members.len()
    }

    /// Number of registered connections across all rooms.
    pub async fn connection_count(&self) -> usize {
        self.rooms.read().await.bindings.len()
    }
}
