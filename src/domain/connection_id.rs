//! Identity of a live client connection.

use std::fmt;

/// Random per-connection identity, fixed at upgrade time and never reused.
///
/// Keys the equality of [`super::ConnectionHandle`] and the reverse binding
/// index in [`super::RoomRegistry`]; rendered in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Draws a fresh v4 id.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_do_not_repeat() {
        let ids: HashSet<ConnectionId> = (0..100).map(|_| ConnectionId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn renders_as_hyphenated_uuid() {
        let rendered = ConnectionId::new().to_string();
        assert!(uuid::Uuid::parse_str(&rendered).is_ok());
        assert_eq!(rendered.matches('-').count(), 4);
    }
}
