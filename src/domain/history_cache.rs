//! Time-expiring per-room message history.
//!
//! Each website keeps an ordered list of its recent (censored) messages.
//! The whole list expires `ttl` after the *last* append; a background sweep
//! evicts expired rooms and reads double-check the deadline so an expired
//! room is never served between sweeps.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::ChatMessage;

/// Longest retention window a cache accepts; larger values are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Shortest sweep period; `spawn_sweeper` raises smaller values to this.
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct RoomHistory {
    messages: VecDeque<ChatMessage>,
    expires_at: Instant,
}

impl RoomHistory {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Website → recent messages, oldest first.
///
/// `max_messages` caps each room's list (oldest dropped first); `0` means
/// no cap. `ttl` is clamped to [`MAX_TTL`]. All deadlines use the
/// monotonic tokio clock.
#[derive(Debug)]
pub struct HistoryCache {
    entries: RwLock<HashMap<String, RoomHistory>>,
    ttl: Duration,
    max_messages: usize,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl HistoryCache {
    /// Creates an empty cache. Call [`HistoryCache::spawn_sweeper`] to start
    /// background eviction.
    #[must_use]
    pub fn new(ttl: Duration, max_messages: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: ttl.min(MAX_TTL),
            max_messages,
            sweeper: Mutex::new(None),
        }
    }

    /// Appends `message` to the history of `website` and pushes its
    /// deadline out to `now + ttl`.
    pub async fn append(&self, website: &str, message: ChatMessage) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let room = entries
            .entry(website.to_owned())
            .or_insert_with(|| RoomHistory {
                messages: VecDeque::new(),
                expires_at: now,
            });
        if !room.is_live(now) {
            room.messages.clear();
        }
        room.messages.push_back(message);
        if self.max_messages > 0 {
            while room.messages.len() > self.max_messages {
                room.messages.pop_front();
            }
        }
        room.expires_at = now + self.ttl;
    }

    /// Returns the live history for `website`; empty if unknown or expired.
    pub async fn get(&self, website: &str) -> Vec<ChatMessage> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(website)
            .filter(|room| room.is_live(now))
            .map(|room| room.messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Evicts every room whose deadline has passed. Returns how many were
    /// dropped.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, room| room.is_live(now));
        before - entries.len()
    }

    /// Number of room histories currently held (live or awaiting sweep).
    pub async fn room_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Starts the periodic sweep, replacing any sweeper already running.
    ///
    /// The task holds only a weak reference and exits once the cache is
    /// dropped. `period` is raised to at least [`MIN_SWEEP_PERIOD`].
    pub async fn spawn_sweeper(self: &Arc<Self>, period: Duration) {
        let period = period.max(MIN_SWEEP_PERIOD);
        let cache: Weak<Self> = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let evicted = cache.sweep().await;
                if evicted > 0 {
                    tracing::debug!(evicted, "expired room histories evicted");
                }
            }
        });
        if let Some(previous) = self.sweeper.lock().await.replace(task) {
            previous.abort();
        }
    }

    /// Stops the sweeper and drops every entry.
    pub async fn close(&self) {
        if let Some(task) = self.sweeper.lock().await.take() {
            task.abort();
        }
        self.entries.write().await.clear();
        tracing::info!("history cache closed");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn msg(body: &str) -> ChatMessage {
        ChatMessage::new("a", "alice", body)
    }

    #[tokio::test]
    async fn unknown_website_is_empty() {
        let cache = HistoryCache::new(DAY, 0);
        assert!(cache.get("nowhere").await.is_empty());
    }

    #[tokio::test]
    async fn append_then_get_preserves_order() {
        let cache = HistoryCache::new(DAY, 0);
        cache.append("a", msg("one")).await;
        cache.append("a", msg("two")).await;
        cache.append("b", ChatMessage::new("b", "bob", "other")).await;

        let history = cache.get("a").await;
        assert_eq!(history, vec![msg("one"), msg("two")]);
        assert_eq!(cache.get("b").await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn history_expires_after_inactivity() {
        let cache = HistoryCache::new(DAY, 0);
        cache.append("a", msg("one")).await;

        tokio::time::advance(DAY - Duration::from_secs(1)).await;
        assert_eq!(cache.get("a").await.len(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("a").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn append_refreshes_deadline() {
        let cache = HistoryCache::new(DAY, 0);
        cache.append("a", msg("one")).await;

        tokio::time::advance(DAY - Duration::from_secs(60)).await;
        cache.append("a", msg("two")).await;

        // Past the first message's original deadline, within the refreshed one.
        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(cache.get("a").await, vec![msg("one"), msg("two")]);
    }

    #[tokio::test(start_paused = true)]
    async fn append_after_expiry_starts_fresh() {
        let cache = HistoryCache::new(DAY, 0);
        cache.append("a", msg("old")).await;
        tokio::time::advance(DAY).await;

        cache.append("a", msg("new")).await;
        assert_eq!(cache.get("a").await, vec![msg("new")]);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_expired_rooms() {
        let cache = HistoryCache::new(DAY, 0);
        cache.append("a", msg("one")).await;
        tokio::time::advance(DAY / 2).await;
        cache.append("b", ChatMessage::new("b", "bob", "two")).await;
        tokio::time::advance(DAY / 2).await;

        assert_eq!(cache.sweep().await, 1);
        assert_eq!(cache.room_count().await, 1);
        assert_eq!(cache.get("b").await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn background_sweeper_evicts() {
        let cache = Arc::new(HistoryCache::new(Duration::from_secs(10), 0));
        cache.spawn_sweeper(Duration::from_secs(1)).await;
        cache.append("a", msg("one")).await;

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(cache.room_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_ttl_is_clamped() {
        let cache = HistoryCache::new(Duration::MAX, 0);
        cache.append("a", msg("one")).await;
        assert_eq!(cache.get("a").await, vec![msg("one")]);

        tokio::time::advance(MAX_TTL).await;
        assert!(cache.get("a").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_sweep_period_still_sweeps() {
        let cache = Arc::new(HistoryCache::new(Duration::from_secs(1), 0));
        cache.spawn_sweeper(Duration::ZERO).await;
        cache.append("a", msg("one")).await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(cache.room_count().await, 0);
        let Some(task) = cache.sweeper.lock().await.take() else {
            panic!("sweeper should be installed");
        };
        assert!(!task.is_finished());
        task.abort();
    }

    #[tokio::test]
    async fn cap_drops_oldest() {
        let cache = HistoryCache::new(DAY, 2);
        cache.append("a", msg("one")).await;
        cache.append("a", msg("two")).await;
        cache.append("a", msg("three")).await;

        assert_eq!(cache.get("a").await, vec![msg("two"), msg("three")]);
    }

    #[tokio::test]
    async fn close_releases_entries() {
        let cache = Arc::new(HistoryCache::new(DAY, 0));
        cache.spawn_sweeper(Duration::from_secs(1)).await;
        cache.append("a", msg("one")).await;

        cache.close().await;
        assert_eq!(cache.room_count().await, 0);
        assert!(cache.get("a").await.is_empty());
        assert!(cache.sweeper.lock().await.is_none());
    }
}
