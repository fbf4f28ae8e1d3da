//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::{HistoryCache, RoomRegistry, WordListCensor};
use crate::service::Broadcaster;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live room membership.
    pub registry: Arc<RoomRegistry>,
    /// Recent per-room history.
    pub history: Arc<HistoryCache>,
    /// Submission side of the broadcast coordinator.
    pub broadcaster: Broadcaster,
}

impl AppState {
    /// Wires up the registry, the history cache (with its sweeper) and the
    /// broadcast coordinator from `config`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn from_config(config: &RelayConfig) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let history = Arc::new(HistoryCache::new(
            config.history_ttl,
            config.history_max_messages,
        ));
        history.spawn_sweeper(config.history_sweep_interval).await;

        let censor = Arc::new(WordListCensor::with_extra_words(&config.censor_extra_words));
        let (broadcaster, _coordinator) = Broadcaster::spawn(
            Arc::clone(&registry),
            Arc::clone(&history),
            censor,
            config.write_timeout,
        );

        Self {
            registry,
            history,
            broadcaster,
        }
    }
}
