//! Health and runtime statistics responses.

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process can answer.
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Snapshot of relay occupancy.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Rooms with at least one live connection.
    pub rooms: usize,
    /// Live registered connections.
    pub connections: usize,
    /// Room histories currently cached.
    pub cached_histories: usize,
}
