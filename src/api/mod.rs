//! REST API layer: route handlers, DTOs, OpenAPI document.
//!
//! Endpoints are mounted at the root so embedded clients can reach
//! `/messages` next to `/ws`.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete REST router.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}
