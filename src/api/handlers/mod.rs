//! REST endpoint handlers organized by resource.

pub mod messages;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all REST routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(messages::routes())
        .merge(system::routes())
}
