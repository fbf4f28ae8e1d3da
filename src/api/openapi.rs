//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{HealthResponse, StatsResponse};
use crate::api::handlers::{messages, system};
use crate::domain::ChatMessage;
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "pagechat-relay",
        description = "Per-website chat relay. Live traffic flows over the `/ws` WebSocket; this document covers the HTTP endpoints."
    ),
    paths(
        messages::get_messages,
        system::health_handler,
        system::stats_handler,
    ),
    components(schemas(ChatMessage, ErrorResponse, ErrorBody, HealthResponse, StatsResponse)),
    tags(
        (name = "Messages", description = "Recent message history"),
        (name = "System", description = "Health and occupancy"),
    )
)]
pub struct ApiDoc;
