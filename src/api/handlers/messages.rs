//! History lookup: recent messages for one website.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::HistoryQuery;
use crate::app_state::AppState;
use crate::domain::ChatMessage;
use crate::error::{ErrorResponse, RelayError};

/// `GET /messages?website=...` — Recent messages for a website.
///
/// # Errors
///
/// Returns [`RelayError::MissingParameter`] when `website` is absent or
/// empty, and [`RelayError::InvalidRequest`] when the query string cannot
/// be decoded.
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Messages",
    summary = "Recent messages for a website",
    description = "Returns the cached history for the website, oldest first. Unknown or expired websites yield an empty array.",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Message history (possibly empty)", body = Vec<ChatMessage>),
        (status = 400, description = "Missing website parameter", body = ErrorResponse),
    )
)]
pub async fn get_messages(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<ChatMessage>>, RelayError> {
    let Query(query) = query.map_err(|e| {
        tracing::warn!(error = %e, "undecodable history query");
        RelayError::InvalidRequest(e.body_text())
    })?;
    let Some(website) = query.website() else {
        tracing::warn!("history lookup without website");
        return Err(RelayError::MissingParameter("website"));
    };
    Ok(Json(state.history.get(website).await))
}

/// History routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/messages", get(get_messages))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::RelayConfig;

    async fn call(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = routes().with_state(state);
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("request should build");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(json) = serde_json::from_slice(&bytes) else {
            panic!("body should be JSON");
        };
        (status, json)
    }

    #[tokio::test]
    async fn unknown_website_returns_empty_array() {
        let state = AppState::from_config(&RelayConfig::default()).await;
        let (status, json) = call(state, "/messages?website=nobody.example").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn returns_cached_history() {
        let state = AppState::from_config(&RelayConfig::default()).await;
        state
            .history
            .append("a", ChatMessage::new("a", "alice", "hi"))
            .await;

        let (status, json) = call(state, "/messages?website=a").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([{ "website": "a", "username": "alice", "message": "hi" }])
        );
    }

    #[tokio::test]
    async fn missing_website_is_bad_request() {
        let state = AppState::from_config(&RelayConfig::default()).await;
        let (status, json) = call(state.clone(), "/messages").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json.pointer("/error/code"),
            Some(&serde_json::json!(1001))
        );

        let (status, _) = call(state, "/messages?website=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
